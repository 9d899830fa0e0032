use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::config::Config;
use crate::db::PasswordStore;
use crate::generator::LengthBounds;
use crate::server::handlers::{health, passwords};
use crate::server::middleware::log_request;

/// Generator defaults resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub default_length: usize,
    pub bounds: LengthBounds,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            default_length: 12,
            bounds: LengthBounds::default(),
        }
    }
}

impl From<&Config> for GeneratorSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            default_length: cfg.generator.default_length as usize,
            bounds: cfg.length_bounds(),
        }
    }
}

/// State injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: PasswordStore,
    pub generator: GeneratorSettings,
}

impl AppState {
    pub fn new(store: PasswordStore, generator: GeneratorSettings) -> Self {
        Self { store, generator }
    }
}

pub fn passforge_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(passwords::index_page))
        .route(
            "/generate",
            get(passwords::generate_redirect).post(passwords::generate),
        )
        .route("/api/generate", post(passwords::api_generate))
        .route("/passwords", get(passwords::history_page))
        .route("/api/passwords", get(passwords::api_history))
        .route("/api/stats", get(passwords::api_stats))
        .route("/health", get(health::health))
        .route("/favicon.ico", get(health::favicon))
        .fallback(health::not_found)
        .method_not_allowed_fallback(health::method_not_allowed)
        .layer(axum_middleware::from_fn(log_request))
        .with_state(state)
}
