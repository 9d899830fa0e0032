use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::db::{GeneratedPassword, NewPassword};
use crate::error::PassforgeError;
use crate::generator::{self, GenerationPolicy};
use crate::server::middleware::{
    ApiGenerateRequest, GenerateForm, GenerateRequest, PageQuery, ResponseFormat,
};
use crate::server::router::AppState;
use crate::server::views::{self, HtmlError};

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub id: i64,
    pub password: String,
    pub length: usize,
    pub created_at: DateTime<Utc>,
    pub website: Option<String>,
    pub username: Option<String>,
}

impl From<GeneratedPassword> for GenerateResponse {
    fn from(entry: GeneratedPassword) -> Self {
        Self {
            success: true,
            id: entry.id,
            length: entry.value.chars().count(),
            password: entry.value,
            created_at: entry.created_at,
            website: entry.website,
            username: entry.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_passwords: i64,
    pub storage_type: &'static str,
}

/// Validate, generate, persist, and read the stored row back.
async fn generate_and_store(
    state: &AppState,
    form: GenerateForm,
) -> Result<GeneratedPassword, PassforgeError> {
    let settings = state.generator;
    let policy =
        GenerationPolicy::validate(&form.policy, settings.default_length, settings.bounds)?;
    let value = generator::generate(&policy)?;

    let id = state
        .store
        .insert(
            NewPassword::new(value)
                .with_policy(policy)
                .with_labels(form.website, form.username),
        )
        .await?;
    info!(id, length = policy.length(), "password generated");

    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| PassforgeError::Corrupt(format!("row {id} missing right after insert")))
}

/// GET / -> generator form.
pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    Html(views::index_page(state.generator))
}

/// GET /generate -> back to the form.
pub async fn generate_redirect() -> Redirect {
    Redirect::to("/")
}

/// POST /generate -> HTML result page or JSON, negotiated on `Accept`.
pub async fn generate(
    State(state): State<AppState>,
    GenerateRequest(form, format): GenerateRequest,
) -> Response {
    match (generate_and_store(&state, form).await, format) {
        (Ok(entry), ResponseFormat::Html) => Html(views::result_page(&entry)).into_response(),
        (Ok(entry), ResponseFormat::Json) => Json(GenerateResponse::from(entry)).into_response(),
        (Err(err), ResponseFormat::Html) => HtmlError(err).into_response(),
        (Err(err), ResponseFormat::Json) => err.into_response(),
    }
}

/// POST /api/generate -> always JSON.
pub async fn api_generate(
    State(state): State<AppState>,
    ApiGenerateRequest(form): ApiGenerateRequest,
) -> Result<Json<GenerateResponse>, PassforgeError> {
    let entry = generate_and_store(&state, form).await?;
    Ok(Json(entry.into()))
}

/// GET /passwords -> history table, newest first.
pub async fn history_page(
    State(state): State<AppState>,
    page: Result<PageQuery, PassforgeError>,
) -> Result<Html<String>, HtmlError> {
    let PageQuery(page) = page?;
    let entries = state.store.list_all(page).await?;
    let total = state.store.count().await?;
    Ok(Html(views::history_page(&entries, total)))
}

/// GET /api/passwords -> JSON history, newest first.
pub async fn api_history(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<Vec<GeneratedPassword>>, PassforgeError> {
    Ok(Json(state.store.list_all(page).await?))
}

/// GET /api/stats -> record count for monitoring dashboards.
pub async fn api_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, PassforgeError> {
    Ok(Json(StatsResponse {
        total_passwords: state.store.count().await?,
        storage_type: "sqlite",
    }))
}
