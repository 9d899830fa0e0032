//! Runtime configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. TOML file at `$PASSFORGE_CONFIG` (default `passforge.toml`, optional)
//! 3. `PASSFORGE_`-prefixed env vars, nested with `__` (`PASSFORGE_BASIC__PORT`)
//! 4. bare `HOST`, `PORT` and `DATABASE_URL`

use std::net::SocketAddr;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use serde::{Deserialize, Serialize};

use crate::error::PassforgeError;
use crate::generator::LengthBounds;

pub const DEFAULT_CONFIG_FILE: &str = "passforge.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BasicConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub loglevel: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub default_length: u32,
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite:passforge.db".to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_length: 12,
            min_length: 1,
            max_length: 128,
        }
    }
}

impl Config {
    /// Load from the standard layered sources and validate.
    pub fn load() -> Result<Self, PassforgeError> {
        let path =
            std::env::var("PASSFORGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::figment(&path).extract::<Config>()?.validated()
    }

    pub fn figment(toml_path: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::prefixed("PASSFORGE_").split("__"))
            .merge(Env::raw().filter_map(|key| {
                match key.as_str().to_ascii_lowercase().as_str() {
                    "host" => Some(Uncased::from("basic.host")),
                    "port" => Some(Uncased::from("basic.port")),
                    "database_url" => Some(Uncased::from("basic.database_url")),
                    _ => None,
                }
            }))
    }

    pub fn validated(self) -> Result<Self, PassforgeError> {
        let g = &self.generator;
        if g.min_length == 0 {
            return Err(PassforgeError::invalid("generator.min_length must be at least 1"));
        }
        if g.min_length > g.max_length {
            return Err(PassforgeError::invalid(format!(
                "generator.min_length ({}) exceeds generator.max_length ({})",
                g.min_length, g.max_length
            )));
        }
        if !(g.min_length..=g.max_length).contains(&g.default_length) {
            return Err(PassforgeError::invalid(format!(
                "generator.default_length ({}) must be within {}..={}",
                g.default_length, g.min_length, g.max_length
            )));
        }
        if self.basic.max_connections == 0 {
            return Err(PassforgeError::invalid("basic.max_connections must be at least 1"));
        }
        Ok(self)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, PassforgeError> {
        format!("{}:{}", self.basic.host, self.basic.port)
            .parse()
            .map_err(|e| {
                PassforgeError::invalid(format!(
                    "invalid listen address {}:{}: {e}",
                    self.basic.host, self.basic.port
                ))
            })
    }

    pub fn length_bounds(&self) -> LengthBounds {
        LengthBounds {
            min: self.generator.min_length as usize,
            max: self.generator.max_length as usize,
        }
    }
}
