//! Service configuration
//!
//! Read from `CATALOG_*` environment variables on top of built-in defaults.
//! Database and token settings live with their own crates
//! (`DatabaseConfig`, `JwtConfig`).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::seed::AdminSeed;

/// Backend holding the catalog documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store, contents are lost on exit
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Message(format!(
                "Unknown store backend: {}",
                other
            ))),
        }
    }
}

/// Origins allowed by CORS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    host: String,
    port: u16,
    store: String,
    cors_origins: String,
    seed_admin_username: String,
    seed_admin_password: String,
}

/// Catalog service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub cors_origins: CorsOrigins,
    pub admin: AdminSeed,
}

impl AppConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8001)?
            .set_default("store", "postgres")?
            .set_default("cors_origins", "*")?
            .set_default("seed_admin_username", "admin")?
            .set_default("seed_admin_password", "admin123")?
            .add_source(Environment::with_prefix("CATALOG"))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            host: raw.host,
            port: raw.port,
            store: StoreBackend::parse(&raw.store)?,
            cors_origins: CorsOrigins::parse(&raw.cors_origins),
            admin: AdminSeed {
                username: raw.seed_admin_username,
                password: raw.seed_admin_password,
            },
        })
    }

    /// Socket address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
