//! MovieHub catalog service
//!
//! Movies, actors and genres behind an HTTP API. Movie casts and actor
//! filmographies are stored on both sides and kept consistent by
//! [`relationships::RelationshipMaintainer`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod relationships;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
