//! Custom error types for the catalog service

use auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{repositories::RepositoryError, seed::SeedError};

/// Error returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing, invalid or expired credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Not authenticated".to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { kind, .. } => ApiError::NotFound(kind),
            RepositoryError::Validation(msg) => ApiError::Validation(msg),
            RepositoryError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::UserNotFound => {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            AuthError::UsernameTaken(name) => {
                ApiError::BadRequest(format!("Username already taken: {}", name))
            }
            AuthError::Store(e) => ApiError::Store(e),
            AuthError::Hashing(msg) | AuthError::Configuration(msg) => {
                error!("Credential processing failed: {}", msg);
                ApiError::Internal
            }
        }
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Repository(e) => e.into(),
            SeedError::Auth(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(e) => {
                error!("Store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Store error".to_string())
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let mut response = (status, Json(json!({ "error": error_message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
