//! Custom error types for the authentication gateway

use common::error::StoreError;
use thiserror::Error;

/// Errors raised while verifying credentials or resolving tokens
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token is malformed, badly signed or lacks a subject
    #[error("Invalid token")]
    InvalidToken,

    /// Token signature is valid but its expiry has passed
    #[error("Token expired")]
    ExpiredToken,

    /// Token subject does not resolve to a stored user
    #[error("User not found")]
    UserNotFound,

    /// A user with that username already exists
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Password hashing or token signing failed
    #[error("Credential processing error: {0}")]
    Hashing(String),

    /// Configuration is missing or invalid
    #[error("Auth configuration error: {0}")]
    Configuration(String),

    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for Result with AuthError
pub type AuthResult<T> = Result<T, AuthError>;
