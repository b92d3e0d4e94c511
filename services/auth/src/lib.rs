//! Authentication gateway for the MovieHub catalog
//!
//! Credential verification, password hashing, token issuance and token
//! resolution on top of the shared document store.

pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtService};
pub use models::{User, UserResponse};
pub use repositories::UserRepository;
pub use service::AuthService;
