//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_admin() -> bool {
    true
}

/// User entity as persisted in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    /// Every user is an administrator; no other role is enforced
    #[serde(default = "default_admin")]
    pub is_admin: bool,
    #[serde(with = "common::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// User representation returned to clients, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    #[serde(with = "common::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
