//! Authentication gateway
//!
//! Verifies credentials, issues tokens and resolves bearer tokens back to the
//! stored user they were issued for.

use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::JwtService,
    models::User,
    password::verify_password,
    repositories::UserRepository,
};

/// Authentication service shared across handlers
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Check a username/password pair
    pub async fn verify(&self, username: &str, password: &str) -> AuthResult<User> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!("Login attempt for unknown user: {}", username);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            warn!("Invalid password for user: {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<String> {
        let user = self.verify(username, password).await?;
        let token = self.issue_token(&user.username)?;
        info!("User logged in: {}", user.username);
        Ok(token)
    }

    /// Issue an access token for a username
    pub fn issue_token(&self, username: &str) -> AuthResult<String> {
        self.jwt.issue_token(username)
    }

    /// Resolve a token to the username it was issued for
    pub fn resolve_token(&self, token: &str) -> AuthResult<String> {
        self.jwt.resolve_token(token)
    }

    /// Resolve a token to a stored user
    pub async fn authenticate(&self, token: &str) -> AuthResult<User> {
        let username = self.resolve_token(token)?;
        self.users
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }
}
