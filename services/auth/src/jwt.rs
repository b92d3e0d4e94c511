//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret and carry the username
//! as subject. Expiry is checked against an explicit clock reading so that
//! the validity window can be exercised deterministically.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Access token lifetime in minutes (default: 30)
    pub access_token_expiry_minutes: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC secret used to sign tokens
    /// - `JWT_ACCESS_TOKEN_EXPIRY_MINUTES`: Access token lifetime in minutes (default: 30)
    pub fn from_env() -> AuthResult<Self> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            AuthError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        let access_token_expiry_minutes = std::env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(JwtConfig {
            secret,
            access_token_expiry_minutes,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::Configuration(
                "JWT secret must not be empty".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is compared in `resolve_token_at` without leeway
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Issue an access token for a username
    pub fn issue_token(&self, username: &str) -> AuthResult<String> {
        self.issue_token_at(username, Utc::now())
    }

    /// Issue an access token as if the current time were `now`
    pub fn issue_token_at(&self, username: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_token_expiry()).timestamp(),
        };

        encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AuthError::Hashing(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the username it was issued for
    pub fn resolve_token(&self, token: &str) -> AuthResult<String> {
        self.resolve_token_at(token, Utc::now())
    }

    /// Validate a token against the clock reading `now`
    pub fn resolve_token_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = self.decode_claims(token)?;

        if now.timestamp() >= claims.exp {
            debug!("Rejected expired token for {}", claims.sub);
            return Err(AuthError::ExpiredToken);
        }

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims.sub)
    }

    fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => {
                    debug!("Failed to validate token: {}", e);
                    AuthError::InvalidToken
                }
            })
    }

    /// Get the access token lifetime
    pub fn access_token_expiry(&self) -> Duration {
        Duration::minutes(self.config.access_token_expiry_minutes)
    }
}
