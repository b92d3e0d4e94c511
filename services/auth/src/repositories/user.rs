//! User repository for document store operations

use common::store::{DocumentStore, Filter, from_document, to_document};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    models::User,
    password::hash_password,
};

/// Collection holding user records
pub const USERS: &str = "users";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a new user with a freshly hashed password
    ///
    /// Uniqueness is checked before inserting; two concurrent creations of
    /// the same username can both pass the check.
    pub async fn create(&self, username: &str, password: &str) -> AuthResult<User> {
        info!("Creating new user: {}", username);

        if self.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            is_admin: true,
            created_at: common::timestamp::now(),
        };

        self.store.insert(USERS, to_document(&user)?).await?;
        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let document = self
            .store
            .find_one(USERS, &Filter::eq("username", username))
            .await?;

        Ok(document.map(from_document).transpose()?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>> {
        let document = self.store.find_one(USERS, &Filter::by_id(id)).await?;
        Ok(document.map(from_document).transpose()?)
    }
}
