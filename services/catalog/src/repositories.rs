//! Repositories for catalog persistence

use common::StoreError;
use thiserror::Error;

pub mod actor;
pub mod genre;
pub mod movie;

pub use actor::ActorRepository;
pub use genre::GenreRepository;
pub use movie::MovieRepository;

/// Collection holding movie records
pub const MOVIES: &str = "movies";
/// Collection holding actor records
pub const ACTORS: &str = "actors";
/// Collection holding genre records
pub const GENRES: &str = "genres";

/// Maximum number of results per kind returned by a search
pub const SEARCH_LIMIT: u64 = 20;

/// Errors raised by catalog repositories
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No record with that id
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },

    /// The payload is missing a required field or has an invalid value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl RepositoryError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        RepositoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;
