//! Genre repository

use common::store::{DocumentStore, Filter, FindOptions, from_document, to_document};
use std::sync::Arc;
use tracing::info;

use super::{GENRES, RepositoryError, RepositoryResult};
use crate::models::{Genre, GenreInput, GenreKind};

/// Genre listings are never longer than this
const LIST_LIMIT: u64 = 100;

/// Genre repository
#[derive(Clone)]
pub struct GenreRepository {
    store: Arc<dyn DocumentStore>,
}

impl GenreRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: GenreInput) -> RepositoryResult<Genre> {
        input.validate().map_err(RepositoryError::Validation)?;
        let genre = Genre::new(input);
        info!("Creating genre: {} ({:?})", genre.name, genre.kind);

        self.store.insert(GENRES, to_document(&genre)?).await?;
        Ok(genre)
    }

    pub async fn get(&self, id: &str) -> RepositoryResult<Genre> {
        let document = self
            .store
            .find_one(GENRES, &Filter::by_id(id))
            .await?
            .ok_or_else(|| RepositoryError::not_found("Genre", id))?;
        Ok(from_document(document)?)
    }

    /// List genres, optionally restricted to one kind
    pub async fn list(&self, kind: Option<GenreKind>) -> RepositoryResult<Vec<Genre>> {
        let filter = match kind {
            Some(kind) => Filter::eq("type", kind.as_str()),
            None => Filter::All,
        };

        let documents = self
            .store
            .find(GENRES, &filter, &FindOptions::limit(LIST_LIMIT))
            .await?;
        documents
            .into_iter()
            .map(|document| Ok(from_document(document)?))
            .collect()
    }

    /// Delete a genre; movies and actors keep their references to it
    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        if !self.store.delete(GENRES, id).await? {
            return Err(RepositoryError::not_found("Genre", id));
        }

        info!("Deleted genre: {}", id);
        Ok(())
    }

    pub async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.store.count(GENRES, &Filter::All).await?)
    }
}
