//! Actor repository

use common::store::{DocumentStore, Filter, FindOptions, Sort, from_document, to_document};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{ACTORS, RepositoryError, RepositoryResult};
use crate::{
    models::{Actor, ActorInput},
    relationships::{LinkSide, RelationshipMaintainer},
};

const KIND: &str = "Actor";

/// Actor repository
#[derive(Clone)]
pub struct ActorRepository {
    store: Arc<dyn DocumentStore>,
    relationships: RelationshipMaintainer,
}

impl ActorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let relationships = RelationshipMaintainer::new(store.clone());
        Self {
            store,
            relationships,
        }
    }

    /// Create an actor and add it to the cast of each of its movies
    pub async fn create(&self, input: ActorInput) -> RepositoryResult<Actor> {
        input.validate().map_err(RepositoryError::Validation)?;
        let actor = Actor::new(input.normalized());
        info!("Creating actor: {} ({})", actor.name, actor.id);

        self.store.insert(ACTORS, to_document(&actor)?).await?;

        self.relationships
            .reconcile(LinkSide::ActorUpdatingMovies, &actor.id, &[], &actor.movies)
            .await
            .log_outcome(KIND, &actor.id);

        Ok(actor)
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Actor>> {
        let document = self.store.find_one(ACTORS, &Filter::by_id(id)).await?;
        Ok(document.map(from_document::<Actor>).transpose()?)
    }

    pub async fn get(&self, id: &str) -> RepositoryResult<Actor> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(KIND, id))
    }

    pub async fn list(&self, skip: u64, limit: u64) -> RepositoryResult<Vec<Actor>> {
        self.find(&Filter::All, FindOptions::page(skip, limit)).await
    }

    /// Actors ordered by creation time, newest first
    pub async fn recent(&self, limit: u64) -> RepositoryResult<Vec<Actor>> {
        self.find(
            &Filter::All,
            FindOptions::limit(limit).sorted(Sort::descending("created_at")),
        )
        .await
    }

    pub async fn favorites(&self, limit: u64) -> RepositoryResult<Vec<Actor>> {
        self.find(&Filter::eq("is_favorite", true), FindOptions::limit(limit))
            .await
    }

    pub async fn by_genre(&self, genre_id: &str, limit: u64) -> RepositoryResult<Vec<Actor>> {
        self.find(&Filter::contains("genres", genre_id), FindOptions::limit(limit))
            .await
    }

    /// Case-insensitive substring search over name and description
    pub async fn search(&self, query: &str, limit: u64) -> RepositoryResult<Vec<Actor>> {
        let filter = Filter::Or(vec![
            Filter::contains_text("name", query),
            Filter::contains_text("description", query),
        ]);
        self.find(&filter, FindOptions::limit(limit)).await
    }

    /// Replace every editable field of an actor and re-link its movies
    pub async fn update(&self, id: &str, input: ActorInput) -> RepositoryResult<Actor> {
        let existing = self.get(id).await?;
        input.validate().map_err(RepositoryError::Validation)?;
        let input = input.normalized();
        info!("Updating actor: {}", id);

        if !self.store.set_fields(ACTORS, id, to_document(&input)?).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        self.relationships
            .reconcile(
                LinkSide::ActorUpdatingMovies,
                id,
                &existing.movies,
                &input.movies,
            )
            .await
            .log_outcome(KIND, id);

        self.get(id).await
    }

    /// Delete an actor, leaving movie casts untouched
    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        if !self.store.delete(ACTORS, id).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        info!("Deleted actor: {}", id);
        Ok(())
    }

    pub async fn toggle_favorite(&self, id: &str) -> RepositoryResult<bool> {
        let actor = self.get(id).await?;
        let is_favorite = !actor.is_favorite;

        let fields = to_document(&json!({ "is_favorite": is_favorite }))?;
        if !self.store.set_fields(ACTORS, id, fields).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        Ok(is_favorite)
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> RepositoryResult<Vec<Actor>> {
        let documents = self.store.find(ACTORS, filter, &options).await?;
        documents
            .into_iter()
            .map(|document| Ok(from_document(document)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::MovieInput, repositories::MovieRepository};
    use common::MemoryStore;

    fn repositories() -> (ActorRepository, MovieRepository) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        (
            ActorRepository::new(store.clone()),
            MovieRepository::new(store),
        )
    }

    fn actor(name: &str, movies: Vec<String>) -> ActorInput {
        ActorInput {
            name: name.to_string(),
            movies,
            ..Default::default()
        }
    }

    fn movie(title: &str) -> MovieInput {
        MovieInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_adds_actor_to_cast() {
        let (actors, movies) = repositories();
        let m1 = movies.create(movie("Drive")).await.unwrap();

        let a1 = actors
            .create(actor("Ryan Gosling", vec![m1.id.clone()]))
            .await
            .unwrap();

        assert_eq!(a1.movies, vec![m1.id.clone()]);
        assert_eq!(movies.get(&m1.id).await.unwrap().actors, vec![a1.id]);
    }

    #[tokio::test]
    async fn test_update_moves_actor_between_casts() {
        let (actors, movies) = repositories();
        let m1 = movies.create(movie("Drive")).await.unwrap();
        let m2 = movies.create(movie("La La Land")).await.unwrap();
        let a1 = actors
            .create(actor("Ryan Gosling", vec![m1.id.clone()]))
            .await
            .unwrap();

        let updated = actors
            .update(&a1.id, actor("Ryan Gosling", vec![m2.id.clone()]))
            .await
            .unwrap();

        assert_eq!(updated.movies, vec![m2.id.clone()]);
        assert!(movies.get(&m1.id).await.unwrap().actors.is_empty());
        assert_eq!(movies.get(&m2.id).await.unwrap().actors, vec![a1.id]);
    }

    #[tokio::test]
    async fn test_update_clears_omitted_fields() {
        let (actors, _) = repositories();
        let created = actors
            .create(ActorInput {
                name: "Scarlett Johansson".to_string(),
                age: Some(39),
                description: Some("Actrice".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = actors
            .update(&created.id, actor("Scarlett Johansson", vec![]))
            .await
            .unwrap();

        assert_eq!(updated.age, None);
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_search_matches_name_case_insensitively() {
        let (actors, _) = repositories();
        actors.create(actor("Ryan Gosling", vec![])).await.unwrap();
        actors
            .create(actor("Leonardo DiCaprio", vec![]))
            .await
            .unwrap();

        let found = actors.search("GOSL", 20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ryan Gosling");
    }

    #[tokio::test]
    async fn test_unknown_actor() {
        let (actors, _) = repositories();

        assert!(matches!(
            actors.toggle_favorite("missing").await,
            Err(RepositoryError::NotFound { kind: "Actor", .. })
        ));
        assert!(matches!(
            actors.delete("missing").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
