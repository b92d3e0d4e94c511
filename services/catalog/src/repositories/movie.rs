//! Movie repository for document store operations

use common::store::{DocumentStore, Filter, FindOptions, Sort, from_document, to_document};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{MOVIES, RepositoryError, RepositoryResult};
use crate::{
    models::{Movie, MovieInput},
    relationships::{LinkSide, RelationshipMaintainer},
};

const KIND: &str = "Movie";

/// Movie repository
#[derive(Clone)]
pub struct MovieRepository {
    store: Arc<dyn DocumentStore>,
    relationships: RelationshipMaintainer,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let relationships = RelationshipMaintainer::new(store.clone());
        Self {
            store,
            relationships,
        }
    }

    /// Create a movie and link it from each of its actors
    pub async fn create(&self, input: MovieInput) -> RepositoryResult<Movie> {
        input.validate().map_err(RepositoryError::Validation)?;
        let movie = Movie::new(input.normalized());
        info!("Creating movie: {} ({})", movie.title, movie.id);

        self.store.insert(MOVIES, to_document(&movie)?).await?;

        self.relationships
            .reconcile(LinkSide::MovieUpdatingActors, &movie.id, &[], &movie.actors)
            .await
            .log_outcome(KIND, &movie.id);

        Ok(movie)
    }

    /// Find a movie by ID
    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Movie>> {
        let document = self.store.find_one(MOVIES, &Filter::by_id(id)).await?;
        Ok(document.map(from_document::<Movie>).transpose()?)
    }

    /// Get a movie by ID, failing when it does not exist
    pub async fn get(&self, id: &str) -> RepositoryResult<Movie> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(KIND, id))
    }

    /// List movies in store order
    pub async fn list(&self, skip: u64, limit: u64) -> RepositoryResult<Vec<Movie>> {
        self.find(&Filter::All, FindOptions::page(skip, limit)).await
    }

    /// Most recently created movie
    pub async fn featured(&self) -> RepositoryResult<Option<Movie>> {
        Ok(self.recent(1).await?.into_iter().next())
    }

    /// Movies ordered by creation time, newest first
    pub async fn recent(&self, limit: u64) -> RepositoryResult<Vec<Movie>> {
        self.find(
            &Filter::All,
            FindOptions::limit(limit).sorted(Sort::descending("created_at")),
        )
        .await
    }

    /// Movies flagged as favorite
    pub async fn favorites(&self, limit: u64) -> RepositoryResult<Vec<Movie>> {
        self.find(&Filter::eq("is_favorite", true), FindOptions::limit(limit))
            .await
    }

    /// Movies tagged with a genre
    pub async fn by_genre(&self, genre_id: &str, limit: u64) -> RepositoryResult<Vec<Movie>> {
        self.find(&Filter::contains("genres", genre_id), FindOptions::limit(limit))
            .await
    }

    /// Case-insensitive substring search over title and description
    pub async fn search(&self, query: &str, limit: u64) -> RepositoryResult<Vec<Movie>> {
        let filter = Filter::Or(vec![
            Filter::contains_text("title", query),
            Filter::contains_text("description", query),
        ]);
        self.find(&filter, FindOptions::limit(limit)).await
    }

    /// Replace every editable field of a movie and re-link its actors
    ///
    /// Optional fields left out of `input` are cleared.
    pub async fn update(&self, id: &str, input: MovieInput) -> RepositoryResult<Movie> {
        let existing = self.get(id).await?;
        input.validate().map_err(RepositoryError::Validation)?;
        let input = input.normalized();
        info!("Updating movie: {}", id);

        if !self.store.set_fields(MOVIES, id, to_document(&input)?).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        self.relationships
            .reconcile(
                LinkSide::MovieUpdatingActors,
                id,
                &existing.actors,
                &input.actors,
            )
            .await
            .log_outcome(KIND, id);

        self.get(id).await
    }

    /// Delete a movie
    ///
    /// Actors keep their reference to the deleted movie.
    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        if !self.store.delete(MOVIES, id).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        info!("Deleted movie: {}", id);
        Ok(())
    }

    /// Flip the favorite flag and return its new value
    pub async fn toggle_favorite(&self, id: &str) -> RepositoryResult<bool> {
        let movie = self.get(id).await?;
        let is_favorite = !movie.is_favorite;

        let fields = to_document(&json!({ "is_favorite": is_favorite }))?;
        if !self.store.set_fields(MOVIES, id, fields).await? {
            return Err(RepositoryError::not_found(KIND, id));
        }

        Ok(is_favorite)
    }

    /// Number of stored movies
    pub async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.store.count(MOVIES, &Filter::All).await?)
    }

    async fn find(&self, filter: &Filter, options: FindOptions) -> RepositoryResult<Vec<Movie>> {
        let documents = self.store.find(MOVIES, filter, &options).await?;
        documents
            .into_iter()
            .map(|document| Ok(from_document(document)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::ActorInput, repositories::ActorRepository};
    use common::MemoryStore;

    struct Fixture {
        movies: MovieRepository,
        actors: ActorRepository,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        Fixture {
            movies: MovieRepository::new(store.clone()),
            actors: ActorRepository::new(store),
        }
    }

    fn movie(title: &str, actors: Vec<String>) -> MovieInput {
        MovieInput {
            title: title.to_string(),
            actors,
            ..Default::default()
        }
    }

    async fn actor(fixture: &Fixture, name: &str) -> String {
        fixture
            .actors
            .create(ActorInput {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    /// Every movie/actor pair is referenced from both sides or neither
    async fn assert_symmetric(fixture: &Fixture) {
        let movies = fixture.movies.list(0, 1000).await.unwrap();
        let actors = fixture.actors.list(0, 1000).await.unwrap();
        for m in &movies {
            for a in &actors {
                assert_eq!(
                    m.actors.contains(&a.id),
                    a.movies.contains(&m.id),
                    "movie {} / actor {}",
                    m.title,
                    a.name
                );
            }
        }
    }

    #[tokio::test]
    async fn test_create_links_actors() {
        let fixture = fixture();
        let a1 = actor(&fixture, "Leonardo DiCaprio").await;
        let a2 = actor(&fixture, "Kate Winslet").await;

        let created = fixture
            .movies
            .create(movie("Titanic", vec![a1.clone(), a2.clone(), a1.clone()]))
            .await
            .unwrap();

        assert_eq!(created.actors, vec![a1.clone(), a2.clone()]);
        assert!(!created.is_favorite);
        let actor = fixture.actors.get(&a1).await.unwrap();
        assert_eq!(actor.movies, vec![created.id.clone()]);
        assert_symmetric(&fixture).await;
    }

    #[tokio::test]
    async fn test_update_relinks_cast() {
        let fixture = fixture();
        let a1 = actor(&fixture, "A1").await;
        let a2 = actor(&fixture, "A2").await;
        let a3 = actor(&fixture, "A3").await;
        let m1 = fixture
            .movies
            .create(movie("M1", vec![a1.clone(), a2.clone()]))
            .await
            .unwrap();

        let updated = fixture
            .movies
            .update(&m1.id, movie("M1", vec![a2.clone(), a3.clone()]))
            .await
            .unwrap();

        assert_eq!(updated.actors, vec![a2.clone(), a3.clone()]);
        assert!(fixture.actors.get(&a1).await.unwrap().movies.is_empty());
        assert_eq!(fixture.actors.get(&a2).await.unwrap().movies, vec![m1.id.clone()]);
        assert_eq!(fixture.actors.get(&a3).await.unwrap().movies, vec![m1.id.clone()]);
        assert_symmetric(&fixture).await;
    }

    #[tokio::test]
    async fn test_repeated_update_is_idempotent() {
        let fixture = fixture();
        let a1 = actor(&fixture, "A1").await;
        let m1 = fixture
            .movies
            .create(movie("M1", vec![]))
            .await
            .unwrap();

        for _ in 0..2 {
            fixture
                .movies
                .update(&m1.id, movie("M1", vec![a1.clone()]))
                .await
                .unwrap();
        }

        assert_eq!(fixture.actors.get(&a1).await.unwrap().movies, vec![m1.id]);
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_favorite() {
        let fixture = fixture();
        let m1 = fixture.movies.create(movie("M1", vec![])).await.unwrap();
        fixture.movies.toggle_favorite(&m1.id).await.unwrap();

        let updated = fixture
            .movies
            .update(&m1.id, movie("Renamed", vec![]))
            .await
            .unwrap();

        assert_eq!(updated.id, m1.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, m1.created_at);
        assert!(updated.is_favorite);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let fixture = fixture();
        let m1 = fixture.movies.create(movie("M1", vec![])).await.unwrap();

        let result = fixture.movies.update(&m1.id, movie("  ", vec![])).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(fixture.movies.get(&m1.id).await.unwrap().title, "M1");
    }

    #[tokio::test]
    async fn test_delete_leaves_actor_references() {
        let fixture = fixture();
        let a1 = actor(&fixture, "A1").await;
        let m1 = fixture
            .movies
            .create(movie("M1", vec![a1.clone()]))
            .await
            .unwrap();

        fixture.movies.delete(&m1.id).await.unwrap();

        assert!(fixture.movies.find_by_id(&m1.id).await.unwrap().is_none());
        assert_eq!(fixture.actors.get(&a1).await.unwrap().movies, vec![m1.id.clone()]);
        assert!(matches!(
            fixture.movies.delete(&m1.id).await,
            Err(RepositoryError::NotFound { kind: "Movie", .. })
        ));
    }

    #[tokio::test]
    async fn test_toggle_favorite_twice_restores_flag() {
        let fixture = fixture();
        let m1 = fixture.movies.create(movie("M1", vec![])).await.unwrap();

        assert!(fixture.movies.toggle_favorite(&m1.id).await.unwrap());
        assert_eq!(fixture.movies.favorites(100).await.unwrap().len(), 1);
        assert!(!fixture.movies.toggle_favorite(&m1.id).await.unwrap());
        assert!(fixture.movies.favorites(100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_and_featured_are_newest_first() {
        let fixture = fixture();
        assert!(fixture.movies.featured().await.unwrap().is_none());

        for title in ["First", "Second", "Third"] {
            fixture.movies.create(movie(title, vec![])).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let recent = fixture.movies.recent(2).await.unwrap();
        let titles: Vec<_> = recent.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second"]);
        assert_eq!(fixture.movies.featured().await.unwrap().unwrap().title, "Third");
    }

    #[tokio::test]
    async fn test_search_and_genre_filters() {
        let fixture = fixture();
        fixture
            .movies
            .create(MovieInput {
                title: "Inception".to_string(),
                genres: vec!["sci-fi".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        fixture
            .movies
            .create(MovieInput {
                title: "Titanic".to_string(),
                description: Some("Un naufrage inoubliable".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let found = fixture.movies.search("incep", 20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Inception");

        let found = fixture.movies.search("NAUFRAGE", 20).await.unwrap();
        assert_eq!(found[0].title, "Titanic");

        let sci_fi = fixture.movies.by_genre("sci-fi", 6).await.unwrap();
        assert_eq!(sci_fi.len(), 1);
        assert_eq!(fixture.movies.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let fixture = fixture();
        for title in ["A", "B", "C"] {
            fixture.movies.create(movie(title, vec![])).await.unwrap();
        }

        let page = fixture.movies.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "B");
    }
}
