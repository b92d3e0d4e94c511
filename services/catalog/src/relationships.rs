//! Movie/actor relationship maintenance
//!
//! Movies list their actors and actors list their movies. Both lists are
//! stored redundantly, so whenever one side's list is replaced the other side
//! has to be brought in line: for every movie M and actor A, A is in
//! `M.actors` if and only if M is in `A.movies`.
//!
//! Counterpart updates are independent single-document operations. There is
//! no lock or transaction around them: two concurrent updates touching the
//! same counterpart can interleave and the later write wins.

use common::store::DocumentStore;
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, warn};

use crate::repositories::{ACTORS, MOVIES};

/// Which side's reference list changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    /// A movie's `actors` list changed; actors' `movies` lists follow
    MovieUpdatingActors,
    /// An actor's `movies` list changed; movies' `actors` lists follow
    ActorUpdatingMovies,
}

impl LinkSide {
    /// Collection holding the counterparts
    pub fn counterpart_collection(self) -> &'static str {
        match self {
            LinkSide::MovieUpdatingActors => ACTORS,
            LinkSide::ActorUpdatingMovies => MOVIES,
        }
    }

    /// Reference field on the counterpart
    pub fn counterpart_field(self) -> &'static str {
        match self {
            LinkSide::MovieUpdatingActors => "movies",
            LinkSide::ActorUpdatingMovies => "actors",
        }
    }
}

/// Outcome of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Counterparts that gained the entity
    pub linked: Vec<String>,
    /// Counterparts that lost the entity
    pub unlinked: Vec<String>,
    /// Counterparts that were missing or already consistent
    pub unchanged: Vec<String>,
    /// Counterparts whose update failed
    pub failed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Log the outcome for the entity whose list changed
    pub fn log_outcome(&self, kind: &str, id: &str) {
        if self.is_complete() {
            debug!(
                "Reconciled {} {}: {} linked, {} unlinked",
                kind,
                id,
                self.linked.len(),
                self.unlinked.len()
            );
        } else {
            warn!(
                "Reconciliation of {} {} left stale references on {:?}",
                kind, id, self.failed
            );
        }
    }
}

/// Keeps both sides of the movie/actor relation consistent
#[derive(Clone)]
pub struct RelationshipMaintainer {
    store: Arc<dyn DocumentStore>,
}

impl RelationshipMaintainer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Apply the counterpart updates implied by `entity_id`'s reference list
    /// changing from `old_refs` to `new_refs`.
    ///
    /// Dangling counterpart ids are skipped. A failure on one counterpart is
    /// logged and recorded in the report; the remaining counterparts are
    /// still attempted and no error is returned.
    pub async fn reconcile(
        &self,
        side: LinkSide,
        entity_id: &str,
        old_refs: &[String],
        new_refs: &[String],
    ) -> ReconcileReport {
        let old: HashSet<&str> = old_refs.iter().map(String::as_str).collect();
        let new: HashSet<&str> = new_refs.iter().map(String::as_str).collect();

        // Walk the caller's lists rather than the sets so the order is stable
        let mut seen = HashSet::new();
        let to_remove: Vec<&str> = old_refs
            .iter()
            .map(String::as_str)
            .filter(|id| !new.contains(id) && seen.insert(*id))
            .collect();
        let to_add: Vec<&str> = new_refs
            .iter()
            .map(String::as_str)
            .filter(|id| !old.contains(id) && seen.insert(*id))
            .collect();

        let collection = side.counterpart_collection();
        let field = side.counterpart_field();
        let mut report = ReconcileReport::default();

        for counterpart in to_remove {
            match self
                .store
                .pull(collection, counterpart, field, entity_id)
                .await
            {
                Ok(true) => report.unlinked.push(counterpart.to_string()),
                Ok(false) => {
                    debug!(
                        "No {} reference to {} on {} {}",
                        field, entity_id, collection, counterpart
                    );
                    report.unchanged.push(counterpart.to_string());
                }
                Err(e) => {
                    warn!(
                        "Failed to unlink {} from {} {}: {}",
                        entity_id, collection, counterpart, e
                    );
                    report.failed.push(counterpart.to_string());
                }
            }
        }

        for counterpart in to_add {
            match self
                .store
                .add_to_set(collection, counterpart, field, entity_id)
                .await
            {
                Ok(true) => report.linked.push(counterpart.to_string()),
                Ok(false) => {
                    debug!(
                        "{} {} missing or already references {}",
                        collection, counterpart, entity_id
                    );
                    report.unchanged.push(counterpart.to_string());
                }
                Err(e) => {
                    warn!(
                        "Failed to link {} to {} {}: {}",
                        entity_id, collection, counterpart, e
                    );
                    report.failed.push(counterpart.to_string());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{
        StoreError, StoreResult,
        store::{Document, Filter, FindOptions, MemoryStore, to_document},
    };
    use serde_json::{Value, json};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn actor_movies(store: &MemoryStore, actor_id: &str) -> Vec<String> {
        let doc = store
            .find_one(ACTORS, &Filter::by_id(actor_id))
            .await
            .unwrap()
            .unwrap();
        doc.get("movies")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn insert_actor(store: &MemoryStore, id: &str, movies: &[&str]) {
        store
            .insert(ACTORS, to_document(&json!({ "id": id, "movies": movies })).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_links_every_counterpart() {
        let store = MemoryStore::new();
        insert_actor(&store, "a1", &[]).await;
        insert_actor(&store, "a2", &[]).await;
        let maintainer = RelationshipMaintainer::new(Arc::new(store.clone()));

        let report = maintainer
            .reconcile(LinkSide::MovieUpdatingActors, "m1", &[], &ids(&["a1", "a2"]))
            .await;

        assert_eq!(report.linked, ids(&["a1", "a2"]));
        assert!(report.is_complete());
        assert_eq!(actor_movies(&store, "a1").await, ids(&["m1"]));
        assert_eq!(actor_movies(&store, "a2").await, ids(&["m1"]));
    }

    #[tokio::test]
    async fn test_replacement_computes_symmetric_difference() {
        let store = MemoryStore::new();
        insert_actor(&store, "a1", &["m1"]).await;
        insert_actor(&store, "a2", &["m1"]).await;
        insert_actor(&store, "a3", &[]).await;
        let maintainer = RelationshipMaintainer::new(Arc::new(store.clone()));

        let report = maintainer
            .reconcile(
                LinkSide::MovieUpdatingActors,
                "m1",
                &ids(&["a1", "a2"]),
                &ids(&["a2", "a3"]),
            )
            .await;

        assert_eq!(report.unlinked, ids(&["a1"]));
        assert_eq!(report.linked, ids(&["a3"]));
        assert!(actor_movies(&store, "a1").await.is_empty());
        assert_eq!(actor_movies(&store, "a2").await, ids(&["m1"]));
        assert_eq!(actor_movies(&store, "a3").await, ids(&["m1"]));
    }

    #[tokio::test]
    async fn test_repeated_reconcile_is_a_no_op() {
        let store = MemoryStore::new();
        insert_actor(&store, "a1", &[]).await;
        let maintainer = RelationshipMaintainer::new(Arc::new(store.clone()));
        let refs = ids(&["a1"]);

        maintainer
            .reconcile(LinkSide::MovieUpdatingActors, "m1", &[], &refs)
            .await;
        // A stale caller passing an outdated old list must not duplicate
        let report = maintainer
            .reconcile(LinkSide::MovieUpdatingActors, "m1", &[], &refs)
            .await;

        assert_eq!(report.unchanged, ids(&["a1"]));
        assert_eq!(actor_movies(&store, "a1").await, ids(&["m1"]));
    }

    #[tokio::test]
    async fn test_dangling_counterparts_are_skipped() {
        let store = MemoryStore::new();
        insert_actor(&store, "a1", &[]).await;
        let maintainer = RelationshipMaintainer::new(Arc::new(store.clone()));

        let report = maintainer
            .reconcile(
                LinkSide::MovieUpdatingActors,
                "m1",
                &ids(&["ghost-old"]),
                &ids(&["ghost-new", "a1"]),
            )
            .await;

        assert!(report.is_complete());
        assert_eq!(report.linked, ids(&["a1"]));
        assert_eq!(report.unchanged, ids(&["ghost-old", "ghost-new"]));
    }

    #[tokio::test]
    async fn test_actor_side_updates_movies() {
        let store = MemoryStore::new();
        store
            .insert(MOVIES, to_document(&json!({ "id": "m1", "actors": [] })).unwrap())
            .await
            .unwrap();
        let maintainer = RelationshipMaintainer::new(Arc::new(store.clone()));

        maintainer
            .reconcile(LinkSide::ActorUpdatingMovies, "a1", &[], &ids(&["m1"]))
            .await;

        let movie = store
            .find_one(MOVIES, &Filter::by_id("m1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(movie.get("actors"), Some(&json!(["a1"])));
    }

    /// Store that fails every set modification on one id
    struct FlakyStore {
        inner: MemoryStore,
        broken_id: String,
    }

    impl FlakyStore {
        fn check(&self, id: &str) -> StoreResult<()> {
            if id == self.broken_id {
                return Err(StoreError::Configuration("store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
            self.inner.insert(collection, document).await
        }

        async fn find_one(
            &self,
            collection: &str,
            filter: &Filter,
        ) -> StoreResult<Option<Document>> {
            self.inner.find_one(collection, filter).await
        }

        async fn find(
            &self,
            collection: &str,
            filter: &Filter,
            options: &FindOptions,
        ) -> StoreResult<Vec<Document>> {
            self.inner.find(collection, filter, options).await
        }

        async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
            self.inner.count(collection, filter).await
        }

        async fn set_fields(
            &self,
            collection: &str,
            id: &str,
            fields: Document,
        ) -> StoreResult<bool> {
            self.inner.set_fields(collection, id, fields).await
        }

        async fn add_to_set(
            &self,
            collection: &str,
            id: &str,
            field: &str,
            value: &str,
        ) -> StoreResult<bool> {
            self.check(id)?;
            self.inner.add_to_set(collection, id, field, value).await
        }

        async fn pull(
            &self,
            collection: &str,
            id: &str,
            field: &str,
            value: &str,
        ) -> StoreResult<bool> {
            self.check(id)?;
            self.inner.pull(collection, id, field, value).await
        }

        async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
            self.inner.delete(collection, id).await
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_counterpart_failure_does_not_stop_the_rest() {
        let inner = MemoryStore::new();
        insert_actor(&inner, "a1", &["m1"]).await;
        insert_actor(&inner, "a2", &[]).await;
        insert_actor(&inner, "a3", &[]).await;
        let flaky = FlakyStore {
            inner: inner.clone(),
            broken_id: "a2".to_string(),
        };
        let maintainer = RelationshipMaintainer::new(Arc::new(flaky));

        let report = maintainer
            .reconcile(
                LinkSide::MovieUpdatingActors,
                "m1",
                &ids(&["a1"]),
                &ids(&["a2", "a3"]),
            )
            .await;

        assert!(!report.is_complete());
        assert_eq!(report.failed, ids(&["a2"]));
        assert_eq!(report.unlinked, ids(&["a1"]));
        assert_eq!(report.linked, ids(&["a3"]));
        assert!(actor_movies(&inner, "a2").await.is_empty());
        assert_eq!(actor_movies(&inner, "a3").await, ids(&["m1"]));
    }
}
