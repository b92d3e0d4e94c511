//! In-memory document store for tests and local development

use async_trait::async_trait;
use serde_json::Value;
use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Filter, FindOptions, SortOrder, document_id};
use crate::error::StoreResult;

/// Document store keeping every collection in an insertion-ordered vector
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(document: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq(field, value) => document.get(field) == Some(value),
        Filter::Contains(field, value) => document
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value))),
        Filter::ContainsText(field, needle) => document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
        Filter::Or(filters) => filters.iter().any(|f| matches(document, f)),
        Filter::And(filters) => filters.iter().all(|f| matches(document, f)),
    }
}

// Missing and null fields sort first, mirroring an ascending SQL NULLS FIRST.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        document_id(&document)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, filter)))
            .cloned())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &options.sort {
            // Stable sort keeps insertion order between equal keys
            found.sort_by(|a, b| {
                let ordering = compare_field(a.get(&sort.field), b.get(&sort.field));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(found.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn set_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(doc, &Filter::by_id(id))))
        else {
            return Ok(false);
        };

        for (key, value) in fields {
            if key != "id" {
                document.insert(key, value);
            }
        }
        Ok(true)
    }

    async fn add_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(doc, &Filter::by_id(id))))
        else {
            return Ok(false);
        };

        let entry = document
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }

        match entry.as_array_mut() {
            Some(items) if !items.iter().any(|item| item.as_str() == Some(value)) => {
                items.push(Value::String(value.to_string()));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pull(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(items) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(doc, &Filter::by_id(id))))
            .and_then(|doc| doc.get_mut(field))
            .and_then(Value::as_array_mut)
        else {
            return Ok(false);
        };

        let before = items.len();
        items.retain(|item| item.as_str() != Some(value));
        Ok(items.len() != before)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|doc| !matches(doc, &Filter::by_id(id)));
        Ok(docs.len() != before)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Sort, to_document};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        to_document(&value).unwrap()
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(
                "movies",
                doc(json!({
                    "id": "m1",
                    "title": "Inception",
                    "description": "Dream heist",
                    "actors": ["a1"],
                    "is_favorite": true,
                    "created_at": "2024-01-01T00:00:00.000000Z"
                })),
            )
            .await
            .unwrap();
        store
            .insert(
                "movies",
                doc(json!({
                    "id": "m2",
                    "title": "Titanic",
                    "description": null,
                    "actors": [],
                    "is_favorite": false,
                    "created_at": "2024-03-01T00:00:00.000000Z"
                })),
            )
            .await
            .unwrap();
        store
            .insert(
                "movies",
                doc(json!({
                    "id": "m3",
                    "title": "La La Land",
                    "description": "A jazz pianist dreams big",
                    "actors": ["a1", "a2"],
                    "is_favorite": true,
                    "created_at": "2024-02-01T00:00:00.000000Z"
                })),
            )
            .await
            .unwrap();
        store
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter()
            .map(|d| d.get("id").and_then(Value::as_str).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_insert_requires_id() {
        let store = MemoryStore::new();
        let result = store.insert("movies", doc(json!({ "title": "x" }))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = seeded().await;
        let all = store
            .find("movies", &Filter::All, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(ids(&all), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_find_with_sort_skip_limit() {
        let store = seeded().await;

        let newest = store
            .find(
                "movies",
                &Filter::All,
                &FindOptions::limit(2).sorted(Sort::descending("created_at")),
            )
            .await
            .unwrap();
        assert_eq!(ids(&newest), vec!["m2", "m3"]);

        let page = store
            .find("movies", &Filter::All, &FindOptions::page(1, 1))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["m2"]);

        let oldest = store
            .find(
                "movies",
                &Filter::All,
                &FindOptions::default().sorted(Sort::ascending("created_at")),
            )
            .await
            .unwrap();
        assert_eq!(ids(&oldest), vec!["m1", "m3", "m2"]);
    }

    #[tokio::test]
    async fn test_filters() {
        let store = seeded().await;
        let opts = FindOptions::default();

        let favorites = store
            .find("movies", &Filter::eq("is_favorite", true), &opts)
            .await
            .unwrap();
        assert_eq!(ids(&favorites), vec!["m1", "m3"]);

        let with_a2 = store
            .find("movies", &Filter::contains("actors", "a2"), &opts)
            .await
            .unwrap();
        assert_eq!(ids(&with_a2), vec!["m3"]);

        let dreams = store
            .find(
                "movies",
                &Filter::Or(vec![
                    Filter::contains_text("title", "DREAM"),
                    Filter::contains_text("description", "DREAM"),
                ]),
                &opts,
            )
            .await
            .unwrap();
        assert_eq!(ids(&dreams), vec!["m1", "m3"]);

        let both = store
            .find(
                "movies",
                &Filter::And(vec![
                    Filter::contains("actors", "a1"),
                    Filter::contains_text("title", "incep"),
                ]),
                &opts,
            )
            .await
            .unwrap();
        assert_eq!(ids(&both), vec!["m1"]);

        assert_eq!(store.count("movies", &Filter::All).await.unwrap(), 3);
        assert_eq!(store.count("actors", &Filter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_fields_keeps_id() {
        let store = seeded().await;
        let updated = store
            .set_fields(
                "movies",
                "m2",
                doc(json!({ "id": "hijack", "title": "Titanic (1997)", "description": null })),
            )
            .await
            .unwrap();
        assert!(updated);

        let found = store
            .find_one("movies", &Filter::by_id("m2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("title"), Some(&json!("Titanic (1997)")));
        assert_eq!(found.get("id"), Some(&json!("m2")));

        assert!(
            !store
                .set_fields("movies", "missing", Document::new())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_add_to_set_is_idempotent() {
        let store = seeded().await;

        assert!(store.add_to_set("movies", "m2", "actors", "a9").await.unwrap());
        assert!(!store.add_to_set("movies", "m2", "actors", "a9").await.unwrap());
        assert!(!store.add_to_set("movies", "nope", "actors", "a9").await.unwrap());

        let found = store
            .find_one("movies", &Filter::by_id("m2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("actors"), Some(&json!(["a9"])));
    }

    #[tokio::test]
    async fn test_add_to_set_creates_missing_array() {
        let store = seeded().await;
        assert!(store.add_to_set("movies", "m1", "genres", "g1").await.unwrap());

        let found = store
            .find_one("movies", &Filter::by_id("m1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("genres"), Some(&json!(["g1"])));
    }

    #[tokio::test]
    async fn test_pull_is_idempotent() {
        let store = seeded().await;

        assert!(store.pull("movies", "m3", "actors", "a1").await.unwrap());
        assert!(!store.pull("movies", "m3", "actors", "a1").await.unwrap());
        assert!(!store.pull("movies", "nope", "actors", "a1").await.unwrap());

        let found = store
            .find_one("movies", &Filter::by_id("m3"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("actors"), Some(&json!(["a2"])));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded().await;
        assert!(store.delete("movies", "m1").await.unwrap());
        assert!(!store.delete("movies", "m1").await.unwrap());
        assert!(!store.delete("actors", "m1").await.unwrap());
        assert_eq!(store.count("movies", &Filter::All).await.unwrap(), 2);
    }
}
