//! Document store abstraction
//!
//! A collection-oriented store keyed by opaque string identifiers. Every
//! document carries its identifier in a string `id` field. The store offers
//! filtered queries, partial field updates and the two set-modification
//! operators the catalog relies on (add-unique-to-array and
//! remove-from-array). Each call is atomic on its own; there are no
//! multi-document transactions.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored document
pub type Document = Map<String, Value>;

/// Query filter over document fields
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals the given JSON value
    Eq(String, Value),
    /// Array field contains the given string
    Contains(String, String),
    /// String field contains the needle, ignoring case
    ContainsText(String, String),
    /// At least one of the filters matches
    Or(Vec<Filter>),
    /// Every filter matches
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    pub fn contains_text(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::ContainsText(field.into(), needle.into())
    }

    pub fn by_id(id: &str) -> Self {
        Filter::eq("id", id)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Single-field sort
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }
}

/// Options for `DocumentStore::find`
///
/// Without a sort, documents come back in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn page(skip: u64, limit: u64) -> Self {
        Self {
            sort: None,
            skip,
            limit: Some(limit),
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// The abstract document store interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document; it must carry a string `id` field
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Return the first document matching the filter
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Return every document matching the filter, honoring sort, skip and limit
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Count the documents matching the filter
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Overwrite the given top-level fields of one document.
    /// Returns false when no document has that id.
    async fn set_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<bool>;

    /// Append `value` to the array `field` unless already present.
    /// Returns true only when the document was modified.
    async fn add_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<bool>;

    /// Remove every occurrence of `value` from the array `field`.
    /// Returns true only when the document was modified.
    async fn pull(&self, collection: &str, id: &str, field: &str, value: &str)
    -> StoreResult<bool>;

    /// Delete one document. Returns false when no document has that id.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Check that the store is reachable
    async fn health_check(&self) -> bool;
}

/// Convert a typed record into a document
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Convert a document back into a typed record
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Read the identifier of a document
pub(crate) fn document_id(document: &Document) -> StoreResult<String> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidDocument("missing string `id` field".to_string()))
}
