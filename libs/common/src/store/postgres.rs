//! PostgreSQL document store
//!
//! Documents live in a single `documents` table as JSONB, keyed by
//! `(collection, id)`. `seq` records insertion order, which is the natural
//! order of unsorted queries. Filters are compiled to JSONB operators with
//! every value bound as a parameter.

use async_trait::async_trait;
use serde_json::{Value, json};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, types::Json};
use tracing::info;

use super::{Document, DocumentStore, Filter, FindOptions, SortOrder, document_id};
use crate::{
    database,
    error::{StoreError, StoreResult},
};

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store on top of an initialized pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the store and make sure its table exists
    pub async fn connect(pool: PgPool) -> StoreResult<Self> {
        database::ensure_schema(&pool).await?;
        info!("PostgreSQL document store ready");
        Ok(Self::new(pool))
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            builder.push("TRUE");
        }
        Filter::Eq(field, value) => {
            builder
                .push("body -> ")
                .push_bind(field.clone())
                .push(" = ")
                .push_bind(Json(value.clone()));
        }
        Filter::Contains(field, value) => {
            builder
                .push("COALESCE(body -> ")
                .push_bind(field.clone())
                .push(", '[]'::jsonb) @> ")
                .push_bind(Json(json!([value])));
        }
        Filter::ContainsText(field, needle) => {
            builder
                .push("strpos(lower(body ->> ")
                .push_bind(field.clone())
                .push("), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        Filter::Or(filters) => push_group(builder, filters, " OR ", "FALSE"),
        Filter::And(filters) => push_group(builder, filters, " AND ", "TRUE"),
    }
}

fn push_group(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[Filter],
    separator: &str,
    empty: &str,
) {
    if filters.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push("(");
    for (index, filter) in filters.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_filter(builder, filter);
    }
    builder.push(")");
}

fn scoped(sql: &str, collection: &str, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(sql);
    builder
        .push(" WHERE collection = ")
        .push_bind(collection.to_string())
        .push(" AND ");
    push_filter(&mut builder, filter);
    builder
}

fn into_document(value: Value) -> StoreResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "stored body is not an object: {}",
            other
        ))),
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let mut builder = scoped("SELECT body FROM documents", collection, filter);
        builder.push(" ORDER BY seq LIMIT 1");

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        row.map(|row| {
            let Json(body): Json<Value> = row.try_get("body").map_err(StoreError::Query)?;
            into_document(body)
        })
        .transpose()
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let mut builder = scoped("SELECT body FROM documents", collection, filter);

        builder.push(" ORDER BY ");
        if let Some(sort) = &options.sort {
            builder.push("body ->> ").push_bind(sort.field.clone());
            builder.push(match sort.order {
                SortOrder::Ascending => " ASC NULLS FIRST, ",
                SortOrder::Descending => " DESC NULLS LAST, ",
            });
        }
        builder.push("seq");

        if let Some(limit) = options.limit {
            builder.push(" LIMIT ").push_bind(to_i64(limit));
        }
        builder.push(" OFFSET ").push_bind(to_i64(options.skip));

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        rows.into_iter()
            .map(|row| {
                let Json(body): Json<Value> = row.try_get("body").map_err(StoreError::Query)?;
                into_document(body)
            })
            .collect()
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut builder = scoped("SELECT COUNT(*) AS total FROM documents", collection, filter);

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::Query)?;
        let total: i64 = row.try_get("total").map_err(StoreError::Query)?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn set_fields(&self, collection: &str, id: &str, mut fields: Document) -> StoreResult<bool> {
        fields.remove("id");

        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(fields)))
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3::text],
                CASE WHEN jsonb_typeof(body -> $3) = 'array' THEN body -> $3 ELSE '[]'::jsonb END
                    || jsonb_build_array($4::text)
            )
            WHERE collection = $1
              AND id = $2
              AND NOT (
                  jsonb_typeof(body -> $3) = 'array'
                  AND body -> $3 @> jsonb_build_array($4::text)
              )
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn pull(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3::text],
                COALESCE(
                    (SELECT jsonb_agg(item)
                     FROM jsonb_array_elements(body -> $3) AS item
                     WHERE item <> to_jsonb($4::text)),
                    '[]'::jsonb
                )
            )
            WHERE collection = $1
              AND id = $2
              AND jsonb_typeof(body -> $3) = 'array'
              AND body -> $3 @> jsonb_build_array($4::text)
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        database::health_check(&self.pool).await
    }
}
