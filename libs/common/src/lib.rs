//! Common library for the MovieHub catalog
//!
//! This crate provides shared functionality used across the services of the
//! catalog: the document store contract and its backends, PostgreSQL
//! connectivity, timestamp persistence and the shared error types.
//!
//! Opening the PostgreSQL-backed store:
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool};
//! use common::store::{DocumentStore, PgDocumentStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let store = PgDocumentStore::connect(pool).await?;
//!     println!("Store health check: {}", store.health_check().await);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod store;
pub mod timestamp;

pub use error::{StoreError, StoreResult};
pub use store::{DocumentStore, Filter, FindOptions, MemoryStore, PgDocumentStore, Sort};
