//! Product persistence for the storefront catalog.
//!
//! The catalog is a document store: each product is saved whole, and a single
//! flag records whether the bundled catalog has ever been seeded.
//!
//! Two stores implement [`ProductStore`]:
//!
//! - [`MemoryProductStore`] - process-local, used when no database URL is set
//! - [`PgProductStore`] - `PostgreSQL`, one JSONB document per product
//!
//! # Tables
//!
//! - `products` - Product documents, ordered by `position` (newest first)
//! - `settings` - Key/value flags (`catalog_seeded`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shopyz-cli -- migrate
//! ```

pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopyz_core::{Product, ProductId};

pub use memory::MemoryProductStore;
pub use products::PgProductStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence collaborator for the product catalog.
///
/// Products come back in catalog order: a newly added id goes to the front,
/// and overwrites keep their position. Writes replace the whole document;
/// concurrent writers are not coordinated.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All stored products.
    async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Whether the bundled catalog has been written once already.
    async fn is_seeded(&self) -> Result<bool, RepositoryError>;

    /// Record that seeding happened. Idempotent.
    async fn mark_as_seeded(&self) -> Result<(), RepositoryError>;

    /// Save a product under its id, overwriting any existing document.
    ///
    /// A new id is placed first in catalog order.
    async fn add_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Overwrite an existing product.
    ///
    /// Fails with [`RepositoryError::NotFound`] if the id is unknown.
    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Delete a product. Unknown ids are not an error.
    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
