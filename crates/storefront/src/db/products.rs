//! `PostgreSQL` product store.
//!
//! Products are stored as JSONB documents keyed by id. Queries are checked at
//! runtime so the crate builds without a live database.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::types::Json;

use shopyz_core::{Product, ProductId};

use super::{ProductStore, RepositoryError};

/// Settings key for the seeded flag.
const SEEDED_KEY: &str = "catalog_seeded";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    document: JsonValue,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let product: Self = serde_json::from_value(row.document).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product document {}: {e}", row.id))
        })?;

        if product.id.as_str() != row.id {
            return Err(RepositoryError::DataCorruption(format!(
                "product document id {} stored under {}",
                product.id, row.id
            )));
        }

        Ok(product)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// [`ProductStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, document FROM products
            ORDER BY position
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn is_seeded(&self) -> Result<bool, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            r"
            SELECT value FROM settings
            WHERE key = $1
            ",
        )
        .bind(SEEDED_KEY)
        .fetch_optional(&self.pool)
        .await?;

        Ok(matches!(value, Some(JsonValue::Bool(true))))
    }

    async fn mark_as_seeded(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(SEEDED_KEY)
        .bind(JsonValue::Bool(true))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_product(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO products (id, document, position)
            VALUES ($1, $2, (SELECT COALESCE(MIN(position), 0) - 1 FROM products))
            ON CONFLICT (id) DO UPDATE SET document = $2, updated_at = NOW()
            ",
        )
        .bind(product.id.as_str())
        .bind(Json(product))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET document = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(product.id.as_str())
        .bind(Json(product))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
