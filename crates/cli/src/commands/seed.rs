//! Catalog seeding commands.
//!
//! Seeding follows the storefront's startup rule: the bundled products are
//! written only when the store is empty and has never been seeded. Running
//! the command twice is harmless.

use tracing::info;

use shopyz_core::seed;
use shopyz_storefront::db::{self, PgProductStore, ProductStore};
use shopyz_storefront::services::seed_store;

use super::{CommandError, database_url};

/// Seed the bundled catalog.
///
/// Unlike the storefront bootstrap, a failed write is an error here.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a store call fails.
pub async fn catalog() -> Result<(), CommandError> {
    let store = connect().await?;

    let products = store.fetch_products().await?;
    if !products.is_empty() || store.is_seeded().await? {
        info!(products = products.len(), "Store already seeded, nothing written");
        return Ok(());
    }

    let defaults = seed::default_products();
    seed_store(&store, &defaults).await?;
    info!(products = defaults.len(), "Catalog seeded");
    Ok(())
}

/// Log the products currently in the store.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the fetch fails.
pub async fn list() -> Result<(), CommandError> {
    let store = connect().await?;

    let products = store.fetch_products().await?;
    info!(
        products = products.len(),
        seeded = store.is_seeded().await?,
        "Stored products"
    );
    for product in &products {
        info!("  {} | {} | {} | {}", product.id, product.name, product.category, product.price);
    }
    Ok(())
}

async fn connect() -> Result<PgProductStore, CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");
    Ok(PgProductStore::new(pool))
}
