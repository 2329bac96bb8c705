//! Catalog store service: startup bootstrap and admin mutations.
//!
//! The in-memory [`Catalog`] is the read path for every listing. Mutations go
//! to the [`ProductStore`] first and are applied in memory only once the
//! store call succeeds.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{error, info, instrument, warn};

use shopyz_core::seed::default_products;
use shopyz_core::{
    Catalog, NewReview, Product, ProductDraft, ProductError, ProductId, ReviewError,
};

use crate::db::{ProductStore, RepositoryError};

/// Errors from catalog mutations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("product {0}")]
    NotFound(ProductId),
}

/// Catalog handle shared by all requests.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ProductStore>,
    catalog: Arc<RwLock<Catalog>>,
}

impl CatalogService {
    /// A service whose catalog reports loading until [`Self::bootstrap`] runs.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            catalog: Arc::new(RwLock::new(Catalog::loading())),
        }
    }

    /// The persistence collaborator.
    #[must_use]
    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    /// Read access to the current catalog.
    pub async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().await
    }

    /// Clone of a single product as currently held.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.catalog.read().await.get(id).cloned()
    }

    /// Spawn [`Self::bootstrap`] on the runtime.
    pub fn start_bootstrap(&self) {
        info!("Spawning background catalog bootstrap task");
        let service = self.clone();
        tokio::spawn(async move {
            service.bootstrap().await;
        });
    }

    /// Populate the catalog from the store.
    ///
    /// A failed fetch is logged and leaves the catalog empty. Either way the
    /// catalog stops reporting loading.
    pub async fn bootstrap(&self) {
        let products = match load_catalog(self.store.as_ref()).await {
            Ok(products) => {
                info!(count = products.len(), "Catalog loaded");
                products
            }
            Err(e) => {
                error!(error = %e, "Catalog bootstrap failed, serving an empty catalog");
                Vec::new()
            }
        };

        self.catalog.write().await.set_loaded(products);
    }

    /// Create a product from an admin draft and put it first in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Product`] for an invalid draft or
    /// [`CatalogError::Repository`] if the store rejects the write.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = draft.into_product(ProductId::generate(Utc::now()), None)?;

        self.store.add_product(&product).await?;
        self.catalog.write().await.insert(product.clone());

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields from an admin draft. Reviews are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, plus the errors of
    /// [`Self::create`].
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        let existing = self
            .get(id)
            .await
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let product = draft.into_product(id.clone(), existing.reviews)?;

        self.persist_update(product).await
    }

    /// Delete a product. Deleting an unknown id succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] if the store rejects the delete;
    /// the catalog is left unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.store.delete_product(id).await?;

        if self.catalog.write().await.remove(id).is_some() {
            info!("Product deleted");
        } else {
            warn!("Delete requested for a product not in the catalog");
        }
        Ok(())
    }

    /// Append a shopper review to a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Review`] for invalid input,
    /// [`CatalogError::NotFound`] for an unknown id, or
    /// [`CatalogError::Repository`] if the store rejects the write.
    #[instrument(skip(self, review), fields(product_id = %id))]
    pub async fn add_review(
        &self,
        id: &ProductId,
        review: NewReview,
    ) -> Result<Product, CatalogError> {
        let review = review.into_review(Utc::now())?;
        let mut product = self
            .get(id)
            .await
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        product.push_review(review);

        self.persist_update(product).await
    }

    async fn persist_update(&self, product: Product) -> Result<Product, CatalogError> {
        match self.store.update_product(&product).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(CatalogError::NotFound(product.id)),
            Err(e) => return Err(e.into()),
        }

        if !self.catalog.write().await.replace(product.clone()) {
            // Deleted concurrently; the store write already happened.
            warn!(product_id = %product.id, "Updated product no longer in catalog");
        }
        Ok(product)
    }
}

/// Fetch the catalog, seeding the bundled products on first run.
///
/// Seeding happens only when the store is empty and has never been seeded,
/// so a catalog emptied by an admin stays empty. The bundled products are
/// returned even if writing them to the store fails; the next start retries
/// the seed.
///
/// # Errors
///
/// Returns the error of the initial fetch or seeded-flag read.
#[instrument(skip_all)]
pub async fn load_catalog(store: &dyn ProductStore) -> Result<Vec<Product>, RepositoryError> {
    let products = store.fetch_products().await?;
    let seeded = store.is_seeded().await?;

    if !products.is_empty() || seeded {
        return Ok(products);
    }

    info!("Running first-time catalog seed");
    let defaults = default_products();
    if let Err(e) = seed_store(store, &defaults).await {
        error!(error = %e, "Seeding the store failed, serving the bundled catalog");
    }

    Ok(defaults)
}

/// Write `products` to the store so that it returns them in the given
/// order, then set the seeded flag.
///
/// # Errors
///
/// Returns the first store error; the flag is only set once every product
/// has been written.
pub async fn seed_store(store: &dyn ProductStore, products: &[Product]) -> Result<(), RepositoryError> {
    // Each add goes to the front
    for product in products.iter().rev() {
        store.add_product(product).await?;
    }
    store.mark_as_seeded().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use async_trait::async_trait;
    use shopyz_core::Price;

    use super::*;
    use crate::db::MemoryProductStore;

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl ProductStore for BrokenStore {
        async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
        async fn is_seeded(&self) -> Result<bool, RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
        async fn mark_as_seeded(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
        async fn add_product(&self, _product: &Product) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
        async fn update_product(&self, _product: &Product) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
        async fn delete_product(&self, _id: &ProductId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("offline".to_string()))
        }
    }

    /// Store that reads as empty and unseeded but rejects every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl ProductStore for ReadOnlyStore {
        async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError> {
            Ok(Vec::new())
        }
        async fn is_seeded(&self) -> Result<bool, RepositoryError> {
            Ok(false)
        }
        async fn mark_as_seeded(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("read only".to_string()))
        }
        async fn add_product(&self, _product: &Product) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("read only".to_string()))
        }
        async fn update_product(&self, _product: &Product) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("read only".to_string()))
        }
        async fn delete_product(&self, _id: &ProductId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Conflict("read only".to_string()))
        }
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Price::from_dinar(42),
            images: vec!["https://img.example/new.jpg".to_string()],
            ..ProductDraft::default()
        }
    }

    async fn loaded_service() -> CatalogService {
        let service = CatalogService::new(Arc::new(MemoryProductStore::new()));
        service.bootstrap().await;
        service
    }

    #[tokio::test]
    async fn test_empty_unseeded_store_gets_defaults() {
        let store = MemoryProductStore::new();
        let products = load_catalog(&store).await.unwrap();

        assert_eq!(products, default_products());
        assert!(store.is_seeded().await.unwrap());
        assert_eq!(store.fetch_products().await.unwrap().len(), products.len());
    }

    #[tokio::test]
    async fn test_empty_seeded_store_stays_empty() {
        let store = MemoryProductStore::with_products(Vec::new(), true);
        assert!(load_catalog(&store).await.unwrap().is_empty());
        assert!(store.fetch_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_empty_store_used_verbatim() {
        let mut existing = default_products();
        existing.truncate(1);
        let store = MemoryProductStore::with_products(existing.clone(), false);
        assert_eq!(load_catalog(&store).await.unwrap(), existing);
        assert!(!store.is_seeded().await.unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_failure_leaves_empty_loaded_catalog() {
        let service = CatalogService::new(Arc::new(BrokenStore));
        assert!(service.read().await.is_loading());

        service.bootstrap().await;
        let catalog = service.read().await;
        assert!(!catalog.is_loading());
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_failed_seed_writes_still_serve_defaults() {
        assert_eq!(load_catalog(&ReadOnlyStore).await.unwrap(), default_products());

        let service = CatalogService::new(Arc::new(ReadOnlyStore));
        service.bootstrap().await;
        let catalog = service.read().await;
        assert!(!catalog.is_loading());
        assert_eq!(catalog.products(), default_products().as_slice());
    }

    #[tokio::test]
    async fn test_seed_keeps_bundled_order_in_store() {
        let store = MemoryProductStore::new();
        load_catalog(&store).await.unwrap();
        assert_eq!(store.fetch_products().await.unwrap(), default_products());
    }

    #[tokio::test]
    async fn test_created_product_stays_first_after_restart() {
        let store = Arc::new(MemoryProductStore::new());
        let service = CatalogService::new(store.clone());
        service.bootstrap().await;
        let product = service.create(draft("Desk Pad")).await.unwrap();

        let restarted = CatalogService::new(store);
        restarted.bootstrap().await;
        let catalog = restarted.read().await;
        assert_eq!(catalog.products()[0].id, product.id);
        assert_eq!(catalog.products().len(), default_products().len() + 1);
    }

    #[tokio::test]
    async fn test_create_prepends_and_persists() {
        let service = loaded_service().await;
        let product = service.create(draft("Desk Pad")).await.unwrap();

        assert!(product.id.as_str().starts_with("prod_"));
        assert_eq!(service.read().await.products()[0].id, product.id);
        let stored = service.store().fetch_products().await.unwrap();
        assert!(stored.iter().any(|p| p.id == product.id));
    }

    #[tokio::test]
    async fn test_create_without_images_rejected() {
        let service = loaded_service().await;
        let before = service.read().await.products().len();
        let result = service
            .create(ProductDraft {
                images: Vec::new(),
                ..draft("Ghost")
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Product(ProductError::NoImages))));
        assert_eq!(service.read().await.products().len(), before);
    }

    #[tokio::test]
    async fn test_update_keeps_reviews_and_replaces_in_place() {
        let service = loaded_service().await;
        let id = ProductId::new("1");
        let reviews_before = service.get(&id).await.unwrap().reviews().len();

        let updated = service.update(&id, draft("Renamed Watch")).await.unwrap();
        assert_eq!(updated.reviews().len(), reviews_before);

        let catalog = service.read().await;
        assert_eq!(catalog.products()[0].name, "Renamed Watch");
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let service = loaded_service().await;
        let result = service.update(&ProductId::new("nope"), draft("X")).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_store_write_leaves_catalog_unchanged() {
        let service = CatalogService {
            store: Arc::new(BrokenStore),
            catalog: Arc::new(RwLock::new(Catalog::loaded(default_products()))),
        };

        assert!(service.create(draft("New")).await.is_err());
        assert!(service.delete(&ProductId::new("1")).await.is_err());
        assert!(
            service
                .update(&ProductId::new("2"), draft("Changed"))
                .await
                .is_err()
        );
        assert_eq!(service.read().await.products(), default_products().as_slice());
    }

    #[tokio::test]
    async fn test_delete_then_restart_does_not_reseed() {
        let store = Arc::new(MemoryProductStore::new());
        let service = CatalogService::new(store.clone());
        service.bootstrap().await;
        for product in default_products() {
            service.delete(&product.id).await.unwrap();
        }

        let restarted = CatalogService::new(store);
        restarted.bootstrap().await;
        assert!(restarted.read().await.products().is_empty());
    }

    #[tokio::test]
    async fn test_add_review_appends_unverified() {
        let service = loaded_service().await;
        let id = ProductId::new("2");
        let before = service.get(&id).await.unwrap().reviews().len();

        let product = service
            .add_review(
                &id,
                NewReview {
                    user_name: "Yacine".to_string(),
                    rating: 4,
                    comment: "Solid sound".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(product.reviews().len(), before + 1);
        let last = product.reviews().last().unwrap();
        assert!(!last.is_verified);
        assert_eq!(service.get(&id).await.unwrap(), product);
    }

    #[tokio::test]
    async fn test_empty_review_rejected_without_change() {
        let service = loaded_service().await;
        let id = ProductId::new("2");
        let before = service.get(&id).await.unwrap();

        let result = service
            .add_review(
                &id,
                NewReview {
                    user_name: "Yacine".to_string(),
                    rating: 4,
                    comment: "  ".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::Review(ReviewError::EmptyComment))));
        assert_eq!(service.get(&id).await.unwrap(), before);
    }
}
