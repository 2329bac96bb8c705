//! Process-local product store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use shopyz_core::{Product, ProductId};

use super::{ProductStore, RepositoryError};

/// In-memory [`ProductStore`].
///
/// Contents live as long as the process. Used when no database is configured
/// and by tests.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    products: Vec<Product>,
    seeded: bool,
}

impl MemoryProductStore {
    /// An empty, unseeded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `products` and the given seeded flag.
    #[must_use]
    pub fn with_products(products: Vec<Product>, seeded: bool) -> Self {
        Self {
            inner: RwLock::new(MemoryInner { products, seeded }),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn fetch_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.inner.read().await.products.clone())
    }

    async fn is_seeded(&self) -> Result<bool, RepositoryError> {
        Ok(self.inner.read().await.seeded)
    }

    async fn mark_as_seeded(&self) -> Result<(), RepositoryError> {
        self.inner.write().await.seeded = true;
        Ok(())
    }

    async fn add_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        match inner.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => existing.clone_from(product),
            None => inner.products.insert(0, product.clone()),
        }
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(RepositoryError::NotFound)?;
        existing.clone_from(product);
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError> {
        self.inner.write().await.products.retain(|p| &p.id != id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shopyz_core::Price;
    use shopyz_core::seed::default_products;

    use super::*;

    #[tokio::test]
    async fn test_seeded_flag_round_trip() {
        let store = MemoryProductStore::new();
        assert!(!store.is_seeded().await.unwrap());
        store.mark_as_seeded().await.unwrap();
        store.mark_as_seeded().await.unwrap();
        assert!(store.is_seeded().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_puts_new_ids_first_and_overwrites_in_place() {
        let store = MemoryProductStore::new();
        let products = default_products();
        for p in &products {
            store.add_product(p).await.unwrap();
        }

        let mut changed = products[0].clone();
        changed.price = Price::from_dinar(1);
        store.add_product(&changed).await.unwrap();

        let fetched = store.fetch_products().await.unwrap();
        assert_eq!(fetched.len(), products.len());
        assert_eq!(fetched[0].id, products[products.len() - 1].id);
        let last = fetched.last().unwrap();
        assert_eq!(last.id, products[0].id);
        assert_eq!(last.price, Price::from_dinar(1));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryProductStore::new();
        let product = default_products().remove(0);
        let err = store.update_product(&product).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryProductStore::with_products(default_products(), true);
        let id = ProductId::new("1");
        store.delete_product(&id).await.unwrap();
        store.delete_product(&id).await.unwrap();
        let fetched = store.fetch_products().await.unwrap();
        assert!(fetched.iter().all(|p| p.id != id));
    }
}
