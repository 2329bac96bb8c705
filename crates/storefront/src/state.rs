//! Application state shared across handlers.

use std::sync::Arc;

use shopyz_core::RegionTable;

use crate::config::StorefrontConfig;
use crate::db::ProductStore;
use crate::middleware::SessionLocks;
use crate::services::{Assistant, CatalogService, Copywriter, MailDispatcher};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, collaborators and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogService,
    assistant: Assistant,
    regions: RegionTable,
    dispatcher: MailDispatcher,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The catalog starts out loading; call [`Self::start_catalog_bootstrap`]
    /// to populate it.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Product persistence collaborator
    /// * `copywriter` - Text generator, if configured
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn ProductStore>,
        copywriter: Option<Arc<dyn Copywriter>>,
    ) -> Self {
        let dispatcher = MailDispatcher::new(config.order_recipient.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: CatalogService::new(store),
                assistant: Assistant::new(copywriter),
                regions: RegionTable::default(),
                dispatcher,
                session_locks: SessionLocks::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the assistant.
    #[must_use]
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }

    /// Get a reference to the delivery region table.
    #[must_use]
    pub fn regions(&self) -> &RegionTable {
        &self.inner.regions
    }

    /// Get a reference to the order mail dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &MailDispatcher {
        &self.inner.dispatcher
    }

    /// Get a reference to the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Start loading the catalog in the background.
    ///
    /// Until it finishes, listings report `loading: true`.
    pub fn start_catalog_bootstrap(&self) {
        self.inner.catalog.start_bootstrap();
    }

    /// Public link to a product page.
    #[must_use]
    pub fn share_url(&self, id: &shopyz_core::ProductId) -> String {
        format!("{}/product/{id}", self.inner.config.base_url)
    }
}
