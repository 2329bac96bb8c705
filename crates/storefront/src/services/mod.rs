//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Catalog bootstrap and admin mutations over the product store
//! - `assistant` - Generated pitches, descriptions and chat replies
//! - `dispatch` - Order mail hand-off

pub mod assistant;
pub mod catalog;
pub mod dispatch;

pub use assistant::{Assistant, AssistantError, Copywriter};
pub use catalog::{CatalogError, CatalogService, load_catalog, seed_store};
pub use dispatch::{MailDispatcher, MailHandoff};
