//! shopyZ Core - catalog, cart and checkout state.
//!
//! This crate provides the storefront's domain types and the pure state
//! transitions over them:
//! - [`catalog`] - the catalog store and the filter/sort pipeline
//! - [`cart`] - the cart ledger
//! - [`checkout`] - form validation, delivery pricing and the order summary
//! - [`region`] - per-wilaya delivery rates
//! - [`favorites`] - liked products
//!
//! # Architecture
//!
//! The core crate contains only types and transitions - no I/O, no database
//! access, no HTTP clients. Persistence and text generation live in the
//! storefront crate behind traits.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod favorites;
pub mod product;
pub mod region;
pub mod seed;
pub mod types;

pub use cart::{CartLedger, CartLine};
pub use catalog::{Catalog, CatalogQuery, SortKey, search_suggestions};
pub use chat::{ChatMessage, ChatRole};
pub use checkout::{CheckoutError, CheckoutField, CheckoutForm, OrderSummary, Quote};
pub use favorites::Favorites;
pub use product::{NewReview, Product, ProductDraft, ProductError, Review, ReviewError, parse_image_urls};
pub use region::{DeliveryMethod, RegionRate, RegionTable};
pub use types::*;
