//! Core value types for shopyZ.
//!
//! This module provides type-safe wrappers for ids, prices, categories and
//! shopper-facing languages.

pub mod category;
pub mod id;
pub mod language;
pub mod price;

pub use category::{Category, CategoryFilter, UnknownCategory};
pub use id::*;
pub use language::Language;
pub use price::{CURRENCY_CODE, Price};
