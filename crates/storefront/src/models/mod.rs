//! Session-held shopper state.

pub mod session;

pub use session::{keys as session_keys, load_or_default};
