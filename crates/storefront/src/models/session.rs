//! Session-related types.
//!
//! Per-shopper state lives in the session rather than in shared state, so
//! each request reads, transitions and writes back its own copy.

use serde::de::DeserializeOwned;
use tower_sessions::Session;

/// Session keys for shopper state.
pub mod keys {
    /// Key for the shopper's [`shopyz_core::CartLedger`].
    pub const CART: &str = "cart";

    /// Key for the shopper's [`shopyz_core::Favorites`].
    pub const FAVORITES: &str = "favorites";

    /// Key for the admin screen flag.
    pub const IS_ADMIN: &str = "is_admin";
}

/// Read a session value, falling back to `T::default()` when absent.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value no longer
/// deserializes.
pub async fn load_or_default<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}
