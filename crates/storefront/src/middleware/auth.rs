//! Admin gate extractors.
//!
//! The admin screens sit behind a single shared password and a session flag.
//! This keeps casual shoppers out of the catalog editor; it is not an
//! authentication system.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Extractor that requires the admin flag in the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_product(
///     _admin: RequireAdmin,
///     Path(id): Path<String>,
/// ) -> Result<StatusCode> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let is_admin = session
            .get::<bool>(session_keys::IS_ADMIN)
            .await?
            .unwrap_or(false);

        if is_admin {
            Ok(Self)
        } else {
            Err(AppError::Unauthorized("admin login required".to_string()))
        }
    }
}

/// Compare a submitted password with the configured one.
#[must_use]
pub fn password_matches(configured: &SecretString, candidate: &str) -> bool {
    configured.expose_secret() == candidate
}

/// Set the admin flag in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::IS_ADMIN, true).await
}

/// Clear the admin flag from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<bool>(session_keys::IS_ADMIN).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_matches_exactly() {
        let configured = SecretString::from("12346");
        assert!(password_matches(&configured, "12346"));
        assert!(!password_matches(&configured, "12346 "));
        assert!(!password_matches(&configured, ""));
    }
}
