//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session lock (one request per session cookie at a time)
//! 4. Session layer (tower-sessions with in-memory store)

pub mod auth;
pub mod session;
pub mod session_lock;

pub use auth::{RequireAdmin, clear_admin, password_matches, set_admin};
pub use session::create_session_layer;
pub use session_lock::{SessionLocks, serialize_session_requests};
