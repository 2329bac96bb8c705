//! Per-session request serialization.
//!
//! Cart, favorites and the admin flag are read, changed and written back by
//! each request. The session layer saves the record after the handler
//! returns, so two requests on one session would overwrite each other. This
//! middleware sits outside the session layer and lets only one request per
//! session cookie through at a time, from record load to record save.
//! Requests without a session cookie start a fresh session and are not held.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// One lock per live session id.
///
/// Entries are weak; a lock disappears once no request holds or waits on it.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Weak<Mutex<()>>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| lock.strong_count() > 0);

            if let Some(lock) = locks.get(session_id).and_then(Weak::upgrade) {
                lock
            } else {
                let lock = Arc::new(Mutex::new(()));
                locks.insert(session_id.to_owned(), Arc::downgrade(&lock));
                lock
            }
        };

        lock.lock_owned().await
    }

    /// Number of sessions with a request in flight.
    pub async fn len(&self) -> usize {
        let locks = self.locks.lock().await;
        locks.values().filter(|lock| lock.strong_count() > 0).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Session id from the request's cookie header, if any.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Middleware that serializes requests sharing a session cookie.
pub async fn serialize_session_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let _guard = state.session_locks().acquire(&session_id).await;
    next.run(request).await
}
