//! Integration tests for shopyZ.
//!
//! The storefront router is driven in-process with `tower::ServiceExt`, over
//! an in-memory product store. A [`TestApp`] plays one shopper: it carries
//! the session cookie from response to request like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopyz-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tokio::task::JoinSet;
use tower::ServiceExt;

use shopyz_core::{ChatMessage, ChatRole, Language, Product};
use shopyz_storefront::config::StorefrontConfig;
use shopyz_storefront::db::{MemoryProductStore, ProductStore};
use shopyz_storefront::gemini::GeminiError;
use shopyz_storefront::services::Copywriter;
use shopyz_storefront::state::AppState;

/// Admin password of [`StorefrontConfig::local`].
pub const ADMIN_PASSWORD: &str = "12346";

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, or `Null` for empty and non-JSON bodies.
    pub body: Value,
}

/// One shopper talking to an in-process storefront.
pub struct TestApp {
    router: Router,
    state: AppState,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront over a fresh in-memory store, bootstrapped with the
    /// bundled catalog and no copywriter.
    pub async fn new() -> Self {
        Self::with(Arc::new(MemoryProductStore::new()), None).await
    }

    /// Storefront over `store` with an optional copywriter. The catalog is
    /// bootstrapped before returning.
    pub async fn with(
        store: Arc<dyn ProductStore>,
        copywriter: Option<Arc<dyn Copywriter>>,
    ) -> Self {
        let app = Self::unloaded(store, copywriter);
        app.state.catalog().bootstrap().await;
        app
    }

    /// Storefront over `store` whose catalog bootstrap has not run yet.
    #[must_use]
    pub fn unloaded(store: Arc<dyn ProductStore>, copywriter: Option<Arc<dyn Copywriter>>) -> Self {
        let state = AppState::new(StorefrontConfig::local(), store, copywriter);

        Self {
            router: shopyz_storefront::app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Shared application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Drop the session cookie, as a second shopper would arrive.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Send the same POST `times` times at once on the current session.
    ///
    /// Returns the statuses in completion order. The session cookie is not
    /// updated from these responses.
    pub async fn post_concurrently(&self, uri: &str, body: &Value, times: usize) -> Vec<StatusCode> {
        let mut tasks = JoinSet::new();
        for _ in 0..times {
            let request = self.build_request(Method::POST, uri, Some(body.clone()));
            let router = self.router.clone();
            tasks.spawn(async move { router.oneshot(request).await.expect("response").status() });
        }

        let mut statuses = Vec::with_capacity(times);
        while let Some(status) = tasks.join_next().await {
            statuses.push(status.expect("request task"));
        }
        statuses
    }

    /// Log in as admin with the local password.
    pub async fn login_admin(&mut self) {
        let response = self
            .post(
                "/admin/login",
                serde_json::json!({ "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    fn build_request(&self, method: Method, uri: &str, json: Option<Value>) -> Request<Body> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        match json {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request")
    }

    async fn send(&mut self, method: Method, uri: &str, json: Option<Value>) -> TestResponse {
        let request = self.build_request(method, uri, json);

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("cookie header")
                .split(';')
                .next()
                .unwrap_or_default()
                .to_owned();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Copywriter that answers from templates, or fails every call.
#[derive(Debug, Default)]
pub struct ScriptedCopywriter {
    pub fail: bool,
}

impl ScriptedCopywriter {
    #[must_use]
    pub fn shared() -> Arc<dyn Copywriter> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn failing() -> Arc<dyn Copywriter> {
        Arc::new(Self { fail: true })
    }

    fn check(&self) -> Result<(), GeminiError> {
        if self.fail {
            Err(GeminiError::RateLimited(30))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Copywriter for ScriptedCopywriter {
    async fn generate_pitch(
        &self,
        product: &Product,
        language: Language,
    ) -> Result<String, GeminiError> {
        self.check()?;
        Ok(format!("[{}] You need the {}", language.prompt_name(), product.name))
    }

    async fn generate_description(
        &self,
        name: &str,
        category: &str,
        _language: Language,
    ) -> Result<String, GeminiError> {
        self.check()?;
        Ok(format!("{name}, the finest in {category}"))
    }

    async fn chat_reply(
        &self,
        history: &[ChatMessage],
        catalog: &[Product],
        _language: Language,
    ) -> Result<String, GeminiError> {
        self.check()?;
        let last = history
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map_or("", |m| m.text.as_str());
        Ok(format!("{} products match '{last}'", catalog.len()))
    }
}
