//! Admin route handlers.
//!
//! Everything except login requires the session admin flag.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use shopyz_core::{Language, Product, ProductDraft, ProductId, parse_image_urls};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{RequireAdmin, clear_admin, password_matches, set_admin};
use crate::state::AppState;

/// Login request.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Admin flag state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    pub is_admin: bool,
}

/// Description generation request.
#[derive(Debug, Deserialize)]
pub struct DescribeRequest {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub language: Language,
}

/// Generated description.
#[derive(Debug, Serialize)]
pub struct DescriptionView {
    pub description: String,
}

/// Pasted image URLs.
#[derive(Debug, Deserialize)]
pub struct ParseImagesRequest {
    #[serde(default)]
    pub input: String,
}

/// Parsed image URLs.
#[derive(Debug, Serialize)]
pub struct ImagesView {
    pub urls: Vec<String>,
}

/// Check the admin password and set the session flag.
///
/// POST /admin/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminView>> {
    if !password_matches(&state.config().admin_password, &request.password) {
        warn!("Admin login rejected");
        return Err(AppError::Unauthorized("incorrect password".to_string()));
    }

    // Fresh id so a pre-login session cannot carry the flag
    session.cycle_id().await?;
    set_admin(&session).await?;

    info!("Admin logged in");
    add_breadcrumb("auth", "Admin logged in", None);

    Ok(Json(AdminView { is_admin: true }))
}

/// Clear the admin flag.
///
/// POST /admin/logout
pub async fn logout(session: Session) -> Result<Json<AdminView>> {
    clear_admin(&session).await?;
    Ok(Json(AdminView { is_admin: false }))
}

/// Create a product.
///
/// POST /admin/products
#[instrument(skip(state, draft))]
pub async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields.
///
/// PUT /admin/products/{id}
#[instrument(skip(state, draft))]
pub async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    let product = state.catalog().update(&id, draft).await?;
    Ok(Json(product))
}

/// Delete a product.
///
/// DELETE /admin/products/{id}
#[instrument(skip(state))]
pub async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.catalog().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate a product description for the admin form.
///
/// POST /admin/describe
#[instrument(skip(state, request), fields(name = %request.name))]
pub async fn describe(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<DescribeRequest>,
) -> Result<Json<DescriptionView>> {
    let description = state
        .assistant()
        .describe(&request.name, request.category.as_deref(), request.language)
        .await?;

    Ok(Json(DescriptionView { description }))
}

/// Split pasted text into image URLs.
///
/// POST /admin/images/parse
pub async fn parse_images(
    _admin: RequireAdmin,
    Json(request): Json<ParseImagesRequest>,
) -> Json<ImagesView> {
    Json(ImagesView {
        urls: parse_image_urls(&request.input),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_request_defaults() {
        let request: DescribeRequest = serde_json::from_str(r#"{"name": "Lamp"}"#).unwrap();
        assert_eq!(request.name, "Lamp");
        assert!(request.category.is_none());
        assert_eq!(request.language, Language::En);
    }
}
