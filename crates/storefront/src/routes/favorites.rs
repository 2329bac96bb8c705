//! Favorites route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use shopyz_core::{Favorites, Product, ProductId};

use crate::error::Result;
use crate::models::{load_or_default, session_keys};
use crate::state::AppState;

/// Favorites listing.
#[derive(Debug, Serialize)]
pub struct FavoritesView {
    /// Liked products still in the catalog, in catalog order.
    pub products: Vec<Product>,
    pub count: usize,
}

/// Toggle result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleView {
    pub product_id: ProductId,
    pub liked: bool,
    pub count: usize,
}

/// Liked products.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Json<FavoritesView>> {
    let favorites: Favorites = load_or_default(&session, session_keys::FAVORITES).await?;
    let catalog = state.catalog().read().await;

    let products: Vec<Product> = catalog
        .products()
        .iter()
        .filter(|p| favorites.contains(&p.id))
        .cloned()
        .collect();

    Ok(Json(FavoritesView {
        count: products.len(),
        products,
    }))
}

/// Like or unlike a product.
#[instrument(skip(session))]
pub async fn toggle(session: Session, Path(id): Path<ProductId>) -> Result<Json<ToggleView>> {
    let mut favorites: Favorites = load_or_default(&session, session_keys::FAVORITES).await?;
    let liked = favorites.toggle(id.clone());
    session.insert(session_keys::FAVORITES, &favorites).await?;

    Ok(Json(ToggleView {
        product_id: id,
        liked,
        count: favorites.len(),
    }))
}
