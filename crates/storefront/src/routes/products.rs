//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shopyz_core::{
    CatalogQuery, CategoryFilter, Favorites, Language, NewReview, Product, ProductId, SortKey,
    search_suggestions,
};

use crate::error::{AppError, Result};
use crate::models::{load_or_default, session_keys};
use crate::state::AppState;

const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ListingParams {
    /// Parse into a pipeline query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown category or sort key.
    pub fn into_query(self) -> Result<CatalogQuery> {
        let category = self
            .category
            .as_deref()
            .unwrap_or_default()
            .parse::<CategoryFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let sort = self
            .sort
            .as_deref()
            .unwrap_or_default()
            .parse::<SortKey>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(CatalogQuery {
            category,
            min_rating: self.min_rating.unwrap_or(0.0),
            search: self.q.unwrap_or_default(),
            sort,
        })
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ListingView {
    /// True until the catalog bootstrap has finished.
    pub loading: bool,
    pub count: usize,
    pub products: Vec<Product>,
}

/// Suggestion query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// A search box suggestion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
}

/// Language query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageParams {
    #[serde(default)]
    pub lang: Language,
}

/// Product detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    pub product: Product,
    /// Generated pitch, or the description when generation is unavailable.
    pub pitch: String,
    pub share_url: String,
    pub is_favorite: bool,
}

/// Filtered, sorted product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingView>> {
    let query = params.into_query()?;
    let catalog = state.catalog().read().await;

    let products: Vec<Product> = catalog.query(&query).into_iter().cloned().collect();

    Ok(Json(ListingView {
        loading: catalog.is_loading(),
        count: products.len(),
        products,
    }))
}

/// Name suggestions for the search box.
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<SuggestionView>> {
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    let catalog = state.catalog().read().await;

    let suggestions = search_suggestions(catalog.products(), &params.q, limit)
        .into_iter()
        .map(|p| SuggestionView {
            id: p.id.clone(),
            name: p.name.clone(),
            image: p.primary_image().map(str::to_owned),
        })
        .collect();

    Json(suggestions)
}

/// Product detail with pitch.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<ProductDetailView>> {
    let product = state
        .catalog()
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let favorites: Favorites = load_or_default(&session, session_keys::FAVORITES).await?;
    let pitch = state.assistant().pitch(&product, params.lang).await;

    Ok(Json(ProductDetailView {
        share_url: state.share_url(&product.id),
        is_favorite: favorites.contains(&product.id),
        pitch,
        product,
    }))
}

/// Add a shopper review.
#[instrument(skip(state, review))]
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(review): Json<NewReview>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().add_review(&id, review).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
