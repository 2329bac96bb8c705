//! Cart route handlers.
//!
//! The cart ledger lives in the shopper's session. Each handler loads it,
//! applies one transition and writes it back.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shopyz_core::{CartLedger, CartLine, Price, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{load_or_default, session_keys};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Price,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Total units.
    pub count: u64,
    pub subtotal: Price,
}

impl From<&CartLedger> for CartView {
    fn from(cart: &CartLedger) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    line_total: line.line_total(),
                    line: line.clone(),
                })
                .collect(),
            count: cart.count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Quantity change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    /// Signed change; the result never drops below 1.
    pub delta: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session.
pub(crate) async fn load_cart(session: &Session) -> Result<CartLedger> {
    Ok(load_or_default(session, session_keys::CART).await?)
}

/// Save the cart to the session.
pub(crate) async fn save_cart(session: &Session, cart: &CartLedger) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of a product.
///
/// The line snapshots the product as the catalog holds it now.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(&request.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(CartView::from(&cart)))
}

/// Shift a line's quantity. Unknown ids leave the cart unchanged.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&request.product_id, request.delta);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line. Unknown ids leave the cart unchanged.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(&request.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shopyz_core::seed::default_products;

    use super::*;

    #[test]
    fn test_cart_view_derives_totals() {
        let products = default_products();
        let mut cart = CartLedger::new();
        cart.add(&products[0]);
        cart.add(&products[0]);
        cart.add(&products[1]);

        let view = CartView::from(&cart);
        assert_eq!(view.count, 3);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].line_total, products[0].price * 2);
        assert_eq!(view.subtotal, products[0].price * 2 + products[1].price);
    }

    #[test]
    fn test_cart_line_view_flattens_line() {
        let mut cart = CartLedger::new();
        cart.add(&default_products()[0]);
        let json = serde_json::to_value(CartView::from(&cart)).unwrap();
        assert_eq!(json["lines"][0]["quantity"], 1);
        assert_eq!(json["lines"][0]["product"]["id"], "1");
        assert!(json["lines"][0].get("lineTotal").is_some());
    }
}
