//! Checkout route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use shopyz_core::checkout::{compose_order, quote as price_cart};
use shopyz_core::region::DEFAULT_REGION;
use shopyz_core::{CheckoutForm, DeliveryMethod, OrderSummary, Quote};

use crate::error::{Result, add_breadcrumb};
use crate::routes::cart::{load_cart, save_cart};
use crate::services::MailHandoff;
use crate::state::AppState;

/// Where the client goes after a completed checkout.
const AFTER_CHECKOUT_PATH: &str = "/";

/// Quote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default = "default_region", alias = "wilaya")]
    pub region: String,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Quote response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    /// Whether the region is in the delivery table.
    pub known_region: bool,
}

/// Completed checkout response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub order: OrderSummary,
    pub handoff: MailHandoff,
    pub message: String,
    pub redirect_to: &'static str,
}

/// Totals for the session cart delivered to a region.
#[instrument(skip(state, session))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteView>> {
    let cart = load_cart(&session).await?;
    let quote = price_cart(
        &cart,
        state.regions(),
        &request.region,
        request.delivery_method,
    );

    Ok(Json(QuoteView {
        quote,
        known_region: state.regions().contains(&request.region),
    }))
}

/// Validate the form, compose the order mail and clear the cart.
///
/// A rejected form leaves the cart untouched.
#[instrument(skip(state, session, form), fields(region = %form.region))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<CheckoutView>> {
    let mut cart = load_cart(&session).await?;
    let order = compose_order(&form, &cart, state.regions())?;

    let handoff = state.dispatcher().dispatch(&order);

    cart.clear();
    save_cart(&session, &cart).await?;

    info!(items = order.items.len(), total = %order.total, "Checkout completed");
    add_breadcrumb("checkout", "Order mail composed", None);

    Ok(Json(CheckoutView {
        message: format!(
            "Order for {} is ready! We've prepared an email with your details. \
             Please click 'Send' in your mail app.",
            order.full_name
        ),
        order,
        handoff,
        redirect_to: AFTER_CHECKOUT_PATH,
    }))
}
