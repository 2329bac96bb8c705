//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//! GET  /regions                    - Delivery region table
//!
//! # Products
//! GET  /products                   - Filtered, sorted listing
//! GET  /products/suggest           - Search box suggestions
//! GET  /products/{id}              - Product detail with pitch and share link
//! POST /products/{id}/reviews      - Add a review
//!
//! # Cart (session)
//! GET  /cart                       - Cart contents and totals
//! POST /cart/add                   - Add one unit
//! POST /cart/update                - Shift a line's quantity
//! POST /cart/remove                - Remove a line
//!
//! # Checkout
//! POST /checkout/quote             - Totals for a region and delivery method
//! POST /checkout                   - Validate, compose the order mail, clear the cart
//!
//! # Favorites (session)
//! GET  /favorites                  - Liked products
//! POST /favorites/{id}/toggle      - Like or unlike
//!
//! # Assistant
//! GET  /chat/welcome               - Opening message
//! POST /chat                       - Send a message, get the reply
//!
//! # Admin (session flag)
//! POST /admin/login                - Check the admin password
//! POST /admin/logout               - Clear the admin flag
//! POST /admin/products             - Create a product
//! PUT  /admin/products/{id}        - Update a product
//! DELETE /admin/products/{id}      - Delete a product
//! POST /admin/describe             - Generate a description
//! POST /admin/images/parse         - Split pasted image URLs
//! ```

pub mod admin;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod favorites;
pub mod products;
pub mod regions;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/suggest", get(products::suggest))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(products::add_review))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/quote", post(checkout::quote))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/{id}/toggle", post(favorites::toggle))
}

/// Create the assistant routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(chat::send))
        .route("/welcome", get(chat::welcome))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/describe", post(admin::describe))
        .route("/images/parse", post(admin::parse_images))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(regions::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/favorites", favorite_routes())
        .nest("/chat", chat_routes())
        .nest("/admin", admin_routes())
}
