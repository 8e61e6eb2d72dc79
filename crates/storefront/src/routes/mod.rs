//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (data dir reachable)
//!
//! # Auth
//! POST /api/auth/register          - Create account + log in (rate limited)
//! POST /api/auth/login             - Log in (rate limited)
//! POST /api/auth/logout            - Log out
//! GET  /api/auth/me                - Current user profile
//! POST /api/auth/password          - Change own password
//!
//! # Products
//! GET    /api/products             - Catalog listing (?category= filter)
//! GET    /api/products/{id}        - Product detail
//! POST   /api/products             - Create product (admin)
//! PUT    /api/products/{id}        - Update product (admin)
//! DELETE /api/products/{id}        - Delete product + cascade (admin)
//! POST   /api/products/scrape      - Draft a product from a URL (admin)
//! POST   /api/products/{id}/rate   - Rate a product (auth)
//! GET    /api/products/{id}/ratings - Current ratings for a product
//!
//! # Ratings (admin corrections)
//! PUT    /api/ratings/{id}         - Change a rating's value (admin)
//! DELETE /api/ratings/{id}         - Delete a rating (admin)
//!
//! # Wishlist (auth)
//! GET    /api/wishlist             - Wishlist resolved to products
//! POST   /api/wishlist/{product_id}   - Add product
//! DELETE /api/wishlist/{product_id}   - Remove product
//!
//! # Giveaway
//! POST /api/giveaway               - Submit entry (rate limited + window)
//! GET  /api/giveaway/entries       - List entries (admin)
//!
//! # Recommendations
//! POST /api/recommend/chat         - Free-text gift request
//! POST /api/recommend/quiz         - Structured quiz answers
//! ```

pub mod auth;
pub mod giveaway;
pub mod products;
pub mod ratings;
pub mod recommend;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{auth_rate_limiter, public_form_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Register and login carry the strict per-IP limiter; session-bound
/// routes don't need it.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(limited)
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/password", post(auth::change_password))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/scrape", post(products::scrape))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/{id}/rate", post(ratings::rate))
        .route("/{id}/ratings", get(ratings::list))
}

/// Create the rating-correction routes router.
pub fn rating_routes() -> Router<AppState> {
    Router::new().route("/{id}", put(ratings::update).delete(ratings::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index))
        .route(
            "/{product_id}",
            post(wishlist::add).delete(wishlist::remove),
        )
}

/// Create the giveaway routes router.
pub fn giveaway_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/", post(giveaway::submit))
        .layer(public_form_rate_limiter());

    Router::new()
        .merge(limited)
        .route("/entries", get(giveaway::entries))
}

/// Create the recommendation routes router.
pub fn recommend_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(recommend::chat))
        .route("/quiz", post(recommend::quiz))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/ratings", rating_routes())
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/giveaway", giveaway_routes())
        .nest("/api/recommend", recommend_routes())
}
