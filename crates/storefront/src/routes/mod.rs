//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET/POST /                     - Registration
//! GET/POST /login                - Login
//! GET  /logout                   - Logout
//! GET  /health                   - Health check (in main)
//!
//! # Catalog (read-only)
//! GET  /home                     - Full catalog
//! GET  /produkte_bulmeti         - Dairy
//! GET  /produkte_shtazore        - Animal products
//! GET  /fruta                    - Fruit
//! GET  /perime                   - Vegetables
//! GET  /pije                     - Drinks
//! GET  /tjera                    - Everything else
//! GET  /kerko?q=                 - Name-substring search
//!
//! # Farmer (requires Fermer role)
//! GET/POST /produktet-e-tua      - List / edit / deactivate own products
//! GET/POST /shto-produkt         - Create product + price
//!
//! # Admin (requires Admin role)
//! GET  /perdoruesit              - List accounts
//! GET  /fshi-llogarine/{id}      - Delete account (deactivates a farmer's products first)
//! GET  /shiko-produktet/{name}   - View a farmer's products
//!
//! # Cart
//! POST /add-to-cart              - Add line (merges quantities)
//! GET  /cart                     - Cart page
//! POST /remove-from-cart         - Remove line
//! POST /clear-cart               - Empty the cart
//!
//! # Checkout
//! GET  /checkout                 - Review page
//! POST /create-checkout-session  - JSON {url} or {error}
//! GET  /success?session_id=      - Post-payment landing page
//! GET  /session-status?session_id= - JSON {status, customer_email}
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod farmer;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(catalog::home))
        .route("/produkte_bulmeti", get(catalog::produkte_bulmeti))
        .route("/produkte_shtazore", get(catalog::produkte_shtazore))
        .route("/fruta", get(catalog::fruta))
        .route("/perime", get(catalog::perime))
        .route("/pije", get(catalog::pije))
        .route("/tjera", get(catalog::tjera))
        .route("/kerko", get(catalog::search).post(catalog::search))
}

/// Create the farmer routes router.
pub fn farmer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/produktet-e-tua",
            get(farmer::products).post(farmer::products_action),
        )
        .route(
            "/shto-produkt",
            get(farmer::new_product).post(farmer::create_product),
        )
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/perdoruesit", get(admin::accounts))
        .route("/fshi-llogarine/{id}", get(admin::delete_account))
        .route("/shiko-produktet/{name}", get(admin::farmer_products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add-to-cart", post(cart::add))
        .route("/remove-from-cart", post(cart::remove))
        .route("/clear-cart", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show))
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/success", get(checkout::success))
        .route("/session-status", get(checkout::session_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(farmer_routes())
        .merge(admin_routes())
        .merge(cart_routes())
        .merge(checkout_routes())
}
