//! Cart route handlers.
//!
//! The cart lives in the session; every handler reads it, mutates a copy,
//! and writes it back. Concurrent requests from the same session can lose
//! updates (last write wins) - a known race, acceptable for
//! single-user-per-session usage.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{Cart, CartLine, CurrentUser, session_keys};

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, or an empty one.
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub name: String,
    /// Unit price in minor currency units, as listed on the catalog page.
    pub unit_amount: i64,
    pub quantity: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub lines: Vec<(String, CartLine)>,
    pub total: i64,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
pub async fn show(session: Session, OptionalUser(current_user): OptionalUser) -> CartTemplate {
    let cart = get_cart(&session).await;

    CartTemplate {
        lines: cart.entries(),
        total: cart.total(),
        current_user,
    }
}

/// Add a product to the cart.
///
/// A missing quantity defaults to 1; zero is rejected (negative values
/// never deserialize into the unsigned field).
pub async fn add(
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::Validation("quantity must be at least 1".into()));
    }
    if form.unit_amount < 0 {
        return Err(AppError::Validation("price cannot be negative".into()));
    }

    let mut cart = get_cart(&session).await;
    cart.add(&form.product_id, &form.name, form.unit_amount, quantity);

    save_cart(&session, &cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart: {e}")))?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a product from the cart. No-op if it is not present.
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let mut cart = get_cart(&session).await;
    cart.remove(&form.product_id);

    save_cart(&session, &cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart: {e}")))?;

    Ok(Redirect::to("/cart").into_response())
}

/// Empty the cart.
pub async fn clear(session: Session) -> Result<Response, AppError> {
    session
        .remove::<Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear cart: {e}")))?;

    Ok(Redirect::to("/").into_response())
}
