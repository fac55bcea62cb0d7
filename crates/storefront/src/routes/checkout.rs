//! Checkout route handlers.
//!
//! `create_checkout_session` is a JSON endpoint: the checkout page's script
//! posts to it and redirects the browser to the returned URL. Session
//! status is polled via `session-status`; there is no webhook.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{Cart, CartLine, CurrentUser, session_keys};
use crate::services::CheckoutService;
use crate::state::AppState;

use super::cart::get_cart;

/// Query parameters carrying the remote session id.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

/// Checkout review page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<(String, CartLine)>,
    pub total: i64,
    pub current_user: Option<CurrentUser>,
}

/// Post-payment landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub status: String,
    pub customer_email: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// Display the checkout review page. An empty cart goes back to the cart.
pub async fn show(session: Session, OptionalUser(current_user): OptionalUser) -> Response {
    let cart = get_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        lines: cart.entries(),
        total: cart.total(),
        current_user,
    }
    .into_response()
}

/// Create a remote checkout session from the cart.
///
/// Returns JSON `{"url": ...}` on success. Failures surface as structured
/// `{"error": ...}` responses: 400 for data-integrity failures (unknown
/// product, dangling farmer), 502 for remote-service errors. The cart is
/// cleared once the session exists.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<Json<Value>, AppError> {
    let cart = get_cart(&session).await;

    let service = CheckoutService::new(
        state.stripe(),
        state.pool(),
        state.mailer(),
        &state.config().base_url,
    );
    let url = service.create_session(&cart, &user.email).await?;

    // Checkout has been initiated; the cart's job is done.
    if let Err(e) = session.remove::<Cart>(session_keys::CART).await {
        tracing::warn!("Failed to clear cart after checkout: {e}");
    }

    Ok(Json(json!({ "url": url })))
}

/// Post-payment landing page, reached via the success redirect URL.
pub async fn success(
    State(state): State<AppState>,
    OptionalUser(current_user): OptionalUser,
    Query(query): Query<SessionQuery>,
) -> Result<SuccessTemplate, AppError> {
    let session = state
        .stripe()
        .retrieve_checkout_session(&query.session_id)
        .await?;

    Ok(SuccessTemplate {
        status: session.status.unwrap_or_else(|| "unknown".to_string()),
        customer_email: session.customer_details.and_then(|d| d.email),
        current_user,
    })
}

/// Poll the status of a checkout session.
///
/// Returns JSON `{"status": ..., "customer_email": ...}`.
pub async fn session_status(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, AppError> {
    let session = state
        .stripe()
        .retrieve_checkout_session(&query.session_id)
        .await?;

    Ok(Json(json!({
        "status": session.status,
        "customer_email": session.customer_details.and_then(|d| d.email),
    })))
}
