//! Authentication route handlers.
//!
//! Registration lives at `/`, the site's landing page. Recoverable form
//! failures redirect back with a message code in the query string; the
//! page handler maps codes to human-readable text.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use agrotreg_core::Role;

use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// "Fermer" or "Konsumator"; defaults to Konsumator.
    pub role: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Map a message code from the query string to display text.
fn message_text(code: &str) -> &'static str {
    match code {
        "email_taken" => "You've already signed up with that email, log in instead!",
        "invalid_email" => "That email address is not valid.",
        "invalid_name" => "Please enter a name.",
        "invalid_role" => "Choose either Fermer or Konsumator.",
        "password_too_short" => "Password must be at least 8 characters.",
        "credentials" => "Wrong email or password, please try again.",
        "session" => "Session error, please try again.",
        _ => "Something went wrong, please try again.",
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<&'static str>,
    pub current_user: Option<CurrentUser>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub notice: Option<&'static str>,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(message_text),
        current_user: None,
    }
}

/// Handle registration form submission.
///
/// Creates the account, logs the new user in, and redirects to the
/// catalog. A duplicate email redirects to the login page instead.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.name.trim().is_empty() {
        return Redirect::to("/?error=invalid_name").into_response();
    }

    // Admin accounts are created at bootstrap, never via the public form.
    let role = match form.role.as_deref() {
        None | Some("Konsumator") => Role::Konsumator,
        Some("Fermer") => Role::Fermer,
        Some(_) => return Redirect::to("/?error=invalid_role").into_response(),
    };

    let auth = AuthService::new(state.pool());
    match auth
        .register(form.name.trim(), &form.email, &form.password, role)
        .await
    {
        Ok(account) => {
            let user = CurrentUser {
                id: account.id,
                name: account.name,
                email: account.email,
                role: account.role,
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session after registration: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/home").into_response()
        }
        Err(AuthError::AccountAlreadyExists) => {
            Redirect::to("/login?notice=email_taken").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => Redirect::to("/?error=invalid_email").into_response(),
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/?error=password_too_short").into_response()
        }
        Err(e) => crate::error::AppError::Auth(e).into_response(),
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(message_text),
        notice: query.notice.as_deref().map(message_text),
        current_user: None,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    match auth.login(&form.email, &form.password).await {
        Ok(account) => {
            let user = CurrentUser {
                id: account.id,
                name: account.name,
                email: account.email,
                role: account.role,
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session after login: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/home").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::warn!("Login failed for {}", form.email);
            Redirect::to("/login?error=credentials").into_response()
        }
        Err(e) => crate::error::AppError::Auth(e).into_response(),
    }
}

/// Handle logout.
///
/// Clears the whole session, cart included, and lands on registration.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}
