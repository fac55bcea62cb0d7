//! Admin route handlers.
//!
//! Account management: listing, deletion, and per-farmer product views.
//! Deleting a farmer first deactivates all of their remote products, so
//! nothing ownerless stays purchasable. All handlers require the Admin
//! role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use agrotreg_core::AccountId;

use crate::catalog::{CatalogItem, CatalogService};
use crate::db::AccountRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Account, CurrentUser};
use crate::state::AppState;

/// Account listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/accounts.html")]
pub struct AccountsTemplate {
    pub accounts: Vec<Account>,
    pub current_user: Option<CurrentUser>,
}

/// A named farmer's products, as seen by the admin.
#[derive(Template, WebTemplate)]
#[template(path = "admin/farmer_products.html")]
pub struct FarmerProductsTemplate {
    pub farmer: String,
    pub products: Vec<CatalogItem>,
    pub current_user: Option<CurrentUser>,
}

/// List all accounts.
pub async fn accounts(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<AccountsTemplate, AppError> {
    let accounts = AccountRepository::new(state.pool()).list_all().await?;

    Ok(AccountsTemplate {
        accounts,
        current_user: Some(user),
    })
}

/// Delete an account.
///
/// If the account is a farmer, every one of their active products is
/// deactivated on the remote catalog *before* the row is removed, so a
/// remote failure leaves the account (and the ownership linkage) intact.
/// Deleting a consumer touches no products.
pub async fn delete_account(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let repo = AccountRepository::new(state.pool());
    let account = repo
        .get_by_id(AccountId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {id}")))?;

    if account.is_farmer() {
        let products = CatalogService::new(state.stripe())
            .list_by_farmer(&account.name)
            .await?;
        for product in &products {
            state.stripe().deactivate_product(&product.id).await?;
        }
        tracing::info!(
            farmer = %account.name,
            count = products.len(),
            "Deactivated products of deleted farmer"
        );
    }

    repo.delete(account.id).await?;

    Ok(Redirect::to("/perdoruesit").into_response())
}

/// View a named farmer's products.
pub async fn farmer_products(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(name): Path<String>,
) -> Result<FarmerProductsTemplate, AppError> {
    let products = CatalogService::new(state.stripe())
        .list_by_farmer(&name)
        .await?;

    Ok(FarmerProductsTemplate {
        farmer: name,
        products,
        current_user: Some(user),
    })
}
