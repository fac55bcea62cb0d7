//! Farmer portal route handlers.
//!
//! Farmers list their own products, adjust prices (by creating a new
//! price, which becomes the current one), deactivate products, and create
//! new products. All handlers require the Fermer role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::catalog::{CatalogItem, CatalogService, Category};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireFarmer;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Forms & Queries
// =============================================================================

/// Actions posted from the product list.
#[derive(Debug, Deserialize)]
pub struct ProductActionForm {
    /// "delete" or "edit".
    pub action: String,
    pub product_id: String,
    /// New price in lek, required for "edit".
    pub new_price: Option<Decimal>,
}

/// New product form data.
#[derive(Debug, Deserialize)]
pub struct NewProductForm {
    pub name: String,
    pub description: String,
    /// Price in lek.
    pub price: Decimal,
    pub category: String,
}

/// Query parameters for message display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Farmer's own product list template.
#[derive(Template, WebTemplate)]
#[template(path = "farmer/products.html")]
pub struct FarmerProductsTemplate {
    pub products: Vec<CatalogItem>,
    pub notice: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "farmer/new_product.html")]
pub struct NewProductTemplate {
    pub categories: [Category; 6],
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Convert a lek amount to minor currency units.
fn to_minor_units(lek: Decimal) -> Result<i64, AppError> {
    if lek <= Decimal::ZERO {
        return Err(AppError::Validation("price must be positive".into()));
    }
    (lek * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| AppError::Validation("price out of range".into()))
}

// =============================================================================
// Handlers
// =============================================================================

/// List the farmer's own products.
pub async fn products(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Query(query): Query<MessageQuery>,
) -> Result<FarmerProductsTemplate, AppError> {
    let products = CatalogService::new(state.stripe())
        .list_by_farmer(&user.name)
        .await?;

    Ok(FarmerProductsTemplate {
        products,
        notice: query.notice,
        current_user: Some(user),
    })
}

/// Handle a product-list action: deactivate a product or set a new price.
pub async fn products_action(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Form(form): Form<ProductActionForm>,
) -> Result<Response, AppError> {
    // Only the owning farmer may touch a product.
    let product = state.stripe().retrieve_product(&form.product_id).await?;
    if product.farmer() != Some(user.name.as_str()) {
        return Err(AppError::Forbidden("not your product".into()));
    }

    match form.action.as_str() {
        "delete" => {
            state.stripe().deactivate_product(&form.product_id).await?;
        }
        "edit" => {
            let new_price = form
                .new_price
                .ok_or_else(|| AppError::Validation("new price is required".into()))?;
            let unit_amount = to_minor_units(new_price)?;
            state
                .stripe()
                .create_price(&form.product_id, unit_amount)
                .await?;
        }
        other => {
            return Err(AppError::BadRequest(format!("unknown action: {other}")));
        }
    }

    Ok(Redirect::to("/produktet-e-tua").into_response())
}

/// Display the new product form.
pub async fn new_product(RequireFarmer(user): RequireFarmer) -> impl IntoResponse {
    NewProductTemplate {
        categories: Category::ALL,
        current_user: Some(user),
    }
}

/// Create a product and its initial price.
pub async fn create_product(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Form(form): Form<NewProductForm>,
) -> Result<Response, AppError> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("product name is required".into()));
    }
    let category: Category = form
        .category
        .parse()
        .map_err(AppError::Validation)?;
    let unit_amount = to_minor_units(form.price)?;

    let product = state
        .stripe()
        .create_product(
            form.name.trim(),
            form.description.trim(),
            category.tag(),
            &user.name,
        )
        .await?;

    state.stripe().create_price(&product.id, unit_amount).await?;

    Ok(Redirect::to("/produktet-e-tua?notice=created").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(250, 0)).unwrap(), 25_000);
        assert_eq!(to_minor_units(Decimal::new(750, 2)).unwrap(), 750);
    }

    #[test]
    fn test_to_minor_units_rounds_sub_minor_amounts() {
        // 2.505 lek rounds to 251 minor units (banker's rounding)
        assert_eq!(to_minor_units(Decimal::new(2505, 3)).unwrap(), 250);
        assert_eq!(to_minor_units(Decimal::new(2515, 3)).unwrap(), 252);
    }

    #[test]
    fn test_to_minor_units_rejects_non_positive() {
        assert!(to_minor_units(Decimal::ZERO).is_err());
        assert!(to_minor_units(Decimal::new(-100, 0)).is_err());
    }
}
