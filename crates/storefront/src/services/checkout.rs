//! Checkout orchestration.
//!
//! Converts a session cart into a hosted checkout session and notifies the
//! owning farmers. The flow is an explicit saga:
//!
//! 1. **Plan** - resolve every cart line to a remote price id and an owning
//!    farmer account, with no side effects. Any resolution failure aborts
//!    the checkout before anything has happened.
//! 2. **Commit** - create the remote checkout session.
//! 3. **Notify** - send one email per line. The payment session already
//!    exists at this point, so a delivery failure is logged rather than
//!    failing the request; notification is at-most-once.

use sqlx::PgPool;
use thiserror::Error;

use agrotreg_core::Email;

use crate::db::{AccountRepository, RepositoryError};
use crate::models::Cart;
use crate::stripe::{LineItem, Price, Product, StripeClient, StripeError};

use super::email::EmailService;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// No remote price matches a cart line's product name.
    #[error("no price found for product '{0}'")]
    PriceNotFound(String),

    /// No account matches a product's owning-farmer name.
    #[error("no account matches farmer '{0}'")]
    FarmerNotFound(String),

    /// The created session came back without a redirect URL.
    #[error("checkout session has no redirect URL")]
    MissingRedirectUrl,

    /// Remote service error.
    #[error(transparent)]
    Stripe(#[from] StripeError),

    /// Database error while resolving farmers.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A cart line resolved against the remote catalog, ready to commit.
#[derive(Debug, Clone)]
pub struct PlannedLine {
    /// Remote price id and quantity sent to the payments service.
    pub item: LineItem,
    /// Product display name, used in the notification body.
    pub product_name: String,
    /// Owning farmer's account name from product metadata.
    pub farmer_name: String,
}

/// Resolve every cart line to a (price id, quantity) pair and an owning
/// farmer name. Pure; no side effects.
///
/// The price id is found by matching the line's product name against the
/// product list and taking the first price associated with that product.
///
/// # Errors
///
/// Returns [`CheckoutError::PriceNotFound`] if a line's product name has no
/// match in the product list, or the matched product has no price.
pub fn plan_line_items(
    cart: &Cart,
    products: &[Product],
    prices: &[Price],
) -> Result<Vec<PlannedLine>, CheckoutError> {
    let mut planned = Vec::with_capacity(cart.line_count());

    for line in cart.lines() {
        let product = products
            .iter()
            .find(|p| p.name == line.name)
            .ok_or_else(|| CheckoutError::PriceNotFound(line.name.clone()))?;

        let price = prices
            .iter()
            .find(|p| p.product == product.id)
            .ok_or_else(|| CheckoutError::PriceNotFound(line.name.clone()))?;

        planned.push(PlannedLine {
            item: LineItem {
                price: price.id.clone(),
                quantity: line.quantity,
            },
            product_name: product.name.clone(),
            farmer_name: product.farmer().unwrap_or_default().to_owned(),
        });
    }

    Ok(planned)
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    stripe: &'a StripeClient,
    accounts: AccountRepository<'a>,
    mailer: &'a EmailService,
    base_url: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(
        stripe: &'a StripeClient,
        pool: &'a PgPool,
        mailer: &'a EmailService,
        base_url: &'a str,
    ) -> Self {
        Self {
            stripe,
            accounts: AccountRepository::new(pool),
            mailer,
            base_url,
        }
    }

    /// Turn the cart into a hosted checkout session and notify farmers.
    ///
    /// Returns the URL of the hosted payment page.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` for an empty cart, `PriceNotFound` /
    /// `FarmerNotFound` when a line cannot be resolved, and `Stripe` /
    /// `Repository` errors from the underlying calls. None of these leave
    /// side effects behind: the session is created only after every line
    /// has resolved, and emails go out only after the session exists.
    pub async fn create_session(
        &self,
        cart: &Cart,
        consumer_email: &Email,
    ) -> Result<String, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Plan: resolve prices, then farmers. No side effects yet.
        let products = self.stripe.list_products().await?;
        let prices = self.stripe.list_prices().await?;
        let planned = plan_line_items(cart, &products, &prices)?;

        let mut notifications = Vec::with_capacity(planned.len());
        for line in &planned {
            let farmer = self
                .accounts
                .get_by_name(&line.farmer_name)
                .await?
                .ok_or_else(|| CheckoutError::FarmerNotFound(line.farmer_name.clone()))?;
            notifications.push((line, farmer));
        }

        // Commit: create the remote session.
        let line_items: Vec<LineItem> = planned.iter().map(|line| line.item.clone()).collect();
        let success_url = format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", self.base_url);
        let cancel_url = format!("{}/cart", self.base_url);

        let session = self
            .stripe
            .create_checkout_session(&line_items, &success_url, &cancel_url)
            .await?;
        let url = session.url.ok_or(CheckoutError::MissingRedirectUrl)?;

        // Notify: the session exists, so a failed send must not fail the
        // checkout. At-most-once delivery.
        for (line, farmer) in notifications {
            if let Err(e) = self
                .mailer
                .send_order_notification(
                    farmer.email.as_str(),
                    &farmer.name,
                    line.item.quantity,
                    &line.product_name,
                    consumer_email.as_str(),
                )
                .await
            {
                tracing::warn!(
                    farmer = %farmer.name,
                    product = %line.product_name,
                    error = %e,
                    "Order notification failed after session creation"
                );
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::stripe::types::METADATA_FARMER;

    fn product(id: &str, name: &str, farmer: &str) -> Product {
        let mut metadata = HashMap::new();
        if !farmer.is_empty() {
            metadata.insert(METADATA_FARMER.to_owned(), farmer.to_owned());
        }
        Product {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
            images: vec![],
            active: true,
            metadata,
        }
    }

    fn price(id: &str, product: &str, created: i64) -> Price {
        Price {
            id: id.to_owned(),
            product: product.to_owned(),
            unit_amount: 250,
            created,
        }
    }

    #[test]
    fn test_plan_resolves_each_line() {
        let mut cart = Cart::new();
        cart.add("p1", "Mollë", 250, 3);
        cart.add("p2", "Djathë", 1200, 1);

        let products = vec![product("p1", "Mollë", "Agim"), product("p2", "Djathë", "Besa")];
        let prices = vec![price("pr1", "p1", 100), price("pr2", "p2", 100)];

        let planned = plan_line_items(&cart, &products, &prices).unwrap();
        assert_eq!(planned.len(), 2);

        let apples = planned.iter().find(|l| l.product_name == "Mollë").unwrap();
        assert_eq!(apples.item, LineItem { price: "pr1".to_owned(), quantity: 3 });
        assert_eq!(apples.farmer_name, "Agim");
    }

    #[test]
    fn test_plan_takes_first_listed_price() {
        let mut cart = Cart::new();
        cart.add("p1", "Mollë", 250, 1);

        let products = vec![product("p1", "Mollë", "Agim")];
        // Two prices; line-item resolution takes the first in list order,
        // regardless of creation time.
        let prices = vec![price("pr_a", "p1", 100), price("pr_b", "p1", 900)];

        let planned = plan_line_items(&cart, &products, &prices).unwrap();
        assert_eq!(planned[0].item.price, "pr_a");
    }

    #[test]
    fn test_plan_unmatched_name_is_price_not_found() {
        let mut cart = Cart::new();
        cart.add("p9", "Produkt i fshirë", 100, 1);

        let products = vec![product("p1", "Mollë", "Agim")];
        let prices = vec![price("pr1", "p1", 100)];

        let err = plan_line_items(&cart, &products, &prices).unwrap_err();
        assert!(matches!(err, CheckoutError::PriceNotFound(name) if name == "Produkt i fshirë"));
    }

    #[test]
    fn test_plan_priceless_product_is_price_not_found() {
        let mut cart = Cart::new();
        cart.add("p1", "Mollë", 250, 1);

        let products = vec![product("p1", "Mollë", "Agim")];
        let prices: Vec<Price> = vec![];

        let err = plan_line_items(&cart, &products, &prices).unwrap_err();
        assert!(matches!(err, CheckoutError::PriceNotFound(name) if name == "Mollë"));
    }

    #[test]
    fn test_plan_missing_farmer_metadata_yields_empty_name() {
        let mut cart = Cart::new();
        cart.add("p1", "Mollë", 250, 1);

        let products = vec![product("p1", "Mollë", "")];
        let prices = vec![price("pr1", "p1", 100)];

        // An empty farmer name never matches an account, so the service
        // layer turns this into FarmerNotFound before any side effect.
        let planned = plan_line_items(&cart, &products, &prices).unwrap();
        assert_eq!(planned[0].farmer_name, "");
    }
}
