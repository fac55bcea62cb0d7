//! Stripe API resource types.
//!
//! Only the fields this application reads are modeled; everything else in
//! Stripe's responses is ignored during deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the owning farmer's account name.
pub const METADATA_FARMER: &str = "Fermeri";

/// Metadata key holding the product's category tag.
pub const METADATA_CATEGORY: &str = "Category";

/// Category shown when a product carries no category metadata.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Currency for all prices on the marketplace (Albanian lek).
pub const CURRENCY: &str = "all";

/// Wrapper for Stripe list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// A product in the remote catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// The owning farmer's account name, if set.
    #[must_use]
    pub fn farmer(&self) -> Option<&str> {
        self.metadata.get(METADATA_FARMER).map(String::as_str)
    }

    /// The category tag, or [`UNCATEGORIZED`].
    #[must_use]
    pub fn category(&self) -> &str {
        self.metadata
            .get(METADATA_CATEGORY)
            .map_or(UNCATEGORIZED, String::as_str)
    }

    /// First image URL, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A price attached to a product.
///
/// A product may have multiple prices; the current one is the price with
/// the largest `created` timestamp.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Price {
    pub id: String,
    /// Id of the product this price belongs to.
    pub product: String,
    /// Amount in the minor currency unit (qindarka).
    #[serde(default)]
    pub unit_amount: i64,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
}

/// A line item for a checkout session: (price id, quantity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub price: String,
    pub quantity: u32,
}

/// A hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// URL of the hosted payment page. Present while the session is open.
    #[serde(default)]
    pub url: Option<String>,
    /// `open`, `complete`, or `expired`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

/// Customer details attached to a completed checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_product_list() {
        let json = r#"{
            "object": "list",
            "data": [
                {
                    "id": "prod_1",
                    "object": "product",
                    "name": "Djathë i bardhë",
                    "description": "Djathë dele nga Gjirokastra",
                    "images": ["https://img.example/djathe.jpg"],
                    "active": true,
                    "metadata": {"Category": "Bulmet", "Fermeri": "Agim"}
                },
                {
                    "id": "prod_2",
                    "object": "product",
                    "name": "Mjaltë",
                    "description": null,
                    "images": [],
                    "active": false,
                    "metadata": {}
                }
            ],
            "has_more": false
        }"#;

        let list: List<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert!(!list.has_more);

        let djathe = &list.data[0];
        assert_eq!(djathe.farmer(), Some("Agim"));
        assert_eq!(djathe.category(), "Bulmet");
        assert_eq!(djathe.image(), Some("https://img.example/djathe.jpg"));

        let mjalte = &list.data[1];
        assert!(!mjalte.active);
        assert_eq!(mjalte.farmer(), None);
        assert_eq!(mjalte.category(), UNCATEGORIZED);
        assert_eq!(mjalte.image(), None);
    }

    #[test]
    fn test_product_active_defaults_to_true() {
        let json = r#"{"id": "prod_3", "name": "Qumësht"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.active);
    }

    #[test]
    fn test_deserialize_price() {
        let json = r#"{
            "id": "price_1",
            "object": "price",
            "product": "prod_1",
            "unit_amount": 25000,
            "currency": "all",
            "created": 1700000000
        }"#;

        let price: Price = serde_json::from_str(json).unwrap();
        assert_eq!(price.product, "prod_1");
        assert_eq!(price.unit_amount, 25_000);
        assert_eq!(price.created, 1_700_000_000);
    }

    #[test]
    fn test_deserialize_checkout_session() {
        let json = r#"{
            "id": "cs_test_1",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1",
            "status": "open",
            "customer_details": null
        }"#;

        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.status.as_deref(), Some("open"));
        assert!(session.customer_details.is_none());

        let completed = r#"{
            "id": "cs_test_2",
            "status": "complete",
            "customer_details": {"email": "blerësi@example.com"}
        }"#;
        let session: CheckoutSession = serde_json::from_str(completed).unwrap();
        assert!(session.url.is_none());
        assert_eq!(
            session.customer_details.and_then(|d| d.email).as_deref(),
            Some("blerësi@example.com")
        );
    }
}
