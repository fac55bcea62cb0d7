//! Stripe REST API client implementation.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use crate::config::StripeConfig;

use super::StripeError;
use super::types::{CURRENCY, CheckoutSession, LineItem, List, Price, Product};

/// Page size for catalog listings. The whole catalog is assumed to fit in
/// one page; pagination is a documented scalability non-goal.
const LIST_LIMIT: u32 = 100;

/// Error envelope returned by Stripe on non-success status codes.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the Stripe API.
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key cannot be used as a header value
    /// or the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Execute a GET request and decode the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let url = format!("{}{path}", self.api_base);
        let response = self.client.get(&url).query(query).send().await?;
        Self::decode(response).await
    }

    /// Execute a form-encoded POST request and decode the JSON response.
    ///
    /// Stripe mutations take `application/x-www-form-urlencoded` bodies.
    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, StripeError> {
        let url = format!("{}{path}", self.api_base);
        let response = self.client.post(&url).form(form).send().await?;
        Self::decode(response).await
    }

    /// Decode a response, mapping non-success statuses to [`StripeError::Api`].
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());

            tracing::error!(status = %status, message = %message, "Stripe API error");
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Stripe response"
            );
            StripeError::Parse(e.to_string())
        })
    }

    // =========================================================================
    // Products & Prices
    // =========================================================================

    /// List the full product catalog, active and inactive alike.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StripeError> {
        let list: List<Product> = self
            .get_json("/products", &[("limit", LIST_LIMIT.to_string())])
            .await?;
        Ok(list.data)
    }

    /// List all prices across all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_prices(&self) -> Result<Vec<Price>, StripeError> {
        let list: List<Price> = self
            .get_json("/prices", &[("limit", LIST_LIMIT.to_string())])
            .await?;
        Ok(list.data)
    }

    /// Retrieve a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn retrieve_product(&self, product_id: &str) -> Result<Product, StripeError> {
        self.get_json(&format!("/products/{product_id}"), &[]).await
    }

    /// Create a product owned by a farmer, tagged with a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, description))]
    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        category: &str,
        farmer_name: &str,
    ) -> Result<Product, StripeError> {
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("description".to_string(), description.to_string()),
            (
                format!("metadata[{}]", super::types::METADATA_CATEGORY),
                category.to_string(),
            ),
            (
                format!("metadata[{}]", super::types::METADATA_FARMER),
                farmer_name.to_string(),
            ),
        ];

        self.post_form("/products", &form).await
    }

    /// Create a new price for a product, in minor currency units.
    ///
    /// The newly created price becomes the product's current price, since
    /// catalog views select the price with the latest creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn create_price(
        &self,
        product_id: &str,
        unit_amount: i64,
    ) -> Result<Price, StripeError> {
        let form = vec![
            ("product".to_string(), product_id.to_string()),
            ("unit_amount".to_string(), unit_amount.to_string()),
            ("currency".to_string(), CURRENCY.to_string()),
        ];

        self.post_form("/prices", &form).await
    }

    /// Deactivate a product (the catalog's soft delete).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn deactivate_product(&self, product_id: &str) -> Result<Product, StripeError> {
        let form = vec![("active".to_string(), "false".to_string())];
        self.post_form(&format!("/products/{product_id}"), &form)
            .await
    }

    // =========================================================================
    // Checkout Sessions
    // =========================================================================

    /// Create a hosted checkout session for the given line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        line_items: &[LineItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "payment_method_types[0]".to_string(),
                "card".to_string(),
            ),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (i, item) in line_items.iter().enumerate() {
            form.push((format!("line_items[{i}][price]"), item.price.clone()));
            form.push((
                format!("line_items[{i}][quantity]"),
                item.quantity.to_string(),
            ));
        }

        self.post_form("/checkout/sessions", &form).await
    }

    /// Retrieve a checkout session by id (status polling).
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the request fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        self.get_json(&format!("/checkout/sessions/{session_id}"), &[])
            .await
    }
}
