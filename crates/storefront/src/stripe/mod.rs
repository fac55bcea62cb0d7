//! Stripe API client.
//!
//! # Architecture
//!
//! - Stripe is source of truth for products, prices, and checkout
//!   sessions - NO local sync, direct API calls
//! - REST over `reqwest`; mutations are form-encoded per Stripe's API
//! - The API base URL is configurable so tests can target a mock server
//!
//! # Example
//!
//! ```rust,ignore
//! use agrotreg_storefront::stripe::StripeClient;
//!
//! let client = StripeClient::new(&config.stripe)?;
//!
//! // List the catalog
//! let products = client.list_products().await?;
//! let prices = client.list_prices().await?;
//!
//! // Create a checkout session
//! let session = client
//!     .create_checkout_session(&line_items, &success_url, &cancel_url)
//!     .await?;
//! ```

mod client;
pub mod types;

pub use client::StripeClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}
