//! Shared helpers for AgroTreg integration tests.
//!
//! The tests in `tests/` drive a running storefront over HTTP. They are
//! `#[ignore]`d by default; run them with a live server and database:
//!
//! ```bash
//! cargo test -p agrotreg-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("AGROTREG_BASE_URL").unwrap_or_else(|_| "http://localhost:5001".to_string())
}

/// Create an HTTP client with a cookie store, so the session (login state
/// and cart) persists across requests like a browser.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique suffix for test data, derived from the current time.
///
/// Keeps repeated runs from colliding on unique columns (email, name).
#[must_use]
pub fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
