//! Integration tests for the storefront's main flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The storefront running (cargo run -p agrotreg-storefront)
//! - Valid Stripe test credentials in environment
//!
//! Run with: cargo test -p agrotreg-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;

use agrotreg_integration_tests::{base_url, browser_client, unique_suffix};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_health_endpoints() {
    let client = browser_client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to reach /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("Failed to reach /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Registration & Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_register_login_logout() {
    let client = browser_client();
    let base = base_url();
    let suffix = unique_suffix();
    let email = format!("konsumator{suffix}@example.com");

    // Register; should land on the catalog, logged in.
    let resp = client
        .post(format!("{base}/"))
        .form(&[
            ("name", format!("Konsumator {suffix}").as_str()),
            ("email", email.as_str()),
            ("password", "password1"),
            ("role", "Konsumator"),
        ])
        .send()
        .await
        .expect("Failed to register");
    assert!(resp.url().path().ends_with("/home"));

    // Registering the same email again redirects to login with a message.
    let other = browser_client();
    let resp = other
        .post(format!("{base}/"))
        .form(&[
            ("name", format!("Tjetër {suffix}").as_str()),
            ("email", email.as_str()),
            ("password", "password1"),
            ("role", "Konsumator"),
        ])
        .send()
        .await
        .expect("Failed to re-register");
    assert!(resp.url().path().ends_with("/login"));

    // Log out, then log back in with the same credentials.
    let resp = client
        .get(format!("{base}/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.url().path(), "/");

    let resp = client
        .post(format!("{base}/login"))
        .form(&[("email", email.as_str()), ("password", "password1")])
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.url().path().ends_with("/home"));

    // Wrong password bounces back to the login page.
    let resp = client
        .post(format!("{base}/login"))
        .form(&[("email", email.as_str()), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to attempt login");
    assert!(resp.url().path().ends_with("/login"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_cart_add_remove_clear() {
    let client = browser_client();
    let base = base_url();

    // Add a line; the cart page should show it with the computed total.
    let resp = client
        .post(format!("{base}/add-to-cart"))
        .form(&[
            ("product_id", "p1"),
            ("name", "Mollë"),
            ("unit_amount", "250"),
            ("quantity", "3"),
        ])
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.url().path().ends_with("/cart"));
    let body = resp.text().await.expect("Failed to read cart page");
    assert!(body.contains("Mollë"));
    assert!(body.contains("7.50 L"));

    // Adding the same product merges quantities: 3 + 2 = 5.
    let resp = client
        .post(format!("{base}/add-to-cart"))
        .form(&[
            ("product_id", "p1"),
            ("name", "Mollë"),
            ("unit_amount", "250"),
            ("quantity", "2"),
        ])
        .send()
        .await
        .expect("Failed to add to cart again");
    let body = resp.text().await.expect("Failed to read cart page");
    assert!(body.contains("12.50 L"));

    // Zero quantity is rejected.
    let resp = client
        .post(format!("{base}/add-to-cart"))
        .form(&[
            ("product_id", "p2"),
            ("name", "Dardhë"),
            ("unit_amount", "300"),
            ("quantity", "0"),
        ])
        .send()
        .await
        .expect("Failed to post zero quantity");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Removing an absent product is a no-op.
    let resp = client
        .post(format!("{base}/remove-from-cart"))
        .form(&[("product_id", "not-in-cart")])
        .send()
        .await
        .expect("Failed to remove absent product");
    let body = resp.text().await.expect("Failed to read cart page");
    assert!(body.contains("12.50 L"));

    // Clearing empties the cart.
    client
        .post(format!("{base}/clear-cart"))
        .send()
        .await
        .expect("Failed to clear cart");
    let body = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart page");
    assert!(body.contains("Shporta është bosh"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront, database, and Stripe test credentials"]
async fn test_checkout_unknown_product_is_rejected() {
    let client = browser_client();
    let base = base_url();
    let suffix = unique_suffix();

    // A logged-in consumer with a cart line that matches no remote product.
    client
        .post(format!("{base}/"))
        .form(&[
            ("name", format!("Blerës {suffix}").as_str()),
            ("email", format!("bleres{suffix}@example.com").as_str()),
            ("password", "password1"),
            ("role", "Konsumator"),
        ])
        .send()
        .await
        .expect("Failed to register");

    client
        .post(format!("{base}/add-to-cart"))
        .form(&[
            ("product_id", "ghost"),
            ("name", format!("Produkt-që-s'ekziston-{suffix}").as_str()),
            ("unit_amount", "100"),
            ("quantity", "1"),
        ])
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .post(format!("{base}/create-checkout-session"))
        .send()
        .await
        .expect("Failed to post checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    let error = body["error"].as_str().expect("error field missing");
    assert!(error.contains("no price found"), "unexpected error: {error}");

    // No session was created, so the cart survives.
    let body = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart page");
    assert!(!body.contains("Shporta është bosh"));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_checkout_requires_login() {
    let client = browser_client();
    let base = base_url();

    client
        .post(format!("{base}/add-to-cart"))
        .form(&[
            ("product_id", "p1"),
            ("name", "Mollë"),
            ("unit_amount", "250"),
            ("quantity", "1"),
        ])
        .send()
        .await
        .expect("Failed to add to cart");

    // Anonymous checkout is redirected to the login page.
    let resp = client
        .post(format!("{base}/create-checkout-session"))
        .send()
        .await
        .expect("Failed to post checkout");
    assert!(resp.url().path().ends_with("/login"));
}

// ============================================================================
// Role-scoped pages
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_farmer_pages_are_role_scoped() {
    let client = browser_client();
    let base = base_url();
    let suffix = unique_suffix();

    // A consumer cannot open the farmer portal.
    client
        .post(format!("{base}/"))
        .form(&[
            ("name", format!("Konsumator {suffix}").as_str()),
            ("email", format!("k{suffix}@example.com").as_str()),
            ("password", "password1"),
            ("role", "Konsumator"),
        ])
        .send()
        .await
        .expect("Failed to register");

    let resp = client
        .get(format!("{base}/produktet-e-tua"))
        .send()
        .await
        .expect("Failed to fetch farmer page");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Anonymous users are sent to login instead.
    let anonymous = browser_client();
    let resp = anonymous
        .get(format!("{base}/shto-produkt"))
        .send()
        .await
        .expect("Failed to fetch farmer page");
    assert!(resp.url().path().ends_with("/login"));
}
