//! The session shopping cart.
//!
//! The cart lives in the browser session (serialized into the session
//! store) and is passed through explicit request context - there is no
//! ambient global. Amounts are in the minor currency unit.
//!
//! Concurrent requests from the same session (two tabs) read-modify-write
//! the whole cart and can lose updates; single-user-per-session usage makes
//! this acceptable. Known race, last write wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product display name; also the checkout-time price lookup key.
    pub name: String,
    /// Unit price in minor currency units.
    pub unit_amount: i64,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// `quantity * unit_amount`, kept materialized for templates.
    pub total: i64,
}

/// A per-session shopping cart: product id -> line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: BTreeMap<String, CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// If the product id is already present, its quantity is incremented
    /// and the line total recomputed; the stored name and unit price are
    /// kept from the first add. Quantity must be >= 1; zero is rejected at
    /// the route boundary before this is called.
    pub fn add(&mut self, product_id: &str, name: &str, unit_amount: i64, quantity: u32) {
        self.lines
            .entry(product_id.to_owned())
            .and_modify(|line| {
                line.quantity += quantity;
                line.total = i64::from(line.quantity) * line.unit_amount;
            })
            .or_insert_with(|| CartLine {
                name: name.to_owned(),
                unit_amount,
                quantity,
                total: i64::from(quantity) * unit_amount,
            });
    }

    /// Remove a product from the cart. No-op if the id is not present.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.remove(product_id);
    }

    /// Sum of all line totals, in minor currency units.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.lines.values().map(|line| line.total).sum()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct product lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over (product id, line) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CartLine)> {
        self.lines.iter()
    }

    /// Owned (product id, line) pairs, for templates.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, CartLine)> {
        self.lines
            .iter()
            .map(|(id, line)| (id.clone(), line.clone()))
            .collect()
    }

    /// Iterate over the lines.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }
}
