//! Catalog filtering over the remote product and price lists.
//!
//! The remote service is the source of truth; every view pulls the full
//! product and price lists and joins them in memory. The join is
//! O(products x prices), acceptable only because the catalog is assumed
//! small - scalability is a documented non-goal. Any remote error aborts
//! the whole request; there are no partial results.

use serde::{Deserialize, Serialize};

use crate::stripe::{Price, Product, StripeClient, StripeError};

/// The fixed product categories of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Dairy products.
    Bulmet,
    /// Animal products.
    Shtazore,
    /// Fruit.
    Fruta,
    /// Vegetables.
    Perime,
    /// Drinks.
    Pije,
    /// Everything else.
    Tjera,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Bulmet,
        Self::Shtazore,
        Self::Fruta,
        Self::Perime,
        Self::Pije,
        Self::Tjera,
    ];

    /// The category tag as stored in product metadata.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bulmet => "Bulmet",
            Self::Shtazore => "Shtazore",
            Self::Fruta => "Fruta",
            Self::Perime => "Perime",
            Self::Pije => "Pije",
            Self::Tjera => "Tjera",
        }
    }

    /// Human-readable page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bulmet => "Produkte bulmeti",
            Self::Shtazore => "Produkte shtazore",
            Self::Fruta => "Fruta",
            Self::Perime => "Perime",
            Self::Pije => "Pije",
            Self::Tjera => "Të tjera",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// An active product annotated with its current price, ready for display.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// Remote product id.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// First image URL, if the product has any.
    pub image: Option<String>,
    /// Current unit price in minor currency units.
    pub unit_amount: i64,
    /// Id of the current price.
    pub price_id: String,
    /// Category tag from metadata.
    pub category: String,
    /// Owning farmer's account name, if set.
    pub farmer: Option<String>,
}

/// Join products with their current prices.
///
/// For each active product, collect all prices referencing it; products
/// with no price are excluded. The current price is the one with the
/// maximum creation timestamp.
#[must_use]
pub fn annotate(products: &[Product], prices: &[Price]) -> Vec<CatalogItem> {
    products
        .iter()
        .filter(|product| product.active)
        .filter_map(|product| {
            let latest = prices
                .iter()
                .filter(|price| price.product == product.id)
                .max_by_key(|price| price.created)?;

            Some(CatalogItem {
                id: product.id.clone(),
                name: product.name.clone(),
                description: product.description.clone(),
                image: product.image().map(str::to_owned),
                unit_amount: latest.unit_amount,
                price_id: latest.id.clone(),
                category: product.category().to_owned(),
                farmer: product.farmer().map(str::to_owned),
            })
        })
        .collect()
}

/// Keep only items in the given category.
#[must_use]
pub fn by_category(items: Vec<CatalogItem>, category: Category) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(|item| item.category == category.tag())
        .collect()
}

/// Keep only items owned by the named farmer.
///
/// Ownership is joined by account name, which is what the remote catalog
/// stores in product metadata. Renaming an account breaks this linkage.
#[must_use]
pub fn by_farmer(items: Vec<CatalogItem>, farmer_name: &str) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(|item| item.farmer.as_deref() == Some(farmer_name))
        .collect()
}

/// Keep only items whose name contains the query, case-insensitively.
///
/// An empty query keeps everything.
#[must_use]
pub fn by_name(items: Vec<CatalogItem>, query: &str) -> Vec<CatalogItem> {
    if query.is_empty() {
        return items;
    }
    let query = query.to_lowercase();
    items
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .collect()
}

/// Catalog views over the remote service.
pub struct CatalogService<'a> {
    stripe: &'a StripeClient,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(stripe: &'a StripeClient) -> Self {
        Self { stripe }
    }

    /// Fetch and annotate the whole active catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if either remote listing fails.
    pub async fn list_all(&self) -> Result<Vec<CatalogItem>, StripeError> {
        let products = self.stripe.list_products().await?;
        let prices = self.stripe.list_prices().await?;
        Ok(annotate(&products, &prices))
    }

    /// Active products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if either remote listing fails.
    pub async fn list_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<CatalogItem>, StripeError> {
        Ok(by_category(self.list_all().await?, category))
    }

    /// Active products owned by the named farmer.
    ///
    /// # Errors
    ///
    /// Returns an error if either remote listing fails.
    pub async fn list_by_farmer(
        &self,
        farmer_name: &str,
    ) -> Result<Vec<CatalogItem>, StripeError> {
        Ok(by_farmer(self.list_all().await?, farmer_name))
    }

    /// Active products whose name matches the query.
    ///
    /// # Errors
    ///
    /// Returns an error if either remote listing fails.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, StripeError> {
        Ok(by_name(self.list_all().await?, query))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::stripe::types::{METADATA_CATEGORY, METADATA_FARMER, UNCATEGORIZED};

    fn product(id: &str, name: &str, active: bool, category: &str, farmer: &str) -> Product {
        let mut metadata = HashMap::new();
        if !category.is_empty() {
            metadata.insert(METADATA_CATEGORY.to_owned(), category.to_owned());
        }
        if !farmer.is_empty() {
            metadata.insert(METADATA_FARMER.to_owned(), farmer.to_owned());
        }
        Product {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
            images: vec![],
            active,
            metadata,
        }
    }

    fn price(id: &str, product: &str, unit_amount: i64, created: i64) -> Price {
        Price {
            id: id.to_owned(),
            product: product.to_owned(),
            unit_amount,
            created,
        }
    }

    #[test]
    fn test_priceless_products_are_excluded() {
        let products = vec![
            product("p1", "Mollë", true, "Fruta", "Agim"),
            product("p2", "Dardhë", true, "Fruta", "Agim"),
        ];
        let prices = vec![price("pr1", "p1", 250, 100)];

        let items = annotate(&products, &prices);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "p1");
    }

    #[test]
    fn test_inactive_products_are_excluded() {
        let products = vec![product("p1", "Mollë", false, "Fruta", "Agim")];
        let prices = vec![price("pr1", "p1", 250, 100)];

        assert!(annotate(&products, &prices).is_empty());
    }

    #[test]
    fn test_latest_price_wins() {
        let products = vec![product("p1", "Mollë", true, "Fruta", "Agim")];
        let prices = vec![
            price("pr_old", "p1", 200, 100),
            price("pr_new", "p1", 300, 300),
            price("pr_mid", "p1", 250, 200),
        ];

        let items = annotate(&products, &prices);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price_id, "pr_new");
        assert_eq!(items[0].unit_amount, 300);
    }

    #[test]
    fn test_missing_category_is_uncategorized() {
        let products = vec![product("p1", "Mollë", true, "", "Agim")];
        let prices = vec![price("pr1", "p1", 250, 100)];

        let items = annotate(&products, &prices);
        assert_eq!(items[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_by_category() {
        let products = vec![
            product("p1", "Mollë", true, "Fruta", "Agim"),
            product("p2", "Djathë", true, "Bulmet", "Agim"),
        ];
        let prices = vec![price("pr1", "p1", 250, 100), price("pr2", "p2", 1200, 100)];

        let fruit = by_category(annotate(&products, &prices), Category::Fruta);
        assert_eq!(fruit.len(), 1);
        assert_eq!(fruit[0].name, "Mollë");
    }

    #[test]
    fn test_by_farmer() {
        let products = vec![
            product("p1", "Mollë", true, "Fruta", "Agim"),
            product("p2", "Dardhë", true, "Fruta", "Besa"),
            product("p3", "Kumbull", true, "Fruta", ""),
        ];
        let prices = vec![
            price("pr1", "p1", 250, 100),
            price("pr2", "p2", 300, 100),
            price("pr3", "p3", 150, 100),
        ];

        let own = by_farmer(annotate(&products, &prices), "Agim");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, "p1");
    }

    #[test]
    fn test_by_name_is_case_insensitive_substring() {
        let products = vec![
            product("p1", "Djathë i bardhë", true, "Bulmet", "Agim"),
            product("p2", "Mollë", true, "Fruta", "Agim"),
        ];
        let prices = vec![price("pr1", "p1", 1200, 100), price("pr2", "p2", 250, 100)];

        let hits = by_name(annotate(&products, &prices), "djath");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");

        let all = by_name(annotate(&products, &prices), "");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_category_tag_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.tag().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("Bulmeti".parse::<Category>().is_err());
    }
}
