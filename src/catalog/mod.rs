// src/catalog/mod.rs

pub mod fixture;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// A single listed product and its price on every marketplace that carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Display label, e.g. "Home & Kitchen". Not the catalog category key.
    pub category: String,
    pub image_url: String,
    pub prices: BTreeMap<String, f64>,
}

/// A named group of products, keyed the way callers filter on it (e.g. "electronics").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub products: Vec<Product>,
}


/// Selects which categories a scan walks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}


#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("product {product_id}: negative price {price} on {marketplace}")]
    NegativePrice { product_id: String, marketplace: String, price: f64 },

    #[error("product {product_id}: non-finite price on {marketplace}")]
    NonFinitePrice { product_id: String, marketplace: String },

    #[error("duplicate product id: {0}")]
    DuplicateProductId(String),

    #[error("duplicate category key: {0}")]
    DuplicateCategory(String),
}


/// Immutable, validated product catalog.
///
/// Categories and the products inside them keep their insertion order, which is
/// the order every scan and search walks them in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Validates and wraps the given categories.
    ///
    /// Rejects negative or non-finite prices, repeated product ids (across all
    /// categories) and repeated category keys. Zero prices are accepted.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        let mut ids = HashSet::new();

        for category in &categories {
            if !keys.insert(category.key.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.key.clone()));
            }
            for product in &category.products {
                if !ids.insert(product.id.as_str()) {
                    return Err(CatalogError::DuplicateProductId(product.id.clone()));
                }
                validate_prices(product)?;
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.categories.iter().flat_map(|c| c.products.iter())
    }

    /// Products in scan order for the given filter. An unknown category key
    /// yields an empty list.
    pub fn products_in(&self, filter: &CategoryFilter) -> Vec<&Product> {
        match filter {
            CategoryFilter::All => self.products().collect(),
            CategoryFilter::Only(key) => self
                .categories
                .iter()
                .filter(|c| &c.key == key)
                .flat_map(|c| c.products.iter())
                .collect(),
        }
    }

    pub fn find_by_id(&self, product_id: &str) -> Option<&Product> {
        self.products().find(|p| p.id == product_id)
    }

    /// Case-insensitive substring match on product name.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Rebuilds the catalog with every price passed through `reprice`.
    ///
    /// Used by the simulated feed; the closure receives the product id,
    /// marketplace and current price.
    pub fn map_prices<F>(&self, mut reprice: F) -> Result<Self, CatalogError>
    where
        F: FnMut(&str, &str, f64) -> f64,
    {
        let categories = self
            .categories
            .iter()
            .map(|category| Category {
                key: category.key.clone(),
                products: category
                    .products
                    .iter()
                    .map(|product| {
                        let prices = product
                            .prices
                            .iter()
                            .map(|(market, &price)| (market.clone(), reprice(&product.id, market, price)))
                            .collect();
                        Product { prices, ..product.clone() }
                    })
                    .collect(),
            })
            .collect();
        Self::new(categories)
    }
}


fn validate_prices(product: &Product) -> Result<(), CatalogError> {
    for (marketplace, &price) in &product.prices {
        if !price.is_finite() {
            return Err(CatalogError::NonFinitePrice {
                product_id: product.id.clone(),
                marketplace: marketplace.clone(),
            });
        }
        if price < 0.0 {
            return Err(CatalogError::NegativePrice {
                product_id: product.id.clone(),
                marketplace: marketplace.clone(),
                price,
            });
        }
    }
    Ok(())
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, name: &str, prices: &[(&str, f64)]) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            category: "Electronics".into(),
            image_url: format!("https://example.com/{id}.jpg"),
            prices: prices.iter().map(|(m, p)| (m.to_string(), *p)).collect(),
        }
    }

    pub(crate) fn catalog_of(categories: &[(&str, Vec<Product>)]) -> Catalog {
        Catalog::new(
            categories
                .iter()
                .map(|(key, products)| Category { key: key.to_string(), products: products.clone() })
                .collect(),
        )
        .expect("valid test catalog")
    }

    #[test]
    fn rejects_negative_price() {
        let bad = product("1", "Widget", &[("amazon", 10.0), ("ebay", -1.0)]);
        let err = Catalog::new(vec![Category { key: "misc".into(), products: vec![bad] }]).unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice { ref marketplace, .. } if marketplace == "ebay"));
    }

    #[test]
    fn rejects_nan_and_infinite_prices() {
        for price in [f64::NAN, f64::INFINITY] {
            let bad = product("1", "Widget", &[("amazon", price)]);
            let err = Catalog::new(vec![Category { key: "misc".into(), products: vec![bad] }]).unwrap_err();
            assert!(matches!(err, CatalogError::NonFinitePrice { .. }));
        }
    }

    #[test]
    fn rejects_duplicate_ids_across_categories() {
        let a = product("7", "A", &[("amazon", 1.0)]);
        let b = product("7", "B", &[("ebay", 1.0)]);
        let err = Catalog::new(vec![
            Category { key: "one".into(), products: vec![a] },
            Category { key: "two".into(), products: vec![b] },
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateProductId("7".into()));
    }

    #[test]
    fn rejects_duplicate_category_keys() {
        let err = Catalog::new(vec![
            Category { key: "toys".into(), products: vec![] },
            Category { key: "toys".into(), products: vec![] },
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCategory("toys".into()));
    }

    #[test]
    fn accepts_zero_and_empty_prices() {
        let free = product("1", "Freebie", &[("amazon", 0.0), ("ebay", 30.0)]);
        let unlisted = product("2", "Unlisted", &[]);
        let catalog = catalog_of(&[("misc", vec![free, unlisted])]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = catalog_of(&[(
            "electronics",
            vec![
                product("1", "Sony WH-1000XM4 Wireless Headphones", &[("amazon", 248.0)]),
                product("2", "Apple AirPods Pro", &[("amazon", 179.99)]),
            ],
        )]);

        let lower: Vec<_> = catalog.search("sony").iter().map(|p| p.id.clone()).collect();
        let upper: Vec<_> = catalog.search("SONY").iter().map(|p| p.id.clone()).collect();
        assert_eq!(lower, vec!["1"]);
        assert_eq!(lower, upper);
        assert!(catalog.search("nintendo").is_empty());
    }

    #[test]
    fn find_by_id_walks_every_category() {
        let catalog = catalog_of(&[
            ("electronics", vec![product("1", "A", &[])]),
            ("toys", vec![product("5", "B", &[])]),
        ]);
        assert_eq!(catalog.find_by_id("5").map(|p| p.name.as_str()), Some("B"));
        assert!(catalog.find_by_id("99").is_none());
    }

    #[test]
    fn products_in_unknown_category_is_empty() {
        let catalog = catalog_of(&[("toys", vec![product("5", "B", &[])])]);
        assert!(catalog.products_in(&CategoryFilter::from("garden")).is_empty());
        assert_eq!(catalog.products_in(&CategoryFilter::from("all")).len(), 1);
        assert_eq!(catalog.products_in(&CategoryFilter::from("")).len(), 1);
        assert!(catalog.products_in(&CategoryFilter::from("ALL")).is_empty());
        assert!(catalog.products_in(&CategoryFilter::from("Toys")).is_empty());
    }

    #[test]
    fn map_prices_revalidates() {
        let catalog = catalog_of(&[("toys", vec![product("5", "B", &[("amazon", 10.0)])])]);
        let doubled = catalog.map_prices(|_, _, p| p * 2.0).unwrap();
        assert_eq!(doubled.find_by_id("5").unwrap().prices["amazon"], 20.0);
        assert!(catalog.map_prices(|_, _, _| -1.0).is_err());
    }
}
