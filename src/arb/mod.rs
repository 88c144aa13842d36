// src/arb/mod.rs

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, CategoryFilter, Product};

pub mod config;
pub mod filter;
pub mod naive;
pub mod rayon_scan;

pub use config::ScanStrategy;
pub use filter::{filter, FilterCriteria, SortKey, SortOrder};
pub use naive::{candidate_pairs, generate, NaiveScanner};
pub use rayon_scan::RayonScanner;


/// Generation-time cut-offs. A pair is kept only when it beats both, strictly.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub min_profit: f64,
    pub min_profit_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_profit: 20.0,
            min_profit_pct: 10.0,
        }
    }
}

impl Thresholds {
    pub fn new(min_profit: f64, min_profit_pct: f64) -> Self {
        Self { min_profit, min_profit_pct }
    }

    #[inline]
    pub fn admits(&self, profit: f64, profit_pct: f64) -> bool {
        profit > self.min_profit && profit_pct > self.min_profit_pct
    }
}


/// Buy on `source_marketplace`, resell on `target_marketplace`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub product_name: String,
    pub product_id: String,
    pub source_marketplace: String,
    pub source_price: f64,
    pub target_marketplace: String,
    pub target_price: f64,
    pub profit: f64,
    pub profit_percentage: f64,
    pub category: String,
    pub image_url: String,
    pub source_url: String,
    pub target_url: String,
    pub last_updated: DateTime<Utc>,
}

impl Opportunity {
    pub(crate) fn new(
        product: &Product,
        source: &str,
        source_price: f64,
        target: &str,
        target_price: f64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let profit = target_price - source_price;
        Self {
            id: format!("{}-{}-{}", product.id, source, target),
            product_name: product.name.clone(),
            product_id: product.id.clone(),
            source_marketplace: source.to_string(),
            source_price,
            target_marketplace: target.to_string(),
            target_price,
            profit,
            profit_percentage: profit / source_price * 100.0,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            source_url: deep_link(source, &product.id),
            target_url: deep_link(target, &product.id),
            last_updated: generated_at,
        }
    }
}

/// Storefront URL for a product on a marketplace.
pub fn deep_link(marketplace: &str, product_id: &str) -> String {
    format!("https://{marketplace}.com/product/{product_id}")
}


/// Walks a set of products and merges every product's opportunities.
pub trait Scanner: Send + Sync {
    /// Opportunities for `products`, merged in product order. Unsorted.
    fn collect(
        &self,
        products: &[&Product],
        thresholds: &Thresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<Opportunity>;

    /// Scan one category (or all of them) and return the merged result,
    /// most profitable first.
    fn scan(
        &self,
        catalog: &Catalog,
        category: &CategoryFilter,
        thresholds: &Thresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        let products = catalog.products_in(category);
        let mut opportunities = self.collect(&products, thresholds, generated_at);
        sort_by_profit_desc(&mut opportunities);
        debug!(
            products = products.len(),
            opportunities = opportunities.len(),
            ?category,
            "catalog scan complete"
        );
        opportunities
    }
}

/// Build the scanner selected in config.
pub fn scanner_for(strategy: ScanStrategy) -> Arc<dyn Scanner> {
    match strategy {
        ScanStrategy::Naive => Arc::new(NaiveScanner),
        ScanStrategy::Rayon => Arc::new(RayonScanner),
    }
}


/// Stable sort, highest profit first.
pub fn sort_by_profit_desc(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| b.profit.total_cmp(&a.profit));
}


/// One product's opportunities, highest profit first. Unknown ids give an empty list.
pub fn product_opportunities(
    catalog: &Catalog,
    product_id: &str,
    thresholds: &Thresholds,
    generated_at: DateTime<Utc>,
) -> Vec<Opportunity> {
    let Some(product) = catalog.find_by_id(product_id) else {
        return Vec::new();
    };
    let mut opportunities = generate(product, thresholds, generated_at);
    sort_by_profit_desc(&mut opportunities);
    opportunities
}


/// The `limit` most profitable opportunities across the whole catalog.
pub fn top(
    scanner: &dyn Scanner,
    catalog: &Catalog,
    thresholds: &Thresholds,
    limit: usize,
    generated_at: DateTime<Utc>,
) -> Vec<Opportunity> {
    let mut opportunities = scanner.scan(catalog, &CategoryFilter::All, thresholds, generated_at);
    opportunities.truncate(limit);
    opportunities
}


/// Result of resolving a composite `productId-source-target` id.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Found, with its rank among the product's opportunities (0 = most profitable).
    Found { rank: usize, opportunity: Opportunity },
    ProductNotFound,
    OpportunityNotFound,
}

/// Product ids that `id` could start with, i.e. every prefix ending just before a `-`.
///
/// Both product ids and marketplace keys may contain `-`, so the composite id
/// cannot be split blindly; callers check each prefix against the catalog.
fn product_id_prefixes(id: &str) -> impl Iterator<Item = &str> {
    id.match_indices('-').map(move |(at, _)| &id[..at]).filter(|p| !p.is_empty())
}

/// Resolve a `productId-source-target` id as produced by [`Opportunity`].
pub fn find_opportunity(
    catalog: &Catalog,
    id: &str,
    thresholds: &Thresholds,
    generated_at: DateTime<Utc>,
) -> Lookup {
    let mut product_seen = false;

    for product_id in product_id_prefixes(id) {
        if catalog.find_by_id(product_id).is_none() {
            continue;
        }
        product_seen = true;

        let found = product_opportunities(catalog, product_id, thresholds, generated_at)
            .into_iter()
            .enumerate()
            .find(|(_, o)| o.id == id);
        if let Some((rank, opportunity)) = found {
            return Lookup::Found { rank, opportunity };
        }
    }

    if product_seen { Lookup::OpportunityNotFound } else { Lookup::ProductNotFound }
}


pub(crate) fn compare_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
