// src/arb/naive.rs

use chrono::{DateTime, Utc};

use crate::catalog::Product;

use super::{Opportunity, Scanner, Thresholds};


/// Every ordered `(source, source_price, target, target_price)` pair with
/// `source != target`, in marketplace order. `n` marketplaces give `n * (n - 1)` pairs.
pub fn candidate_pairs(product: &Product) -> impl Iterator<Item = (&str, f64, &str, f64)> {
    product.prices.iter().flat_map(move |(source, &source_price)| {
        product
            .prices
            .iter()
            .filter(move |(target, _)| *target != source)
            .map(move |(target, &target_price)| (source.as_str(), source_price, target.as_str(), target_price))
    })
}


/// Opportunities for a single product, unordered.
///
/// A zero-priced source has no defined margin and is skipped; it may still
/// appear as a target.
pub fn generate(product: &Product, thresholds: &Thresholds, generated_at: DateTime<Utc>) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for (source, source_price, target, target_price) in candidate_pairs(product) {
        if source_price <= 0.0 {
            continue;
        }

        let profit = target_price - source_price;
        let profit_pct = profit / source_price * 100.0;

        if thresholds.admits(profit, profit_pct) {
            opportunities.push(Opportunity::new(
                product,
                source,
                source_price,
                target,
                target_price,
                generated_at,
            ));
        }
    }
    opportunities
}


/// Sequential scanner. Plenty for catalogs of a few hundred products.
pub struct NaiveScanner;

impl Scanner for NaiveScanner {
    fn collect(
        &self,
        products: &[&Product],
        thresholds: &Thresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        products
            .iter()
            .flat_map(|product| generate(product, thresholds, generated_at))
            .collect()
    }
}
