// src/arb/rayon_scan.rs

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::catalog::Product;

use super::{generate, Opportunity, Scanner, Thresholds};


/// `RayonScanner` evaluates every product's marketplace pairs using
/// data-parallelism via the Rayon library.
///
/// This scanner pays off when:
/// - The catalog holds thousands of products
/// - Products list many marketplaces (the pair count grows as `n * (n - 1)`)
///
/// Per-product results are gathered through an indexed `par_iter().map(...)`,
/// so the merged output keeps catalog order and is identical to `NaiveScanner`.
/// Ties in later sorts therefore resolve the same way regardless of strategy.
pub struct RayonScanner;

impl Scanner for RayonScanner {
    fn collect(
        &self,
        products: &[&Product],
        thresholds: &Thresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        let per_product: Vec<Vec<Opportunity>> = products
            .par_iter()
            .map(|product| generate(product, thresholds, generated_at))
            .collect();

        per_product.into_iter().flatten().collect()
    }
}
