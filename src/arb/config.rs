// src/arb/config.rs

use serde::Deserialize;


/// `[scan]` section of `config/price_arb.toml`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScanConfig {
    pub strategy: ScanStrategy,
}

/// How the catalog is walked on each query.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanStrategy {
    /// Sequential loop over products.
    #[default]
    Naive,
    /// Products fanned out across the rayon pool. Same output as `Naive`.
    Rayon,
}
