// src/mock_feed/price_drift.rs

use std::time::Duration;

use anyhow::Result;
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::FeedConfig;

use super::CatalogStore;


/// Reprice every listing to within `max_drift_pct` of its price in `base`.
///
/// Drift is always taken from the base catalog, never compounded, so prices
/// wander around their listed value instead of walking off. Results are
/// rounded to cents and never go below zero.
pub fn drift_catalog<R: Rng>(base: &Catalog, rng: &mut R, max_drift_pct: f64) -> Result<Catalog> {
    let span = max_drift_pct / 100.0;
    let catalog = base.map_prices(|_, _, price| {
        let factor = if span > 0.0 { 1.0 + rng.gen_range(-span..=span) } else { 1.0 };
        ((price * factor * 100.0).round() / 100.0).max(0.0)
    })?;
    Ok(catalog)
}


/// Spawns the background task that republishes a drifted catalog every `interval_ms`.
pub fn start_price_drift(store: CatalogStore, base: Catalog, config: &FeedConfig) -> Result<JoinHandle<()>> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_rng(OsRng)?,
    };
    let interval = Duration::from_millis(config.interval_ms);
    let max_drift_pct = config.max_drift_pct;

    Ok(tokio::spawn(async move {
        let mut tick: u64 = 0;
        loop {
            tokio::time::sleep(interval).await;
            tick += 1;

            match drift_catalog(&base, &mut rng, max_drift_pct) {
                Ok(next) => {
                    store.publish(next).await;
                    debug!(tick, "published repriced catalog");
                }
                Err(e) => warn!(tick, error = %e, "repricing produced an invalid catalog; keeping previous snapshot"),
            }
        }
    }))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_stays_within_bounds() {
        let base = Catalog::demo().unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(7);

        for _ in 0..20 {
            let drifted = drift_catalog(&base, &mut rng, 5.0).unwrap();
            for (old, new) in base.products().zip(drifted.products()) {
                assert_eq!(old.id, new.id);
                for (market, &price) in &old.prices {
                    let moved = new.prices[market];
                    // 5% plus half a cent of rounding slack.
                    assert!((moved - price).abs() <= price * 0.05 + 0.005, "{market}: {price} -> {moved}");
                }
            }
        }
    }

    #[test]
    fn zero_drift_is_identity() {
        let base = Catalog::demo().unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        assert_eq!(drift_catalog(&base, &mut rng, 0.0).unwrap(), base);
    }

    #[test]
    fn same_seed_same_prices() {
        let base = Catalog::demo().unwrap();
        let a = drift_catalog(&base, &mut ChaCha12Rng::seed_from_u64(42), 3.0).unwrap();
        let b = drift_catalog(&base, &mut ChaCha12Rng::seed_from_u64(42), 3.0).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn feed_publishes_new_snapshots() {
        let base = Catalog::demo().unwrap();
        let store = CatalogStore::new(base.clone());
        let config = FeedConfig {
            enabled: true,
            interval_ms: 10,
            max_drift_pct: 10.0,
            seed: Some(3),
        };

        let handle = start_price_drift(store.clone(), base.clone(), &config).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_ne!(*store.snapshot().await, base);
    }
}
