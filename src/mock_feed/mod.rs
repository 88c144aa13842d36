// src/mock_feed/mod.rs

pub mod price_drift;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::Catalog;


/// Shared handle to the current catalog snapshot.
///
/// Readers take an `Arc<Catalog>` and query it without holding the lock; the
/// feed swaps in a whole new snapshot, so a query never sees a half-updated catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn publish(&self, catalog: Catalog) {
        *self.current.write().await = Arc::new(catalog);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn old_snapshot_survives_publish() {
        let store = CatalogStore::new(Catalog::demo().unwrap());
        let before = store.snapshot().await;

        store.publish(Catalog::default()).await;
        let after = store.snapshot().await;

        assert_eq!(before.len(), 6);
        assert!(after.is_empty());
    }
}
