use async_trait::async_trait;
use eco_types::{LedgerSnapshot, Points};

use crate::backend::{LedgerBackend, PlantOutcome};
use crate::cache::LocalCache;
use crate::error::{BackendError, BackendResult};
use crate::kv::KeyValueStore;

/// Ledger adapter over the local cache.
///
/// Applies the same guard and arithmetic as the authoritative store, via
/// [`LedgerSnapshot`], so a fallback result is indistinguishable from a
/// remote one given the same starting balance.
#[derive(Debug)]
pub struct CacheBackend<S> {
    cache: LocalCache<S>,
}

impl<S: KeyValueStore> CacheBackend<S> {
    pub fn new(cache: LocalCache<S>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &LocalCache<S> {
        &self.cache
    }
}

#[async_trait]
impl<S: KeyValueStore> LedgerBackend for CacheBackend<S> {
    async fn add_points(&self, delta: Points) -> BackendResult<Points> {
        self.cache.credit(delta)?.map_err(BackendError::Rejected)
    }

    async fn plant_tree(&self) -> BackendResult<PlantOutcome> {
        match self.cache.update(|snap| snap.plant_tree())? {
            Ok(receipt) => Ok(PlantOutcome::Planted(receipt)),
            Err(rejection) => Ok(PlantOutcome::Rejected {
                balance: rejection.balance(),
            }),
        }
    }

    async fn snapshot(&self) -> BackendResult<LedgerSnapshot> {
        Ok(self.cache.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKeyValueStore;
    use eco_types::TREE_COST;

    fn backend(balance: Option<Points>) -> CacheBackend<MemoryKeyValueStore> {
        let cache = LocalCache::new(MemoryKeyValueStore::new());
        if let Some(balance) = balance {
            cache.set_balance(balance).unwrap();
        }
        CacheBackend::new(cache)
    }

    #[tokio::test]
    async fn add_points_defaults_to_seed() {
        let b = backend(None);
        assert_eq!(b.add_points(200).await.unwrap(), 1700);
        assert_eq!(b.cache().balance(), 1700);
    }

    #[tokio::test]
    async fn overflowing_add_is_rejected() {
        let b = backend(Some(Points::MAX));
        let err = b.add_points(1).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(b.cache().balance(), Points::MAX);
    }

    #[tokio::test]
    async fn plant_then_reject() {
        let b = backend(None);
        match b.plant_tree().await.unwrap() {
            PlantOutcome::Planted(receipt) => {
                assert_eq!(receipt.balance, 500);
                assert_eq!(receipt.event.points_spent, TREE_COST);
            }
            other => panic!("expected plant, got {other:?}"),
        }
        assert_eq!(
            b.plant_tree().await.unwrap(),
            PlantOutcome::Rejected { balance: 500 }
        );
        assert_eq!(b.cache().plant_events().len(), 1);
        assert_eq!(b.cache().balance(), 500);
    }

    #[tokio::test]
    async fn rejection_leaves_cache_unwritten() {
        let b = backend(Some(999));
        let before = b.cache().kv().get(crate::cache::PLANTS_KEY);
        assert_eq!(
            b.plant_tree().await.unwrap(),
            PlantOutcome::Rejected { balance: 999 }
        );
        assert_eq!(b.cache().kv().get(crate::cache::PLANTS_KEY), before);
    }
}
