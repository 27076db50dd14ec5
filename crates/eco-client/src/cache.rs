use eco_types::{LedgerResult, LedgerSnapshot, PlantEvent, Points, DEFAULT_BALANCE};

use crate::error::{CacheError, CacheResult};
use crate::kv::KeyValueStore;

/// Cache key holding the balance as a decimal string.
pub const POINTS_KEY: &str = "userPoints";
/// Cache key holding the plant history as a JSON array.
pub const PLANTS_KEY: &str = "plantsPlanted";

/// Client-side copy of the ledger, stored under two well-known keys.
///
/// The copy may be stale. A missing or unparseable balance reads as
/// [`DEFAULT_BALANCE`]; a missing or unparseable history reads as empty.
#[derive(Debug)]
pub struct LocalCache<S> {
    kv: S,
}

impl<S: KeyValueStore> LocalCache<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn balance(&self) -> Points {
        self.kv
            .get(POINTS_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_BALANCE)
    }

    pub fn set_balance(&self, points: Points) -> CacheResult<()> {
        self.kv.set(POINTS_KEY, points.to_string())
    }

    pub fn plant_events(&self) -> Vec<PlantEvent> {
        self.kv
            .get(PLANTS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            points: self.balance(),
            plants: self.plant_events(),
        }
    }

    /// Overwrite both keys with `snapshot`.
    pub fn store_snapshot(&self, snapshot: &LedgerSnapshot) -> CacheResult<()> {
        let plants = serde_json::to_string(&snapshot.plants)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.kv.set_many(vec![
            (POINTS_KEY, snapshot.points.to_string()),
            (PLANTS_KEY, plants),
        ])
    }

    /// Apply an earn-side delta to the cached balance. An overflowing
    /// delta is rejected and nothing is written.
    pub fn credit(&self, delta: Points) -> CacheResult<LedgerResult<Points>> {
        let mut snapshot = LedgerSnapshot::with_balance(self.balance());
        match snapshot.credit(delta) {
            Ok(balance) => {
                self.set_balance(balance)?;
                Ok(Ok(balance))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    /// Mirror an authoritative plant: take the store's balance and append
    /// its event to the cached history.
    pub fn record_plant(&self, balance: Points, event: PlantEvent) -> CacheResult<()> {
        let mut snapshot = self.snapshot();
        snapshot.points = balance;
        snapshot.plants.push(event);
        self.store_snapshot(&snapshot)
    }

    /// Read the cached snapshot, let `op` mutate it, and write it back if
    /// `op` returns `Ok`.
    pub fn update<T, E>(
        &self,
        op: impl FnOnce(&mut LedgerSnapshot) -> Result<T, E>,
    ) -> CacheResult<Result<T, E>> {
        let mut snapshot = self.snapshot();
        match op(&mut snapshot) {
            Ok(out) => {
                self.store_snapshot(&snapshot)?;
                Ok(Ok(out))
            }
            Err(e) => Ok(Err(e)),
        }
    }
}
