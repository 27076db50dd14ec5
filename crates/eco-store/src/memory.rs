use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};
use eco_types::{LedgerResult, LedgerSnapshot, PlantReceipt, Points};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::LedgerStore;

/// In-memory ledger store.
///
/// Intended for tests and embedding. The snapshot lives behind a `Mutex` so
/// every mutation is a single critical section.
pub struct InMemoryLedgerStore {
    state: Mutex<LedgerSnapshot>,
}

impl InMemoryLedgerStore {
    /// Create a store seeded with the default balance.
    pub fn new() -> Self {
        Self::with_snapshot(LedgerSnapshot::default())
    }

    /// Create a store holding `snapshot`.
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    /// Create a store with the given balance and no history.
    pub fn with_balance(points: Points) -> Self {
        Self::with_snapshot(LedgerSnapshot::with_balance(points))
    }

    /// Run `op` against a working copy and publish it if `op` succeeds.
    pub fn transact<T>(
        &self,
        op: impl FnOnce(&mut LedgerSnapshot) -> LedgerResult<T>,
    ) -> StoreResult<T> {
        let mut state = self.state.lock().expect("lock poisoned");
        let mut next = state.clone();
        let out = op(&mut next)?;
        *state = next;
        Ok(out)
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().expect("lock poisoned").clone()
    }

    fn add_points(&self, delta: Points) -> StoreResult<Points> {
        let balance = self.transact(|snap| snap.credit(delta))?;
        debug!(delta, balance, "points added");
        Ok(balance)
    }

    fn plant(&self, at: &DateTime<FixedOffset>) -> StoreResult<PlantReceipt> {
        let receipt = self.transact(|snap| snap.plant(at))?;
        debug!(balance = receipt.balance, "tree planted");
        Ok(receipt)
    }
}

impl std::fmt::Debug for InMemoryLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("InMemoryLedgerStore")
            .field("points", &snap.points)
            .field("plants", &snap.plants.len())
            .finish()
    }
}
