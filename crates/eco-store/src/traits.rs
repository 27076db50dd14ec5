use chrono::{DateTime, FixedOffset, Local};
use eco_types::{LedgerSnapshot, PlantEvent, PlantReceipt, Points};

use crate::error::StoreResult;

/// Authoritative, single-writer ledger store.
///
/// All implementations must satisfy these invariants:
/// - Each mutation is indivisible with respect to every other mutation on the
///   same store.
/// - A mutation returns `Ok` only after the full updated snapshot is durable.
/// - A rejected or failed mutation leaves the snapshot unchanged.
/// - The plant history is append-only and never reordered.
pub trait LedgerStore: Send + Sync {
    /// Current snapshot. An empty store reports the default balance.
    fn snapshot(&self) -> LedgerSnapshot;

    /// Add `delta` (possibly negative) to the balance and return the new one.
    fn add_points(&self, delta: Points) -> StoreResult<Points>;

    /// Spend the tree cost and record a tree planted at `at`.
    ///
    /// Fails with [`eco_types::LedgerError::InsufficientFunds`] (wrapped in
    /// [`StoreError::Ledger`](crate::StoreError::Ledger)) when the balance is
    /// below the cost.
    fn plant(&self, at: &DateTime<FixedOffset>) -> StoreResult<PlantReceipt>;

    /// Plant a tree stamped with the current local time.
    fn plant_tree(&self) -> StoreResult<PlantReceipt> {
        self.plant(&Local::now().fixed_offset())
    }

    /// Current balance.
    fn balance(&self) -> Points {
        self.snapshot().points
    }

    /// Every plant event, oldest first.
    fn plant_events(&self) -> Vec<PlantEvent> {
        self.snapshot().plants
    }
}
