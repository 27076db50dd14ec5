use async_trait::async_trait;
use eco_types::{LedgerSnapshot, PlantReceipt, Points};

use crate::error::BackendResult;

/// Result of a plant attempt that reached a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlantOutcome {
    Planted(PlantReceipt),
    /// The ledger refused: not enough points. Carries the balance it saw.
    Rejected { balance: Points },
}

/// A ledger the client can act against: the remote store or the local cache.
///
/// `Err` means the ledger could not be consulted at all. Business-rule
/// rejections are successful consultations and come back as
/// [`PlantOutcome::Rejected`].
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Add `delta` to the balance and return the new balance.
    async fn add_points(&self, delta: Points) -> BackendResult<Points>;

    /// Spend the tree cost, or report that the balance is too low.
    async fn plant_tree(&self) -> BackendResult<PlantOutcome>;

    /// Read the full balance and plant history.
    async fn snapshot(&self) -> BackendResult<LedgerSnapshot>;
}
