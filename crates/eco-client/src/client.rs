use eco_protocol::{ErrorResponse, PlantTreeResponse};
use eco_types::{LedgerSnapshot, PlantEvent, Points};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::backend::{LedgerBackend, PlantOutcome};
use crate::cache::LocalCache;
use crate::error::ClientResult;
use crate::kv::KeyValueStore;
use crate::local::CacheBackend;

/// Result of [`LedgerClient::request_add_points`]. Serializes as
/// `{"points": n}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddPointsResult {
    #[serde(rename = "points")]
    pub balance: Points,
}

/// Result of [`LedgerClient::request_plant_tree`].
///
/// Serializes as `{"success": true, "points": n, "plant": {...}}` or
/// `{"error": "Not enough points", "points": n}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlantTreeResult {
    Planted { balance: Points, plant_event: PlantEvent },
    NotEnoughPoints { balance: Points },
}

impl PlantTreeResult {
    pub fn balance(&self) -> Points {
        match self {
            Self::Planted { balance, .. } | Self::NotEnoughPoints { balance } => *balance,
        }
    }

    pub fn is_planted(&self) -> bool {
        matches!(self, Self::Planted { .. })
    }
}

impl From<PlantOutcome> for PlantTreeResult {
    fn from(outcome: PlantOutcome) -> Self {
        match outcome {
            PlantOutcome::Planted(receipt) => Self::Planted {
                balance: receipt.balance,
                plant_event: receipt.event,
            },
            PlantOutcome::Rejected { balance } => Self::NotEnoughPoints { balance },
        }
    }
}

impl Serialize for PlantTreeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Planted { balance, plant_event } => PlantTreeResponse {
                success: true,
                points: *balance,
                plant: plant_event.clone(),
            }
            .serialize(serializer),
            Self::NotEnoughPoints { balance } => {
                ErrorResponse::not_enough_points(*balance).serialize(serializer)
            }
        }
    }
}

/// Remote-first ledger client with local cache fallback.
///
/// Each request makes exactly one attempt against `remote`. If it succeeds
/// the cache is updated to mirror the authoritative result. If the remote
/// cannot be consulted, the same operation runs once against the cache. A
/// remote business rejection is final and leaves the cache alone. Once the
/// remote has committed, a failure to mirror into the cache is logged and the
/// remote result is still returned.
///
/// Callers get the same result shape whichever path ran.
pub struct LedgerClient<R, S> {
    remote: R,
    local: CacheBackend<S>,
}

impl<R: LedgerBackend, S: KeyValueStore> LedgerClient<R, S> {
    pub fn new(remote: R, cache: LocalCache<S>) -> Self {
        Self {
            remote,
            local: CacheBackend::new(cache),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cache(&self) -> &LocalCache<S> {
        self.local.cache()
    }

    /// Credit `delta` points.
    pub async fn request_add_points(&self, delta: Points) -> ClientResult<AddPointsResult> {
        let balance = match self.remote.add_points(delta).await {
            Ok(balance) => {
                if let Err(e) = self.cache().set_balance(balance) {
                    warn!(error = %e, balance, "points added remotely but cache not updated");
                }
                debug!(delta, balance, "points added remotely");
                balance
            }
            Err(e) if e.is_rejection() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "addPoints unreachable, using local cache");
                let balance = self.local.add_points(delta).await?;
                debug!(delta, balance, "points added locally");
                balance
            }
        };
        Ok(AddPointsResult { balance })
    }

    /// Spend points on a tree.
    pub async fn request_plant_tree(&self) -> ClientResult<PlantTreeResult> {
        let outcome = match self.remote.plant_tree().await {
            Ok(PlantOutcome::Planted(receipt)) => {
                if let Err(e) = self
                    .cache()
                    .record_plant(receipt.balance, receipt.event.clone())
                {
                    warn!(error = %e, balance = receipt.balance, "tree planted remotely but cache not updated");
                }
                debug!(balance = receipt.balance, "tree planted remotely");
                PlantOutcome::Planted(receipt)
            }
            Ok(rejected @ PlantOutcome::Rejected { .. }) => {
                debug!("plant rejected by store");
                rejected
            }
            Err(e) => {
                warn!(error = %e, "plantTree unreachable, using local cache");
                self.local.plant_tree().await?
            }
        };
        Ok(outcome.into())
    }

    /// Overwrite the cache with the store's snapshot. If the store cannot be
    /// reached, return the cached snapshot unchanged.
    pub async fn refresh(&self) -> ClientResult<LedgerSnapshot> {
        match self.remote.snapshot().await {
            Ok(snapshot) => {
                if let Err(e) = self.cache().store_snapshot(&snapshot) {
                    warn!(error = %e, "ledger fetched but cache not updated");
                }
                debug!(points = snapshot.points, plants = snapshot.plants.len(), "cache reconciled");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "profile unreachable, serving cached ledger");
                Ok(self.cache().snapshot())
            }
        }
    }

    /// The cached snapshot, without contacting the store.
    pub fn cached_snapshot(&self) -> LedgerSnapshot {
        self.cache().snapshot()
    }
}
