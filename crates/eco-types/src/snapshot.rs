use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::plant::PlantEvent;
use crate::points::{Points, DEFAULT_BALANCE, TREE_COST};

/// Point-in-time ledger state: the balance and the ordered plant history.
///
/// Both the authoritative store and the client cache mutate their state
/// through this type, so the spend guard and the arithmetic are identical on
/// either side of the network.
///
/// Invariants:
/// - `plants` is append-only; insertion order is chronological order.
/// - A plant never drives `points` below zero; [`plant`](Self::plant)
///   checks before mutating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub points: Points,
    #[serde(default)]
    pub plants: Vec<PlantEvent>,
}

/// Result of a successful plant: the new balance and the appended record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantReceipt {
    pub balance: Points,
    pub event: PlantEvent,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self::with_balance(DEFAULT_BALANCE)
    }
}

impl LedgerSnapshot {
    /// A snapshot with the given balance and no history.
    pub fn with_balance(points: Points) -> Self {
        Self {
            points,
            plants: Vec::new(),
        }
    }

    /// Apply an earn-side delta. Negative deltas are accepted without a
    /// lower bound. Returns the new balance.
    ///
    /// Fails with [`LedgerError::Overflow`] and leaves the snapshot untouched
    /// when the result does not fit in [`Points`].
    pub fn credit(&mut self, delta: Points) -> LedgerResult<Points> {
        self.points = self
            .points
            .checked_add(delta)
            .ok_or(LedgerError::Overflow {
                balance: self.points,
                delta,
            })?;
        Ok(self.points)
    }

    /// Spend [`TREE_COST`] on a tree planted at `at`.
    ///
    /// The event is built here, after the guard, so every recorded plant
    /// spent exactly what the balance lost. Fails with
    /// [`LedgerError::InsufficientFunds`] and leaves the snapshot untouched
    /// when the balance cannot cover the cost.
    pub fn plant<Tz>(&mut self, at: &DateTime<Tz>) -> LedgerResult<PlantReceipt>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.points < TREE_COST {
            return Err(LedgerError::InsufficientFunds {
                balance: self.points,
                required: TREE_COST,
            });
        }
        let event = PlantEvent::tree_at(at);
        self.points -= event.points_spent;
        self.plants.push(event.clone());
        Ok(PlantReceipt {
            balance: self.points,
            event,
        })
    }

    /// Spend [`TREE_COST`] on a tree stamped with the current local time.
    pub fn plant_tree(&mut self) -> LedgerResult<PlantReceipt> {
        self.plant(&Local::now())
    }

    /// Number of trees planted so far.
    pub fn trees_planted(&self) -> usize {
        self.plants.len()
    }
}
