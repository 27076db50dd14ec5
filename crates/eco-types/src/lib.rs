//! Foundation types for the EcoTrack points ledger.
//!
//! This crate provides the balance arithmetic and record types shared by the
//! ledger store, the HTTP server, and the client cache. Every other EcoTrack
//! crate depends on `eco-types`.
//!
//! # Key Types
//!
//! - [`Points`]: signed reward balance
//! - [`PlantEvent`]: immutable record of one planted tree
//! - [`LedgerSnapshot`]: balance plus ordered plant history, with the
//!   guard-and-mutate logic applied by both the store and the client cache
//! - [`Profile`]: read model combining the user card with the snapshot
//! - [`LedgerError`]: business-rule rejections (insufficient funds)

pub mod error;
pub mod plant;
pub mod points;
pub mod profile;
pub mod snapshot;

pub use error::{LedgerError, LedgerResult};
pub use plant::{PlantEvent, PlantKind};
pub use points::{Points, DEFAULT_BALANCE, TREE_COST};
pub use profile::Profile;
pub use snapshot::{LedgerSnapshot, PlantReceipt};
