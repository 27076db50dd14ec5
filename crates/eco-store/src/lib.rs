//! Authoritative ledger storage for EcoTrack.
//!
//! The store owns the durable [`LedgerSnapshot`]: the user's point balance
//! and the ordered history of planted trees.
//!
//! # Storage Backends
//!
//! All backends implement the [`LedgerStore`] trait:
//!
//! - [`InMemoryLedgerStore`] -- mutex-guarded snapshot for tests and embedding
//! - [`FileLedgerStore`] -- one JSON snapshot file, replaced atomically
//!
//! # Design Rules
//!
//! 1. Every mutation runs inside a single critical section: read, check,
//!    mutate, persist. Mutations never interleave.
//! 2. Mutations are applied to a copy. The live snapshot is swapped only after
//!    the copy is durably persisted, so a failed write leaves the prior state
//!    intact both on disk and in memory.
//! 3. Reads are served from memory and never fail.
//! 4. Business rejections (insufficient funds, balance overflow) surface as
//!    [`StoreError::Ledger`] and never mutate state.
//!
//! [`LedgerSnapshot`]: eco_types::LedgerSnapshot

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileLedgerStore;
pub use memory::InMemoryLedgerStore;
pub use traits::LedgerStore;
