//! Ledger client for EcoTrack.
//!
//! UI code calls [`LedgerClient`] to add points and plant trees. The client
//! tries the authoritative server first and mirrors its answer into a local
//! cache; when the server cannot be reached it applies the same operation to
//! the cache instead. The caller sees the same result shape either way.
//!
//! # Layers
//!
//! - [`KeyValueStore`] -- injectable string storage ([`MemoryKeyValueStore`],
//!   [`FileKeyValueStore`])
//! - [`LocalCache`] -- the cached balance and plant history on top of it
//! - [`LedgerBackend`] -- what the client acts against, implemented by
//!   [`RemoteBackend`] (HTTP) and [`CacheBackend`] (local)
//! - [`LedgerClient`] -- the try-remote-else-local policy

pub mod backend;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod kv;
pub mod local;
pub mod remote;

pub use backend::{LedgerBackend, PlantOutcome};
pub use cache::{LocalCache, PLANTS_KEY, POINTS_KEY};
pub use client::{AddPointsResult, LedgerClient, PlantTreeResult};
pub use config::ClientConfig;
pub use error::{BackendError, BackendResult, CacheError, CacheResult, ClientError, ClientResult};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use local::CacheBackend;
pub use remote::RemoteBackend;

pub use eco_types::{LedgerSnapshot, PlantEvent, Points};
