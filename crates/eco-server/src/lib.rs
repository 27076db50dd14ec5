//! HTTP server for the EcoTrack ledger.
//!
//! Exposes the authoritative [`LedgerStore`](eco_store::LedgerStore) over a
//! small JSON API: add points, plant a tree, read the profile and the plant
//! history. All endpoints allow cross-origin requests.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ProfileConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::EcoServer;
