//! HTTP wire contract for the EcoTrack ledger.
//!
//! Defines the endpoint paths and JSON bodies exchanged between the ledger
//! server and the ledger client. Both sides depend on this crate so the
//! shapes cannot drift apart.

pub mod endpoint;
pub mod message;

pub use endpoint::{endpoints, HealthResponse};
pub use message::{
    AddPointsRequest, ErrorResponse, PlantTreeResponse, PointsResponse, NOT_ENOUGH_POINTS,
    POINTS_OVERFLOW,
};
