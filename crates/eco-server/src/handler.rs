use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use eco_protocol::{AddPointsRequest, HealthResponse, PlantTreeResponse, PointsResponse};
use eco_store::{LedgerStore, StoreError, StoreResult};
use eco_types::{PlantEvent, Profile};

use crate::config::ProfileConfig;
use crate::error::{ServerError, ServerResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub profile: ProfileConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, profile: ProfileConfig) -> Self {
        Self { store, profile }
    }

    /// Run a store mutation off the async runtime; file-backed stores fsync.
    async fn mutate<T, F>(&self, op: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn LedgerStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let out = tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))??;
        Ok(out)
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `POST /api/addPoints`. An empty body credits zero.
pub async fn add_points_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ServerResult<Json<PointsResponse>> {
    let request = parse_add_points(&body)?;
    let delta = request.points;
    let points = state.mutate(move |store| store.add_points(delta)).await?;
    tracing::info!(delta, points, "points added");
    Ok(Json(PointsResponse { points }))
}

/// `POST /api/plantTree`.
pub async fn plant_tree_handler(
    State(state): State<AppState>,
) -> ServerResult<Json<PlantTreeResponse>> {
    let receipt = state
        .mutate(|store| store.plant_tree())
        .await
        .inspect_err(|e| {
            if let ServerError::Store(StoreError::Ledger(rejection)) = e {
                tracing::info!(balance = rejection.balance(), "plant rejected");
            }
        })?;
    tracing::info!(points = receipt.balance, "tree planted");
    Ok(Json(receipt.into()))
}

/// `GET /api/getProfile`.
pub async fn profile_handler(State(state): State<AppState>) -> Json<Profile> {
    let snapshot = state.store.snapshot();
    Json(Profile::new(
        state.profile.name.clone(),
        state.profile.email.clone(),
        snapshot,
    ))
}

/// `GET /api/getPlants`.
pub async fn plants_handler(State(state): State<AppState>) -> Json<Vec<PlantEvent>> {
    Json(state.store.plant_events())
}

fn parse_add_points(body: &[u8]) -> ServerResult<AddPointsRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AddPointsRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ServerError::InvalidBody(e.to_string()))
}
