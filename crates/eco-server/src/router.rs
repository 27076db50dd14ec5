use axum::routing::{get, post};
use axum::Router;
use eco_protocol::endpoints;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all ledger endpoints.
///
/// Mutating endpoints accept `POST` only; axum answers other methods with
/// `405 Method Not Allowed`. Every response allows any origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::ADD_POINTS, post(handler::add_points_handler))
        .route(endpoints::PLANT_TREE, post(handler::plant_tree_handler))
        .route(endpoints::PROFILE, get(handler::profile_handler))
        .route(endpoints::PLANTS, get(handler::plants_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
