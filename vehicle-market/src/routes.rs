//! Route table

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    create_vehicle, delete_vehicle, get_vehicle, list_vehicles, sell_vehicle, update_vehicle,
};
use crate::health::{health, readiness};
use crate::state::AppState;

/// Prefix of the versioned vehicle API
pub const API_PREFIX: &str = "/api/v1";

/// Build the application router
///
/// Health probes live at the root; vehicle endpoints under [`API_PREFIX`].
/// Middleware is added separately by [`Server`](crate::server::Server).
pub fn router(state: AppState) -> Router {
    let vehicles = Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/{id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/vehicles/{id}/sell", post(sell_vehicle));

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .nest(API_PREFIX, vehicles)
        .with_state(state)
}
