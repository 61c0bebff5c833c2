//! Axum router construction for the tour API.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled for
//! the mobile web client and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the tour server.
///
/// The router includes:
/// - `GET /` -- liveness banner
/// - `POST /api/session/start` -- start a session
/// - `GET /api/session/{id}` -- session progress
/// - `POST /api/location/update` -- report a GPS fix
/// - `GET /api/stops` -- ordered stop summaries
/// - `GET /api/stops/{id}` -- single stop
///
/// CORS allows any origin: the client is served from a different host
/// than the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        // Sessions
        .route("/api/session/start", post(handlers::start_session))
        .route("/api/session/{id}", get(handlers::session_status))
        .route("/api/location/update", post(handlers::location_update))
        // Catalog
        .route("/api/stops", get(handlers::list_stops))
        .route("/api/stops/{id}", get(handlers::get_stop))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
