//! REST API endpoint handlers for the tour server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Plain-text liveness banner |
//! | `POST` | `/api/session/start` | Start a session at the first stop |
//! | `GET` | `/api/session/{id}` | Cursor and completion of a session |
//! | `POST` | `/api/location/update` | Report a GPS fix |
//! | `GET` | `/api/stops` | Ordered stop summaries for the map |
//! | `GET` | `/api/stops/{id}` | Full stop record |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use geotour_types::{
    Coordinates, LocationUpdateResponse, SessionId, SessionStarted, SessionStatus, Stop, StopId,
    StopSummary, TourState,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/location/update`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdateRequest {
    /// Session the fix belongs to.
    #[validate(length(min = 1, message = "sessionId must not be empty"))]
    pub session_id: String,
    /// Latitude in degrees.
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be within [-90, 90]"))]
    pub lat: f64,
    /// Longitude in degrees.
    #[validate(range(min = -180.0, max = 180.0, message = "lng must be within [-180, 180]"))]
    pub lng: f64,
}

// ---------------------------------------------------------------------------
// GET / -- liveness banner
// ---------------------------------------------------------------------------

/// Plain-text banner confirming the server is up.
pub async fn index() -> &'static str {
    "Geotour backend is running"
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Start a new session positioned at the first stop.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionStarted>, ApiError> {
    let session = state.engine.create_session().await?;
    Ok(Json(SessionStarted {
        session_id: session.session_id,
    }))
}

/// Report a session's cursor against the current catalog.
pub async fn session_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ApiError> {
    let id = parse_session_id(&id)?;
    let (session, total) = state.engine.session_status(id).await?;

    Ok(Json(SessionStatus {
        session_id: session.session_id,
        cursor: session.cursor,
        total_stops: u32::try_from(total).unwrap_or(u32::MAX),
        complete: session.state(total) == TourState::Complete,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/location/update
// ---------------------------------------------------------------------------

/// Apply one GPS fix to a session.
///
/// Responds with `{done}` once the tour is complete, `{triggered, stop}`
/// when the fix entered the current stop's geofence, and otherwise
/// `{triggered: false, distance, nextStopTitle}`.
pub async fn location_update(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LocationUpdateRequest>, JsonRejection>,
) -> Result<Json<LocationUpdateResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let id = parse_session_id(&request.session_id)?;
    let fix = Coordinates::new(request.lat, request.lng);

    let progress = state.engine.report_location(id, fix).await?;
    tracing::debug!(session_id = %id, ?progress, "Location update processed");

    Ok(Json(LocationUpdateResponse::from(progress)))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// List stops in tour order for the map view.
pub async fn list_stops(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StopSummary>>, ApiError> {
    let stops = state.engine.list_stops().await?;
    Ok(Json(stops.iter().map(Stop::summary).collect()))
}

/// Return the full record of a single stop.
pub async fn get_stop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stop>, ApiError> {
    let stop = state.engine.get_stop(&StopId::from(id)).await?;
    Ok(Json(stop))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a session identifier, rejecting anything that is not a UUID.
fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(raw)
        .map(SessionId::from)
        .map_err(|_invalid| ApiError::Validation(format!("invalid sessionId: {raw}")))
}
