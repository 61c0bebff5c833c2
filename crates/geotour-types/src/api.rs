//! Response payloads of the tour HTTP surface.
//!
//! Field names follow the web client's expectations (`sessionId`,
//! `nextStopTitle`, ...), which is why these types carry explicit serde
//! renames instead of the snake-case used by the entity structs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SessionId;
use crate::structs::Stop;

/// Body of `POST /api/session/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionStarted {
    /// Identifier the client sends with every location update.
    pub session_id: SessionId,
}

/// Body of `GET /api/session/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionStatus {
    /// Session identifier.
    pub session_id: SessionId,
    /// Index of the current target stop.
    pub cursor: u32,
    /// Number of stops in the catalog right now.
    pub total_stops: u32,
    /// Whether the cursor has reached the end of the catalog.
    pub complete: bool,
}

/// Body of `POST /api/location/update`.
///
/// Exactly one of three shapes is produced:
///
/// - `{ "done": true }` once the tour is complete
/// - `{ "triggered": true, "stop": {...} }` when the fix entered the
///   current target's geofence
/// - `{ "triggered": false, "distance": 812, "nextStopTitle": "..." }`
///   otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LocationUpdateResponse {
    /// Present and `true` when the session has no stops left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub done: Option<bool>,
    /// Whether this fix triggered the current target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub triggered: Option<bool>,
    /// The stop that was just reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub stop: Option<Stop>,
    /// Rounded distance in meters to the current target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub distance: Option<u32>,
    /// Title of the current target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub next_stop_title: Option<String>,
}

impl LocationUpdateResponse {
    /// The tour is complete.
    pub const fn done() -> Self {
        Self {
            done: Some(true),
            triggered: None,
            stop: None,
            distance: None,
            next_stop_title: None,
        }
    }

    /// The fix triggered `stop`.
    pub const fn triggered(stop: Stop) -> Self {
        Self {
            done: None,
            triggered: Some(true),
            stop: Some(stop),
            distance: None,
            next_stop_title: None,
        }
    }

    /// The fix is `distance` meters away from the target titled `title`.
    pub const fn approaching(distance: u32, title: String) -> Self {
        Self {
            done: None,
            triggered: Some(false),
            stop: None,
            distance: Some(distance),
            next_stop_title: Some(title),
        }
    }
}
