//! Core entity structs for the tour catalog and visitor sessions.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{SessionId, StopId};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, `-90..=90`.
    pub lat: f64,
    /// Longitude in degrees, `-180..=180`.
    pub lng: f64,
}

impl Coordinates {
    /// Build a coordinate pair.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and within their WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

// ---------------------------------------------------------------------------
// Stop
// ---------------------------------------------------------------------------

/// One narratable campus location with a circular geofence.
///
/// The catalog is ordered by `(sequence, id)` and that order is the tour
/// order. Field names match the `stops` table and the client wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stop {
    /// Stable identifier referenced by clients and overlay routes.
    pub id: StopId,
    /// Tour position. Lower values are visited first.
    pub sequence: i32,
    /// Display name.
    pub title: String,
    /// Long-form narrative revealed when the stop triggers.
    pub story: String,
    /// Path of the overlay image shown over the camera feed.
    #[serde(default)]
    pub overlay_image: Option<String>,
    /// Path of the narration audio clip.
    #[serde(default)]
    pub audio_src: Option<String>,
    /// Latitude of the stop center in degrees.
    pub lat: f64,
    /// Longitude of the stop center in degrees.
    pub lng: f64,
    /// Trigger radius in meters. Always positive.
    pub radius_meters: f64,
}

impl Stop {
    /// The stop center as a coordinate pair.
    pub const fn location(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Catalog ordering: ascending `sequence`, then ascending `id`.
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        self.sequence
            .cmp(&other.sequence)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Projection used by the list view (story and media omitted).
    pub fn summary(&self) -> StopSummary {
        StopSummary {
            id: self.id.clone(),
            sequence: self.sequence,
            title: self.title.clone(),
            lat: self.lat,
            lng: self.lng,
            radius_meters: self.radius_meters,
        }
    }
}

/// List-view projection of a [`Stop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StopSummary {
    /// Stop identifier.
    pub id: StopId,
    /// Tour position.
    pub sequence: i32,
    /// Display name.
    pub title: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Trigger radius in meters.
    pub radius_meters: f64,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Progress state of a session relative to a catalog of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourState {
    /// The cursor still points at a stop.
    InProgress,
    /// The cursor is at or past the end of the catalog. Terminal.
    Complete,
}

/// One visitor's progress through the stop catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub session_id: SessionId,
    /// Index of the current target stop in catalog order.
    pub cursor: u32,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
    /// When the cursor last moved (or creation time).
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session positioned at the first stop.
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            cursor: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The cursor as a catalog index.
    pub fn index(&self) -> usize {
        usize::try_from(self.cursor).unwrap_or(usize::MAX)
    }

    /// State of this session against a catalog of `total_stops` entries.
    ///
    /// A cursor at or beyond the catalog length is complete regardless of
    /// how the catalog got that size.
    pub fn state(&self, total_stops: usize) -> TourState {
        if self.index() >= total_stops {
            TourState::Complete
        } else {
            TourState::InProgress
        }
    }
}

// ---------------------------------------------------------------------------
// Trigger event
// ---------------------------------------------------------------------------

/// Emitted once per stop per session when a GPS fix enters the current
/// target's geofence. Consumed by the device-notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Session that advanced.
    pub session_id: SessionId,
    /// The stop that was reached.
    pub stop: Stop,
    /// When the cursor increment was committed.
    pub triggered_at: DateTime<Utc>,
}
