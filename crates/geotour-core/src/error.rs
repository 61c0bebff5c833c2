//! Error type for the progression engine.
//!
//! [`TourError`] is what every [`ProgressionEngine`](crate::ProgressionEngine)
//! operation returns. The HTTP layer maps each variant to a status code;
//! storage failures stay transient and never leave a half-applied trigger
//! behind.

use geotour_types::{SessionId, StopId};

use crate::store::StoreError;

/// Errors that can occur while serving tour operations.
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    /// The session identifier is unknown.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The stop identifier is unknown.
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// A GPS fix is not a finite WGS84 position.
    #[error("invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates {
        /// Latitude as reported.
        lat: f64,
        /// Longitude as reported.
        lng: f64,
    },

    /// The storage backend failed or timed out.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: StoreError,
    },
}
