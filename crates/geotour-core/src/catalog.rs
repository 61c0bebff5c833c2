//! Stop catalog loading and validation.
//!
//! The catalog is authored as a YAML stops file and installed into a
//! storage backend by the seeding path at startup. During a tour it is
//! read-only. Tour order is the catalog order: ascending `sequence`, then
//! ascending `id`, so two stops sharing a sequence number still have a
//! stable relative order.
//!
//! ```yaml
//! stops:
//!   - id: main-gate
//!     sequence: 1
//!     title: Main Gate
//!     story: The iconic gateway to campus.
//!     overlay_image: /overlays/main-gate.png
//!     lat: 25.5925
//!     lng: 85.1368
//!     radius_meters: 40
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use geotour_types::{Stop, StopId};
use serde::Deserialize;

/// Errors that can occur when loading or validating a stop catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the stops file from disk.
    #[error("failed to read stops file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the stops file as YAML.
    #[error("failed to parse stops YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// A stop has an empty identifier.
    #[error("stop at position {position} has an empty id")]
    EmptyId {
        /// Zero-based position in the file.
        position: usize,
    },

    /// Two stops share the same identifier.
    #[error("duplicate stop id: {0}")]
    DuplicateId(StopId),

    /// A stop's coordinates are not finite WGS84 degrees.
    #[error("stop {id} has invalid coordinates ({lat}, {lng})")]
    InvalidLocation {
        /// The offending stop.
        id: StopId,
        /// Latitude as given.
        lat: f64,
        /// Longitude as given.
        lng: f64,
    },

    /// A stop's trigger radius is not a positive finite number.
    #[error("stop {id} has invalid trigger radius {radius_meters}")]
    InvalidRadius {
        /// The offending stop.
        id: StopId,
        /// Radius as given.
        radius_meters: f64,
    },
}

/// On-disk layout of a stops file.
#[derive(Debug, Deserialize)]
struct StopsFile {
    #[serde(default)]
    stops: Vec<Stop>,
}

/// Parse and validate a stops document, returning stops in catalog order.
///
/// # Errors
///
/// Returns [`CatalogError::Yaml`] if the document is malformed, or a
/// validation variant if any stop is unusable.
pub fn parse_stops(yaml: &str) -> Result<Vec<Stop>, CatalogError> {
    let file: StopsFile = serde_yml::from_str(yaml)?;
    validate(&file.stops)?;
    Ok(into_catalog_order(file.stops))
}

/// Read, parse, and validate a stops file.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
/// same errors as [`parse_stops`].
pub fn load_stops_file(path: &Path) -> Result<Vec<Stop>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stops = parse_stops(&contents)?;
    tracing::info!(path = %path.display(), count = stops.len(), "Loaded stops file");
    Ok(stops)
}

/// Check that every stop is usable by the progression engine.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate(stops: &[Stop]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for (position, stop) in stops.iter().enumerate() {
        if stop.id.as_str().trim().is_empty() {
            return Err(CatalogError::EmptyId { position });
        }
        if !seen.insert(stop.id.clone()) {
            return Err(CatalogError::DuplicateId(stop.id.clone()));
        }
        if !stop.location().is_valid() {
            return Err(CatalogError::InvalidLocation {
                id: stop.id.clone(),
                lat: stop.lat,
                lng: stop.lng,
            });
        }
        if !stop.radius_meters.is_finite() || stop.radius_meters <= 0.0 {
            return Err(CatalogError::InvalidRadius {
                id: stop.id.clone(),
                radius_meters: stop.radius_meters,
            });
        }
    }
    Ok(())
}

/// Sort stops into tour order.
pub fn into_catalog_order(mut stops: Vec<Stop>) -> Vec<Stop> {
    stops.sort_by(Stop::catalog_cmp);
    stops
}
