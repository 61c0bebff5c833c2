//! Startup seeding of the stop catalog.

use geotour_core::catalog;
use geotour_core::config::CatalogConfig;
use geotour_db::TourStore;
use tracing::{info, warn};

use crate::error::BackendError;

/// Install the configured stops file into `store`.
///
/// Returns the number of stops installed, or `None` when seeding is
/// turned off, no file is configured, or the file does not exist.
///
/// # Errors
///
/// Returns [`BackendError::Catalog`] if the file exists but fails to parse
/// or validate, or [`BackendError::Storage`] if the store rejects it.
pub async fn seed_catalog(
    store: &TourStore,
    config: &CatalogConfig,
) -> Result<Option<usize>, BackendError> {
    if !config.seed_on_startup {
        info!("Catalog seeding disabled, keeping stored stops");
        return Ok(None);
    }
    let Some(path) = config.stops_file.as_deref() else {
        info!("No stops file configured, keeping stored stops");
        return Ok(None);
    };
    if !path.exists() {
        warn!(path = %path.display(), "Stops file not found, keeping stored stops");
        return Ok(None);
    }

    let stops = catalog::load_stops_file(path)?;
    let count = stops.len();
    store.replace_stops(stops).await?;
    info!(count, backend = store.name(), "Stop catalog seeded");
    Ok(Some(count))
}
