//! Shared application state for the tour API server.

use geotour_core::ProgressionEngine;
use geotour_db::TourStore;

/// State shared by every handler.
///
/// Holds no per-session data of its own: sessions live in the storage
/// backend behind the engine.
#[derive(Debug)]
pub struct AppState {
    /// The progression engine over the configured backend.
    pub engine: ProgressionEngine<TourStore>,
}

impl AppState {
    /// Wrap an engine for sharing across handlers.
    pub const fn new(engine: ProgressionEngine<TourStore>) -> Self {
        Self { engine }
    }
}
