//! Tour API server for the Geotour campus tour.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Session endpoints** for starting a tour and reading its progress
//! - **Location updates** that drive the progression engine
//! - **Catalog endpoints** listing stops for the map view
//! - **Liveness banner** (`GET /`)
//!
//! # Architecture
//!
//! Handlers are thin: they validate the request, call the shared
//! [`ProgressionEngine`](geotour_core::ProgressionEngine) held in
//! [`AppState`], and map [`TourError`](geotour_core::TourError) onto HTTP
//! status codes through [`ApiError`]. All tour state lives in the storage
//! backend, so any number of server instances can share one database.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
