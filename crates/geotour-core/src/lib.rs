//! Core tour logic for the Geotour campus tour backend.
//!
//! A visitor's session holds a single cursor into an ordered catalog of
//! stops. Each GPS fix is compared against the stop under the cursor only;
//! entering that stop's geofence advances the cursor by exactly one and
//! queues a notification for the device-effect collaborator.
//!
//! # Modules
//!
//! - [`geo`] -- Haversine great-circle distance
//! - [`catalog`] -- Stops file loading, validation, and catalog ordering
//! - [`store`] -- Storage traits and the in-memory backend
//! - [`progression`] -- Pure trigger evaluation against the current target
//! - [`engine`] -- Orchestration of sessions, storage, and notifications
//! - [`notify`] -- Bounded queue feeding the device-effect collaborator
//! - [`config`] -- Typed YAML configuration
//! - [`error`] -- Engine-level error type

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod notify;
pub mod progression;
pub mod store;

// Re-export primary types for convenience.
pub use config::{ConfigError, TourConfig};
pub use engine::{Progress, ProgressionEngine};
pub use error::TourError;
pub use notify::NotificationDispatcher;
pub use store::{MemoryStore, SessionStore, StopCatalog, StoreError};
