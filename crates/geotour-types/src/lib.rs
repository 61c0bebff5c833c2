//! Shared type definitions for the Geotour campus tour backend.
//!
//! This crate is the single source of truth for all types used across the
//! Geotour workspace. Wire types flow downstream to `TypeScript` via
//! `ts-rs` for the mobile web client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for sessions and stops
//! - [`structs`] -- Core entity structs (stops, sessions, trigger events)
//! - [`api`] -- Request-independent response payloads of the HTTP surface

pub mod api;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use api::{LocationUpdateResponse, SessionStarted, SessionStatus};
pub use ids::{SessionId, StopId};
pub use structs::{Coordinates, Session, Stop, StopSummary, TourState, TriggerEvent};
