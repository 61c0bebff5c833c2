//! `PostgreSQL` storage backend for the Geotour campus tour.
//!
//! Holds the stop catalog and per-session cursors. The engine never sees
//! this crate's types directly: [`PostgresTourStore`] implements the
//! storage traits from `geotour-core`, and [`TourStore`] picks between it
//! and the in-memory store at startup.
//!
//! ```text
//! ProgressionEngine<TourStore>
//!     |
//!     +-- TourStore::Memory   --> geotour_core::MemoryStore
//!     +-- TourStore::Postgres --> PostgresTourStore
//!             |-- StopStore    (stops table, ordered by sequence, id)
//!             +-- CursorStore  (sessions table, compare-and-increment)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool and migrations
//! - [`stop_store`] -- Catalog queries and transactional replacement
//! - [`session_store`] -- Session rows and the conditional cursor update
//! - [`tour_store`] -- Storage trait implementations and backend selection
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod session_store;
pub mod stop_store;
pub mod tour_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use session_store::{CursorStore, SessionRow};
pub use stop_store::{StopRow, StopStore};
pub use tour_store::{PostgresTourStore, TourStore};
