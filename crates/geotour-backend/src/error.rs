//! Error types for the backend binary.
//!
//! [`BackendError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the backend binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geotour_core::ConfigError,
    },

    /// The stops file could not be loaded.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: geotour_core::catalog::CatalogError,
    },

    /// Connecting to or migrating the database failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: geotour_db::DbError,
    },

    /// Installing the catalog into the store failed.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: geotour_core::StoreError,
    },

    /// The notification sink could not be built.
    #[error("notifier error: {source}")]
    Notifier {
        /// The underlying notifier error.
        #[from]
        source: geotour_notify::NotifyError,
    },

    /// The HTTP server failed to start or crashed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: geotour_server::ServerError,
    },
}
