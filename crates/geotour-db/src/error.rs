//! Error types for the `PostgreSQL` storage backend.
//!
//! [`DbError`] wraps the underlying [`sqlx`] errors. At the storage seam it
//! is flattened into [`StoreError::Backend`] so the engine stays
//! independent of the database crate. A server-side statement timeout on
//! the cursor increment becomes [`StoreError::Timeout`] instead.

use geotour_core::StoreError;

/// Errors that can occur in the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row cannot be represented in the domain model.
    #[error("invalid row in {table}: {reason}")]
    InvalidRow {
        /// Table the row came from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

impl DbError {
    /// Whether the server cancelled the statement for exceeding
    /// `statement_timeout`. The enclosing transaction has been rolled back.
    pub fn is_statement_timeout(&self) -> bool {
        match self {
            Self::Postgres(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some(QUERY_CANCELED)
            }
            _ => false,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_statement_timeouts() {
        assert!(!DbError::Postgres(sqlx::Error::PoolTimedOut).is_statement_timeout());
        assert!(!DbError::Config(String::from("bad url")).is_statement_timeout());
    }

    #[test]
    fn flattens_into_backend_error() {
        let err = StoreError::from(DbError::Config(String::from("bad url")));
        assert!(matches!(err, StoreError::Backend(ref msg) if msg.contains("bad url")));
    }
}
