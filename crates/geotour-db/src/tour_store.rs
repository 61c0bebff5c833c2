//! Storage backends behind the engine's storage traits.
//!
//! [`PostgresTourStore`] adapts the table stores to
//! [`StopCatalog`] and [`SessionStore`]. [`TourStore`] selects between it
//! and the in-memory store at startup so the engine is built over a single
//! concrete type.

use std::time::Duration;

use geotour_core::{MemoryStore, SessionStore, StopCatalog, StoreError};
use geotour_types::{Session, SessionId, Stop, StopId};

use crate::postgres::PostgresPool;
use crate::session_store::CursorStore;
use crate::stop_store::StopStore;

/// Default server-side bound on the cursor increment.
const DEFAULT_ADVANCE_TIMEOUT: Duration = Duration::from_secs(3);

/// `PostgreSQL`-backed catalog and session store.
#[derive(Debug, Clone)]
pub struct PostgresTourStore {
    pool: PostgresPool,
    advance_timeout: Duration,
}

impl PostgresTourStore {
    /// Wrap a connected pool. Migrations must already have run.
    pub const fn new(pool: PostgresPool) -> Self {
        Self {
            pool,
            advance_timeout: DEFAULT_ADVANCE_TIMEOUT,
        }
    }

    /// Set the `statement_timeout` applied to the cursor increment.
    #[must_use]
    pub const fn with_advance_timeout(mut self, timeout: Duration) -> Self {
        self.advance_timeout = timeout;
        self
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &PostgresPool {
        &self.pool
    }
}

impl StopCatalog for PostgresTourStore {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(StopStore::new(self.pool.pool()).list().await?)
    }

    async fn get_stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError> {
        Ok(StopStore::new(self.pool.pool()).get(id).await?)
    }
}

impl SessionStore for PostgresTourStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        Ok(CursorStore::new(self.pool.pool()).insert(session).await?)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        Ok(CursorStore::new(self.pool.pool()).get(id).await?)
    }

    async fn advance_cursor(
        &self,
        id: SessionId,
        expected_cursor: u32,
        expected_stop: &StopId,
    ) -> Result<bool, StoreError> {
        CursorStore::new(self.pool.pool())
            .advance(id, expected_cursor, expected_stop, self.advance_timeout)
            .await
            .map_err(|err| {
                if err.is_statement_timeout() {
                    let timeout_ms =
                        u64::try_from(self.advance_timeout.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(session_id = %id, timeout_ms, "Cursor increment timed out");
                    StoreError::Timeout {
                        operation: "advance_cursor",
                        timeout_ms,
                    }
                } else {
                    err.into()
                }
            })
    }
}

/// The storage backend chosen by `storage.backend`.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
#[derive(Debug, Clone)]
pub enum TourStore {
    /// Process-local store.
    Memory(MemoryStore),
    /// `PostgreSQL` store.
    Postgres(PostgresTourStore),
}

impl TourStore {
    /// Install `stops` as the whole catalog. Existing sessions keep their
    /// cursors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the `PostgreSQL` transaction
    /// fails.
    pub async fn replace_stops(&self, stops: Vec<Stop>) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => {
                store.replace_stops(stops).await;
                Ok(())
            }
            Self::Postgres(store) => Ok(StopStore::new(store.pool.pool())
                .replace_all(&stops)
                .await?),
        }
    }

    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl StopCatalog for TourStore {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        match self {
            Self::Memory(store) => store.list_stops().await,
            Self::Postgres(store) => store.list_stops().await,
        }
    }

    async fn get_stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError> {
        match self {
            Self::Memory(store) => store.get_stop(id).await,
            Self::Postgres(store) => store.get_stop(id).await,
        }
    }
}

impl SessionStore for TourStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.insert_session(session).await,
            Self::Postgres(store) => store.insert_session(session).await,
        }
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        match self {
            Self::Memory(store) => store.get_session(id).await,
            Self::Postgres(store) => store.get_session(id).await,
        }
    }

    async fn advance_cursor(
        &self,
        id: SessionId,
        expected_cursor: u32,
        expected_stop: &StopId,
    ) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => store.advance_cursor(id, expected_cursor, expected_stop).await,
            Self::Postgres(store) => {
                store
                    .advance_cursor(id, expected_cursor, expected_stop)
                    .await
            }
        }
    }
}
