//! Storage seams for the stop catalog and session cursors.
//!
//! The [`StopCatalog`] and [`SessionStore`] traits are what the
//! [`ProgressionEngine`](crate::engine::ProgressionEngine) is generic over.
//! Two backends implement them: [`MemoryStore`] here (tests, demos, and
//! single-node deployments) and the `PostgreSQL` store in `geotour-db`.
//!
//! The only mutating session operation is
//! [`SessionStore::advance_cursor`], a compare-and-increment: it moves the
//! cursor from `expected_cursor` to `expected_cursor + 1` only if the
//! session still sits at `expected_cursor` and that position of the
//! catalog is still `expected_stop`. Concurrent duplicate reports for the
//! same stop therefore advance a session at most once.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use geotour_types::{Session, SessionId, Stop, StopId};
use tokio::sync::RwLock;

use crate::catalog;

/// Errors surfaced by a storage backend.
///
/// Both variants are transient from the caller's point of view: the
/// request may be retried and no partial mutation is observable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The operation did not complete within the configured bound.
    #[error("storage operation `{operation}` timed out after {timeout_ms}ms")]
    Timeout {
        /// Name of the operation that timed out.
        operation: &'static str,
        /// The bound that was exceeded.
        timeout_ms: u64,
    },
}

/// Read access to the ordered stop catalog.
pub trait StopCatalog: Send + Sync {
    /// All stops in tour order (ascending `sequence`, then `id`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_stops(&self) -> impl Future<Output = Result<Vec<Stop>, StoreError>> + Send;

    /// A single stop by identifier, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get_stop(&self, id: &StopId) -> impl Future<Output = Result<Option<Stop>, StoreError>> + Send;
}

/// Persistence of per-session cursors.
pub trait SessionStore: Send + Sync {
    /// Persist a freshly started session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn insert_session(&self, session: &Session) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Load a session, or `None` if the identifier is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get_session(
        &self,
        id: SessionId,
    ) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Atomically move the cursor from `expected_cursor` to the next stop.
    ///
    /// Returns `true` if this call performed the increment, `false` if the
    /// session is unknown, has already moved, or the catalog position no
    /// longer holds `expected_stop`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails. On error the cursor is
    /// unchanged.
    ///
    /// Callers never cancel this future, so implementations must bound
    /// their own execution and either commit or roll back before
    /// returning. A backend that gives up reports
    /// [`StoreError::Timeout`] only for an increment that did not commit.
    fn advance_cursor(
        &self,
        id: SessionId,
        expected_cursor: u32,
        expected_stop: &StopId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    /// Stops in catalog order.
    stops: Vec<Stop>,
    sessions: BTreeMap<SessionId, Session>,
}

/// In-memory catalog and session store.
///
/// Catalog and sessions live behind one [`RwLock`] so the
/// compare-and-increment sees a consistent catalog. Cloning is cheap and
/// shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store (no stops, no sessions).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `stops`, sorted into catalog order.
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        let state = MemoryState {
            stops: catalog::into_catalog_order(stops),
            sessions: BTreeMap::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Replace the whole catalog. Existing sessions keep their cursors.
    pub async fn replace_stops(&self, stops: Vec<Stop>) {
        let ordered = catalog::into_catalog_order(stops);
        let count = ordered.len();
        self.inner.write().await.stops = ordered;
        tracing::info!(count, "Replaced in-memory stop catalog");
    }

    /// Number of sessions ever started.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}

impl StopCatalog for MemoryStore {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.inner.read().await.stops.clone())
    }

    async fn get_stop(&self, id: &StopId) -> Result<Option<Stop>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.stops.iter().find(|s| &s.id == id).cloned())
    }
}

impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.sessions.contains_key(&session.session_id) {
            return Err(StoreError::Backend(format!(
                "session {} already exists",
                session.session_id
            )));
        }
        state.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn advance_cursor(
        &self,
        id: SessionId,
        expected_cursor: u32,
        expected_stop: &StopId,
    ) -> Result<bool, StoreError> {
        let mut guard = self.inner.write().await;
        let MemoryState { stops, sessions } = &mut *guard;

        let Some(session) = sessions.get_mut(&id) else {
            return Ok(false);
        };
        if session.cursor != expected_cursor {
            return Ok(false);
        }
        let index = usize::try_from(expected_cursor).unwrap_or(usize::MAX);
        if stops.get(index).map(|s| &s.id) != Some(expected_stop) {
            return Ok(false);
        }
        let Some(next) = expected_cursor.checked_add(1) else {
            return Err(StoreError::Backend(String::from("cursor overflow")));
        };

        session.cursor = next;
        session.updated_at = Utc::now();
        Ok(true)
    }
}
