//! Session progression engine.
//!
//! [`ProgressionEngine`] ties the pieces together for each request: it
//! loads the session and catalog, runs [`progression::evaluate`] against
//! the current target, persists a trigger with the store's
//! compare-and-increment, and only after that commit hands a
//! [`TriggerEvent`] to the notification queue.
//!
//! Every read and the session insert are wrapped in a timeout so a stuck
//! backend surfaces as [`StoreError::Timeout`] instead of hanging the
//! request. The compare-and-increment is the exception: a dropped future
//! may already have committed, so it is never cancelled here and backends
//! bound it themselves (see [`SessionStore::advance_cursor`]).

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use geotour_types::{
    Coordinates, LocationUpdateResponse, Session, SessionId, Stop, StopId, TriggerEvent,
};
use tracing::{debug, info};

use crate::error::TourError;
use crate::notify::NotificationDispatcher;
use crate::progression::{self, Evaluation};
use crate::store::{SessionStore, StopCatalog, StoreError};

/// Default bound on a single storage operation.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// What a location report did to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The session has no stops left. Nothing changed.
    Complete,
    /// The fix entered the target's geofence and the cursor advanced.
    Triggered(Stop),
    /// The fix is outside the target's geofence. Nothing changed.
    Approaching {
        /// Rounded distance to the target in meters.
        distance_m: u32,
        /// Title of the target stop.
        next_stop_title: String,
    },
}

impl From<Progress> for LocationUpdateResponse {
    fn from(progress: Progress) -> Self {
        match progress {
            Progress::Complete => Self::done(),
            Progress::Triggered(stop) => Self::triggered(stop),
            Progress::Approaching {
                distance_m,
                next_stop_title,
            } => Self::approaching(distance_m, next_stop_title),
        }
    }
}

/// Drives sessions through the stop catalog.
///
/// Generic over the storage backend so tests run against
/// [`MemoryStore`](crate::store::MemoryStore) and production against
/// `PostgreSQL`. Sessions share nothing but the read-only catalog, so
/// requests for different sessions proceed fully in parallel.
#[derive(Debug)]
pub struct ProgressionEngine<S> {
    store: S,
    notifications: NotificationDispatcher,
    storage_timeout: Duration,
}

impl<S> ProgressionEngine<S>
where
    S: StopCatalog + SessionStore,
{
    /// Create an engine over `store` that forwards triggers to `notifications`.
    pub const fn new(store: S, notifications: NotificationDispatcher) -> Self {
        Self {
            store,
            notifications,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Set the bound applied to each storage operation.
    #[must_use]
    pub const fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// The storage backend.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Start a new session positioned at the first stop.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::Storage`] if the session cannot be persisted.
    pub async fn create_session(&self) -> Result<Session, TourError> {
        let session = Session::start();
        self.bounded("insert_session", self.store.insert_session(&session))
            .await?;
        info!(session_id = %session.session_id, "Session started");
        Ok(session)
    }

    /// Load a session together with the current catalog length.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::SessionNotFound`] if the session is unknown, or
    /// [`TourError::Storage`] on backend failure.
    pub async fn session_status(&self, id: SessionId) -> Result<(Session, usize), TourError> {
        let session = self.load_session(id).await?;
        let total = self.bounded("list_stops", self.store.list_stops()).await?.len();
        Ok((session, total))
    }

    /// All stops in tour order.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::Storage`] on backend failure.
    pub async fn list_stops(&self) -> Result<Vec<Stop>, TourError> {
        self.bounded("list_stops", self.store.list_stops()).await
    }

    /// A single stop by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::StopNotFound`] if no stop has that identifier,
    /// or [`TourError::Storage`] on backend failure.
    pub async fn get_stop(&self, id: &StopId) -> Result<Stop, TourError> {
        self.bounded("get_stop", self.store.get_stop(id))
            .await?
            .ok_or_else(|| TourError::StopNotFound(id.clone()))
    }

    /// Apply one GPS fix to a session.
    ///
    /// Only the stop under the session's cursor is evaluated. A fix inside
    /// its geofence advances the cursor by exactly one and queues a
    /// notification; the notification is queued only after the increment
    /// has been committed. If a concurrent report for the same session won
    /// the increment, this call reports the session's fresh state without
    /// triggering.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::InvalidCoordinates`] for a non-finite or
    /// out-of-range fix, [`TourError::SessionNotFound`] for an unknown
    /// session, or [`TourError::Storage`] on backend failure. No error path
    /// changes the cursor.
    pub async fn report_location(
        &self,
        id: SessionId,
        fix: Coordinates,
    ) -> Result<Progress, TourError> {
        if !fix.is_valid() {
            return Err(TourError::InvalidCoordinates {
                lat: fix.lat,
                lng: fix.lng,
            });
        }

        let session = self.load_session(id).await?;
        let catalog = self.bounded("list_stops", self.store.list_stops()).await?;

        let (stop, distance_m) = match progression::evaluate(&catalog, session.cursor, fix) {
            Evaluation::Complete => {
                debug!(session_id = %id, cursor = session.cursor, "Report on complete session");
                return Ok(Progress::Complete);
            }
            Evaluation::Outside { stop, distance_m } => {
                return Ok(approaching(stop, distance_m));
            }
            Evaluation::Inside { stop, distance_m } => (stop, distance_m),
        };

        // Not wrapped in `bounded`: once this future is polled the increment
        // may commit at any point, and the trigger must be reported if it did.
        let advanced = self
            .store
            .advance_cursor(id, session.cursor, &stop.id)
            .await?;

        if !advanced {
            debug!(
                session_id = %id,
                cursor = session.cursor,
                stop_id = %stop.id,
                "Concurrent report already advanced session"
            );
            return self.observe(id, fix).await;
        }

        info!(
            session_id = %id,
            stop_id = %stop.id,
            cursor = session.cursor,
            distance_m,
            "Stop triggered"
        );

        self.notifications.dispatch(TriggerEvent {
            session_id: id,
            stop: stop.clone(),
            triggered_at: Utc::now(),
        });

        Ok(Progress::Triggered(stop.clone()))
    }

    /// Report where a session stands relative to `fix` without mutating it.
    ///
    /// After a lost race the fix may already lie inside the new target's
    /// geofence; it is still reported as `Approaching`, and the client's
    /// next fix triggers that stop.
    async fn observe(&self, id: SessionId, fix: Coordinates) -> Result<Progress, TourError> {
        let session = self.load_session(id).await?;
        let catalog = self.bounded("list_stops", self.store.list_stops()).await?;
        Ok(match progression::evaluate(&catalog, session.cursor, fix) {
            Evaluation::Complete => Progress::Complete,
            Evaluation::Inside { stop, distance_m } | Evaluation::Outside { stop, distance_m } => {
                approaching(stop, distance_m)
            }
        })
    }

    async fn load_session(&self, id: SessionId) -> Result<Session, TourError> {
        self.bounded("get_session", self.store.get_session(id))
            .await?
            .ok_or(TourError::SessionNotFound(id))
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, TourError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.storage_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => {
                let timeout_ms = u64::try_from(self.storage_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, timeout_ms, "Storage operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    timeout_ms,
                }
                .into())
            }
        }
    }
}

fn approaching(stop: &Stop, distance_m: f64) -> Progress {
    Progress::Approaching {
        distance_m: progression::round_distance(distance_m),
        next_stop_title: stop.title.clone(),
    }
}
