//! Hand-off of trigger events to the device-effect collaborator.
//!
//! The engine never calls the collaborator directly. Each committed
//! trigger is pushed onto a bounded [`mpsc`] queue with `try_send`, so a
//! slow or unavailable device never delays or fails a location update. A
//! background worker (see `geotour-notify`) drains the queue.

use geotour_types::TriggerEvent;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default number of trigger events buffered before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Sending half of the trigger event queue.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: Option<mpsc::Sender<TriggerEvent>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher and the receiver its worker should drain.
    ///
    /// A capacity of zero is raised to one.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TriggerEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// A dispatcher that discards every event.
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue `event` without waiting.
    ///
    /// Returns `true` if the event was queued. A full or closed queue drops
    /// the event and logs a warning; the caller is never affected.
    pub fn dispatch(&self, event: TriggerEvent) -> bool {
        let Some(tx) = &self.tx else {
            tracing::debug!(
                session_id = %event.session_id,
                stop_id = %event.stop.id,
                "Notifications disabled, trigger not forwarded"
            );
            return false;
        };

        match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    session_id = %event.session_id,
                    stop_id = %event.stop.id,
                    "Notification queue full, dropping trigger event"
                );
                false
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(
                    session_id = %event.session_id,
                    stop_id = %event.stop.id,
                    "Notification worker gone, dropping trigger event"
                );
                false
            }
        }
    }
}
