//! Background task draining the trigger event queue.

use geotour_types::TriggerEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sink::DeviceNotifier;

/// Delivery counts reported when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Events the sink accepted.
    pub delivered: u64,
    /// Events the sink failed to deliver.
    pub failed: u64,
}

/// Deliver every queued event to `notifier` until all senders are dropped.
///
/// Failures are logged and counted, never retried: a missed device effect
/// is not worth holding up later triggers.
pub async fn run_notification_worker(
    mut rx: mpsc::Receiver<TriggerEvent>,
    notifier: DeviceNotifier,
) -> WorkerStats {
    let mut stats = WorkerStats::default();
    tracing::info!(sink = notifier.name(), "Notification worker started");

    while let Some(event) = rx.recv().await {
        match notifier.notify(&event).await {
            Ok(()) => {
                stats.delivered = stats.delivered.saturating_add(1);
                tracing::debug!(
                    sink = notifier.name(),
                    session_id = %event.session_id,
                    stop_id = %event.stop.id,
                    "Notification delivered"
                );
            }
            Err(e) => {
                stats.failed = stats.failed.saturating_add(1);
                tracing::warn!(
                    sink = notifier.name(),
                    session_id = %event.session_id,
                    stop_id = %event.stop.id,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }

    tracing::info!(
        delivered = stats.delivered,
        failed = stats.failed,
        "Notification worker stopped"
    );
    stats
}

/// Spawn [`run_notification_worker`] on the current runtime.
pub fn spawn_notification_worker(
    rx: mpsc::Receiver<TriggerEvent>,
    notifier: DeviceNotifier,
) -> JoinHandle<WorkerStats> {
    tokio::spawn(run_notification_worker(rx, notifier))
}
