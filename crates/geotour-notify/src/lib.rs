//! Device-notification delivery for the Geotour campus tour.
//!
//! The progression engine pushes a [`TriggerEvent`](geotour_types::TriggerEvent)
//! onto a bounded queue every time a session reaches a stop. This crate owns
//! the other end of that queue: a background worker that drains it and
//! hands each event to a [`DeviceNotifier`] sink. Delivery failures are
//! logged and never reach the visitor's request.
//!
//! # Modules
//!
//! - [`sink`] -- Log and webhook notifiers
//! - [`worker`] -- Queue-draining background task
//! - [`error`] -- Notification error type

pub mod error;
pub mod sink;
pub mod worker;

pub use error::NotifyError;
pub use sink::{DeviceNotifier, LogNotifier, WebhookNotifier};
pub use worker::{WorkerStats, run_notification_worker, spawn_notification_worker};
