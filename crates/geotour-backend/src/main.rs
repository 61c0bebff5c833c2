//! Backend binary for the Geotour campus tour.
//!
//! Wires the storage backend, stop catalog, notification worker, and HTTP
//! server together and serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `geotour-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Connect the storage backend (in-memory or `PostgreSQL` + migrations)
//! 4. Seed the stop catalog from the stops file
//! 5. Start the device-notification worker
//! 6. Build the progression engine
//! 7. Serve the tour API
//! 8. Drain the notification queue and exit

mod error;
mod seed;

use std::path::Path;
use std::sync::Arc;

use geotour_core::config::{LoggingConfig, StorageBackend, StorageConfig};
use geotour_core::{MemoryStore, NotificationDispatcher, ProgressionEngine, TourConfig};
use geotour_db::{PostgresConfig, PostgresPool, PostgresTourStore, TourStore};
use geotour_notify::{DeviceNotifier, spawn_notification_worker};
use geotour_server::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::BackendError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "geotour-config.yaml";

/// Application entry point for the tour backend.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = TourConfig::load_or_default(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        port = config.server.port,
        storage = ?config.storage.backend,
        notifier = ?config.notifier.kind,
        "geotour-backend starting"
    );

    // 3. Connect the storage backend.
    let store = connect_store(&config.storage).await?;

    // 4. Seed the stop catalog.
    seed::seed_catalog(&store, &config.catalog).await?;

    // 5. Start the notification worker.
    let (dispatcher, worker) = match DeviceNotifier::from_config(&config.notifier)
        .map_err(BackendError::from)?
    {
        Some(notifier) => {
            let (dispatcher, rx) = NotificationDispatcher::channel(config.notifier.queue_capacity);
            info!(
                sink = notifier.name(),
                queue_capacity = config.notifier.queue_capacity,
                "Device notifications enabled"
            );
            (dispatcher, Some(spawn_notification_worker(rx, notifier)))
        }
        None => {
            info!("Device notifications disabled");
            (NotificationDispatcher::disabled(), None)
        }
    };

    // 6. Build the progression engine.
    let engine = ProgressionEngine::new(store, dispatcher)
        .with_storage_timeout(config.storage.operation_timeout());
    let state = Arc::new(AppState::new(engine));

    // 7. Serve until Ctrl-C.
    geotour_server::start_server(&ServerConfig::from(&config.server), state)
        .await
        .map_err(BackendError::from)?;

    // 8. The server dropped the engine and with it the last queue sender,
    //    so the worker finishes once the queue is drained.
    if let Some(worker) = worker {
        match worker.await {
            Ok(stats) => info!(
                delivered = stats.delivered,
                failed = stats.failed,
                "Notification queue drained"
            ),
            Err(e) => tracing::warn!(error = %e, "Notification worker aborted"),
        }
    }

    info!("geotour-backend shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Build the storage backend selected by `storage.backend`.
async fn connect_store(storage: &StorageConfig) -> Result<TourStore, BackendError> {
    match storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; sessions do not survive restarts");
            Ok(TourStore::Memory(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = PostgresPool::connect(&PostgresConfig::from_storage(storage)).await?;
            pool.run_migrations().await?;
            let store =
                PostgresTourStore::new(pool).with_advance_timeout(storage.operation_timeout());
            Ok(TourStore::Postgres(store))
        }
    }
}
