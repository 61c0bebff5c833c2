//! Notification sinks.
//!
//! A sink receives one [`TriggerEvent`] at a time from the worker. Sinks
//! are selected by `notifier.kind` in the backend configuration.

use std::time::Duration;

use geotour_core::config::{NotifierConfig, NotifierKind};
use geotour_types::TriggerEvent;

use crate::error::NotifyError;

/// A device-notification sink.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
#[derive(Debug, Clone)]
pub enum DeviceNotifier {
    /// Writes each trigger as a structured log line.
    Log(LogNotifier),
    /// POSTs each trigger as JSON to an HTTP endpoint.
    Webhook(WebhookNotifier),
}

impl DeviceNotifier {
    /// Build the sink selected by `config`.
    ///
    /// Returns `Ok(None)` when notifications are disabled.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingWebhookUrl`] if the webhook sink is
    /// selected without a URL, or [`NotifyError::Http`] if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, NotifyError> {
        match config.kind {
            NotifierKind::Disabled => Ok(None),
            NotifierKind::Log => Ok(Some(Self::Log(LogNotifier))),
            NotifierKind::Webhook => {
                let url = config
                    .webhook_url
                    .clone()
                    .ok_or(NotifyError::MissingWebhookUrl)?;
                Ok(Some(Self::Webhook(WebhookNotifier::new(
                    url,
                    config.timeout(),
                )?)))
            }
        }
    }

    /// Deliver one trigger event.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the sink could not deliver the event.
    pub async fn notify(&self, event: &TriggerEvent) -> Result<(), NotifyError> {
        match self {
            Self::Log(sink) => {
                sink.notify(event);
                Ok(())
            }
            Self::Webhook(sink) => sink.notify(event).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::Webhook(_) => "webhook",
        }
    }
}

/// Sink that logs each trigger at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    fn notify(self, event: &TriggerEvent) {
        tracing::info!(
            session_id = %event.session_id,
            stop_id = %event.stop.id,
            stop_title = %event.stop.title,
            triggered_at = %event.triggered_at,
            "Device notification"
        );
    }
}

/// Sink that POSTs the event JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a webhook sink with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: String, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn notify(&self, event: &TriggerEvent) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_builds_no_sink() {
        let config = NotifierConfig {
            kind: NotifierKind::Disabled,
            ..NotifierConfig::default()
        };
        assert!(matches!(DeviceNotifier::from_config(&config), Ok(None)));
    }

    #[test]
    fn default_config_builds_log_sink() {
        let sink = DeviceNotifier::from_config(&NotifierConfig::default());
        assert!(matches!(sink, Ok(Some(ref s)) if s.name() == "log"));
    }

    #[test]
    fn webhook_without_url_rejected() {
        let config = NotifierConfig {
            kind: NotifierKind::Webhook,
            webhook_url: None,
            ..NotifierConfig::default()
        };
        assert!(matches!(
            DeviceNotifier::from_config(&config),
            Err(NotifyError::MissingWebhookUrl)
        ));
    }

    #[test]
    fn webhook_keeps_configured_url() {
        let config = NotifierConfig {
            kind: NotifierKind::Webhook,
            webhook_url: Some(String::from("http://127.0.0.1:9/trigger")),
            ..NotifierConfig::default()
        };
        let sink = DeviceNotifier::from_config(&config);
        assert!(matches!(
            sink,
            Ok(Some(DeviceNotifier::Webhook(ref w))) if w.url() == "http://127.0.0.1:9/trigger"
        ));
    }
}
