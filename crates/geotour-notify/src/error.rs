//! Error types for device-notification delivery.

/// Errors that can occur while delivering a trigger event.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The webhook sink was selected without a target URL.
    #[error("webhook notifier requires notifier.webhook_url")]
    MissingWebhookUrl,

    /// The HTTP client could not be built or the request failed.
    #[error("webhook request failed: {source}")]
    Http {
        /// The underlying `reqwest` error.
        #[from]
        source: reqwest::Error,
    },

    /// The webhook answered with a non-success status.
    #[error("webhook returned {status}")]
    Status {
        /// HTTP status code returned by the webhook.
        status: u16,
    },
}
