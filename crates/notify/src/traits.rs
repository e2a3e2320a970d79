//! Report sink trait definition and delivery error type.

use async_trait::async_trait;

use vigil_core::UptimeReport;

/// Errors that can occur during report delivery.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Trait for report delivery channels.
///
/// Delivery is fire-and-forget per cycle: a failed delivery is logged by
/// the caller and the report dropped; nothing queues or retries it.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver one finished report.
    async fn deliver(&self, report: &UptimeReport) -> Result<(), DeliveryError>;

    /// Human-readable name for this channel (e.g., "email").
    fn channel_name(&self) -> &str;
}
