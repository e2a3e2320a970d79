//! SMTP report sink via `lettre` with TLS support.
//!
//! Renders the report email with the built-in template and delivers it
//! through an SMTP server. Port 465 uses implicit TLS; other ports use
//! STARTTLS.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, message::Mailbox,
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport, Message,
    Tokio1Executor,
};

use vigil_core::config::SmtpConfig;
use vigil_core::UptimeReport;

use crate::templating::{subject, TemplateRenderer};
use crate::traits::{DeliveryError, ReportSink};

/// Sends uptime reports as HTML emails via SMTP.
pub struct EmailReportSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    renderer: TemplateRenderer,
    from: Mailbox,
    to: Mailbox,
}

impl EmailReportSink {
    /// Build an `EmailReportSink` from SMTP configuration and a recipient.
    ///
    /// The configured username doubles as the sender address, matching the
    /// account the transport authenticates as.
    pub fn from_config(config: &SmtpConfig, to: &str) -> Result<Self, DeliveryError> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|e: lettre::address::AddressError| DeliveryError::Config(e.to_string()))?;

        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| DeliveryError::Config(e.to_string()))?;

        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| DeliveryError::Config(e.to_string()))?
                .port(config.port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| DeliveryError::Config(e.to_string()))?
                .port(config.port)
        };

        let transport = builder
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            renderer: TemplateRenderer::new(),
            from,
            to,
        })
    }
}

#[async_trait]
impl ReportSink for EmailReportSink {
    /// Render and send one report email to the configured recipient.
    async fn deliver(&self, report: &UptimeReport) -> Result<(), DeliveryError> {
        let subject_line = subject(report);
        let body = self.renderer.render_body(report)?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&subject_line)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            to = %self.to,
            subject = %subject_line,
            "report delivered"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "reports@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn from_config_valid() {
        let sink = EmailReportSink::from_config(&smtp_config(), "ops@example.com");
        assert!(sink.is_ok());
    }

    #[test]
    fn from_config_invalid_recipient() {
        let result = EmailReportSink::from_config(&smtp_config(), "not-an-email");
        assert!(result.is_err());
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("Configuration error"), "got: {err}");
    }

    #[test]
    fn from_config_invalid_sender() {
        let mut config = smtp_config();
        config.username = "bad-address".to_string();
        assert!(EmailReportSink::from_config(&config, "ops@example.com").is_err());
    }

    #[test]
    fn from_config_implicit_tls_port() {
        let mut config = smtp_config();
        config.port = 465;
        assert!(EmailReportSink::from_config(&config, "ops@example.com").is_ok());
    }

    #[test]
    fn channel_name_is_email() {
        let sink = EmailReportSink::from_config(&smtp_config(), "ops@example.com").unwrap();
        assert_eq!(sink.channel_name(), "email");
    }
}
