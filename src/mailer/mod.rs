mod error;
mod message;

use std::path::Path;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

pub use error::DeliveryError;
pub use message::ReportEmail;

use crate::config::SmtpConfig;

/// Delivers the rendered chart as an email attachment.
pub trait ReportMailer {
    async fn send(&self, image_path: &Path, email: &ReportEmail) -> Result<(), DeliveryError>;
}

/// STARTTLS submission with username/password auth. One attempt per call.
pub struct SmtpReportMailer {
    server: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpReportMailer {
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: Credentials::new(config.user.clone(), config.password.clone()),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)
                .map_err(|error| DeliveryError::Transport(error.to_string()))?
                .port(self.port)
                .credentials(self.credentials.clone())
                .build(),
        )
    }
}

impl ReportMailer for SmtpReportMailer {
    async fn send(&self, image_path: &Path, email: &ReportEmail) -> Result<(), DeliveryError> {
        let png_bytes =
            tokio::fs::read(image_path)
                .await
                .map_err(|source| DeliveryError::Attachment {
                    path: image_path.display().to_string(),
                    source,
                })?;
        let attachment_bytes = png_bytes.len();
        let message = message::build_report_message(email, png_bytes)?;

        self.transport()?
            .send(message)
            .await
            .map_err(|error| DeliveryError::Transport(error.to_string()))?;

        log::info!(
            "report_email_sent server={} port={} recipient={} attachment={} bytes={}",
            self.server,
            self.port,
            email.recipient,
            message::ATTACHMENT_NAME,
            attachment_bytes
        );
        Ok(())
    }
}
