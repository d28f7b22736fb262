use lettre::message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use super::error::DeliveryError;
use crate::config::Config;

pub(super) const ATTACHMENT_NAME: &str = "temperature_humidity_report.png";
const ATTACHMENT_CONTENT_TYPE: &str = "image/png";

/// Addressing and text of the daily report email.
#[derive(Debug, Clone)]
pub struct ReportEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl ReportEmail {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sender: config.smtp.sender.clone(),
            recipient: config.smtp.recipient.clone(),
            subject: config.report.subject.clone(),
            body: config.report.body.clone(),
        }
    }
}

/// multipart/mixed: plain-text body followed by the PNG chart. Binary parts are
/// base64 transfer-encoded by the builder.
pub(super) fn build_report_message(
    email: &ReportEmail,
    png_bytes: Vec<u8>,
) -> Result<Message, DeliveryError> {
    let from = parse_mailbox(&email.sender)?;
    let to = parse_mailbox(&email.recipient)?;
    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|error| DeliveryError::Build(error.to_string()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(email.body.clone()))
                .singlepart(
                    Attachment::new(ATTACHMENT_NAME.to_string()).body(png_bytes, content_type),
                ),
        )
        .map_err(|error| DeliveryError::Build(error.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse::<Mailbox>()
        .map_err(|error| DeliveryError::InvalidAddress {
            address: address.to_string(),
            message: error.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use super::{build_report_message, ReportEmail};
    use crate::mailer::DeliveryError;

    fn email() -> ReportEmail {
        ReportEmail {
            sender: "reports@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
            subject: "Daily Temperature and Humidity Report".to_string(),
            body: "Attached is the daily temperature and humidity report.".to_string(),
        }
    }

    #[test]
    fn message_carries_body_and_base64_attachment() {
        let png = b"\x89PNG\r\n\x1a\nchart".to_vec();
        let message = build_report_message(&email(), png.clone()).expect("message");
        let formatted = String::from_utf8(message.formatted()).expect("ascii message");

        assert!(formatted.contains("From: reports@example.com"));
        assert!(formatted.contains("To: ops@example.com"));
        assert!(formatted.contains("Subject: Daily Temperature and Humidity Report"));
        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("Attached is the daily temperature and humidity report."));
        assert!(formatted.contains("Content-Type: image/png"));
        assert!(formatted.contains("filename=\"temperature_humidity_report.png\""));
        assert!(formatted.contains("Content-Transfer-Encoding: base64"));
        assert!(formatted.contains(&STANDARD.encode(&png)));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let mut email = email();
        email.recipient = "not an address".to_string();

        let error = build_report_message(&email, Vec::new()).expect_err("must fail");
        assert!(matches!(error, DeliveryError::InvalidAddress { ref address, .. } if address == "not an address"));
        assert_eq!(error.code(), "DELIVERY_INVALID_ADDRESS");
    }
}
