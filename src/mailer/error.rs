use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid email address {address:?}: {message}")]
    InvalidAddress { address: String, message: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Attachment { .. } => "DELIVERY_ATTACHMENT_ERROR",
            Self::InvalidAddress { .. } => "DELIVERY_INVALID_ADDRESS",
            Self::Build(_) => "DELIVERY_BUILD_ERROR",
            Self::Transport(_) => "DELIVERY_TRANSPORT_ERROR",
        }
    }
}
