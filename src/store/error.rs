use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }

    pub(super) fn unavailable(operation: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            operation,
            message: error.to_string(),
        }
    }
}
