use thiserror::Error;

use crate::chart::RenderError;
use crate::mailer::DeliveryError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to create report artifact in {dir}: {source}")]
    Artifact {
        dir: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Store(_) => "fetch",
            Self::Artifact { .. } | Self::Render(_) => "render",
            Self::Delivery(_) => "send",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(error) => error.code(),
            Self::Artifact { .. } => "RENDER_ARTIFACT_ERROR",
            Self::Render(error) => error.code(),
            Self::Delivery(error) => error.code(),
        }
    }
}
