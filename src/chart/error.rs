use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font unavailable: {0}")]
    FontUnavailable(String),
    #[error("render backend failure: {0}")]
    Backend(String),
    #[error("png encoding failure: {0}")]
    PngEncoding(String),
    #[error("failed to write chart to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("render task join failure: {0}")]
    Join(String),
    #[error("render task panic: {0}")]
    Panic(String),
    #[error("render execution timeout after {0}s")]
    Timeout(u64),
}

impl RenderError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FontUnavailable(_) => "RENDER_FONT_UNAVAILABLE",
            Self::Backend(_) => "RENDER_BACKEND_ERROR",
            Self::PngEncoding(_) => "RENDER_PNG_ENCODING_ERROR",
            Self::Write { .. } => "RENDER_WRITE_ERROR",
            Self::Join(_) => "RENDER_TASK_JOIN_ERROR",
            Self::Panic(_) => "RENDER_TASK_PANIC",
            Self::Timeout(_) => "RENDER_TIMEOUT",
        }
    }

    /// Plotters reports missing fonts as a backend error; split them out so the
    /// log says what to install.
    pub(super) fn from_drawing(stage: &str, error: impl std::fmt::Debug) -> Self {
        let detail = format!("{:?}", error);
        if detail.contains("FontError") || detail.contains("FontUnavailable") {
            Self::FontUnavailable(format!("{}: {}", stage, detail))
        } else {
            Self::Backend(format!("{}: {}", stage, detail))
        }
    }
}
