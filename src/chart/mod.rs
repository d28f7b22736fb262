mod error;
mod executor;
mod render;

use std::path::Path;

pub use error::RenderError;

use crate::readings::ReadingSet;

/// Draws a reading set to an image file.
pub trait ChartRenderer {
    async fn render(&self, set: &ReadingSet, path: &Path) -> Result<(), RenderError>;
}

/// Dual-series PNG renderer backed by plotters.
pub struct PlottersRenderer {
    render_timeout_secs: u64,
}

impl PlottersRenderer {
    pub fn new(render_timeout_secs: u64) -> Self {
        Self {
            render_timeout_secs,
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    async fn render(&self, set: &ReadingSet, path: &Path) -> Result<(), RenderError> {
        let bytes =
            executor::run_render_task(set.clone(), path.to_path_buf(), self.render_timeout_secs)
                .await?;
        log::info!(
            "chart_rendered path={} readings={} bytes={}",
            path.display(),
            set.len(),
            bytes
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::{ChartRenderer, RenderError};
    use crate::readings::ReadingSet;

    /// Writes a fixed payload instead of drawing; records every call.
    pub(crate) struct StubRenderer {
        fail: bool,
        calls: Mutex<Vec<(PathBuf, usize)>>,
    }

    impl StubRenderer {
        pub(crate) const PAYLOAD: &'static [u8] = b"\x89PNG stub chart";

        pub(crate) fn new() -> Self {
            Self {
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<(PathBuf, usize)> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl ChartRenderer for StubRenderer {
        async fn render(&self, set: &ReadingSet, path: &Path) -> Result<(), RenderError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((path.to_path_buf(), set.len()));
            if self.fail {
                return Err(RenderError::Backend("stub failure".to_string()));
            }
            std::fs::write(path, Self::PAYLOAD).map_err(|source| RenderError::Write {
                path: path.display().to_string(),
                source,
            })
        }
    }
}
