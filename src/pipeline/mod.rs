//! fetch → normalize → render → send, one report per run.

mod error;


use std::path::PathBuf;

use chrono::Utc;
use chrono_tz::Tz;

pub use error::PipelineError;

use crate::chart::ChartRenderer;
use crate::config::{Config, ConfigError};
use crate::mailer::{ReportEmail, ReportMailer};
use crate::readings::{normalize, NormalizeError};
use crate::store::ReadingSource;

const ARTIFACT_PREFIX: &str = "climate-report-";
const ARTIFACT_SUFFIX: &str = ".png";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub timezone: Tz,
    pub artifact_dir: PathBuf,
    pub keep_artifact: bool,
    pub email: ReportEmail,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            timezone: config.report_timezone()?,
            artifact_dir: PathBuf::from(&config.report.artifact_dir),
            keep_artifact: config.report.keep_artifact,
            email: ReportEmail::from_config(config),
        })
    }
}

/// How a run ended. Only `Failed` carries an error; the early stops are
/// normal "nothing to report" outcomes.
#[derive(Debug)]
pub enum RunOutcome {
    Delivered { readings: usize },
    NoRecords,
    NoValidReadings { received: usize },
    Failed(PipelineError),
}

pub struct ReportPipeline<S, R, M> {
    source: S,
    renderer: R,
    mailer: M,
    settings: PipelineSettings,
}

impl<S, R, M> ReportPipeline<S, R, M>
where
    S: ReadingSource,
    R: ChartRenderer,
    M: ReportMailer,
{
    pub fn new(source: S, renderer: R, mailer: M, settings: PipelineSettings) -> Self {
        Self {
            source,
            renderer,
            mailer,
            settings,
        }
    }

    /// Runs once and never returns an error: failures are logged here and
    /// reported as `RunOutcome::Failed`.
    pub async fn run(&self) -> RunOutcome {
        let run_id = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        log::info!("report_run_started run_id={}", run_id);

        match self.execute().await {
            Ok(outcome) => {
                log::info!("report_run_finished run_id={} outcome={:?}", run_id, outcome);
                outcome
            }
            Err(error) => {
                log::error!(
                    "report_run_failed run_id={} stage={} code={} error={}",
                    run_id,
                    error.stage(),
                    error.code(),
                    error
                );
                RunOutcome::Failed(error)
            }
        }
    }

    async fn execute(&self) -> Result<RunOutcome, PipelineError> {
        let records = self.source.fetch_all_readings().await?;
        if records.is_empty() {
            log::info!("report_skipped reason=store_returned_no_records");
            return Ok(RunOutcome::NoRecords);
        }
        log::debug!("store_records_fetched count={}", records.len());

        let readings = match normalize(records, self.settings.timezone) {
            Ok(readings) => readings,
            Err(error) => {
                let NormalizeError::NoValidReadings { received } = error;
                log::warn!(
                    "report_skipped reason=no_valid_readings code={} received={}",
                    error.code(),
                    received
                );
                return Ok(RunOutcome::NoValidReadings { received });
            }
        };
        log::info!(
            "readings_normalized count={} first_local={} last_local={} timezone={}",
            readings.len(),
            readings.first().local_display(),
            readings.last().local_display(),
            readings.timezone().name()
        );

        let artifact = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .suffix(ARTIFACT_SUFFIX)
            .tempfile_in(&self.settings.artifact_dir)
            .map_err(|source| PipelineError::Artifact {
                dir: self.settings.artifact_dir.display().to_string(),
                source,
            })?;

        self.renderer.render(&readings, artifact.path()).await?;
        self.mailer
            .send(artifact.path(), &self.settings.email)
            .await?;

        if self.settings.keep_artifact {
            match artifact.keep() {
                Ok((_, path)) => log::info!("report_artifact_kept path={}", path.display()),
                Err(error) => log::warn!("report_artifact_keep_failed error={}", error),
            }
        }

        Ok(RunOutcome::Delivered {
            readings: readings.len(),
        })
    }
}
