mod schedules;

use thiserror::Error;

use crate::chart::PlottersRenderer;
use crate::config::{Config, ConfigError};
use crate::mailer::SmtpReportMailer;
use crate::pipeline::{PipelineSettings, ReportPipeline, RunOutcome};
use crate::store::{DocumentStoreClient, StoreError};

pub type LivePipeline = ReportPipeline<DocumentStoreClient, PlottersRenderer, SmtpReportMailer>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StartupError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(error) => error.code(),
            Self::Store(error) => error.code(),
        }
    }
}

pub fn build_pipeline(config: &Config) -> Result<LivePipeline, StartupError> {
    Ok(ReportPipeline::new(
        DocumentStoreClient::new(&config.store)?,
        PlottersRenderer::new(config.report.render_timeout_secs),
        SmtpReportMailer::new(&config.smtp),
        PipelineSettings::from_config(config)?,
    ))
}

/// Outcome counters for the lifetime of the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTally {
    pub delivered: u32,
    pub skipped: u32,
    pub failed: u32,
    pub readings_sent: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Delivered { readings } => {
                self.delivered += 1;
                self.readings_sent += readings;
            }
            RunOutcome::NoRecords => self.skipped += 1,
            RunOutcome::NoValidReadings { received } => {
                self.skipped += 1;
                log::debug!("report_tally_skip dropped_records={}", received);
            }
            RunOutcome::Failed(error) => {
                self.failed += 1;
                log::debug!(
                    "report_tally_failure stage={} code={}",
                    error.stage(),
                    error.code()
                );
            }
        }

        log::info!(
            "report_tally delivered={} skipped={} failed={} readings_sent={}",
            self.delivered,
            self.skipped,
            self.failed,
            self.readings_sent
        );
    }
}

/// Single invocation for manual runs or an external scheduler.
pub async fn run_once(pipeline: &LivePipeline) -> RunTally {
    let mut tally = RunTally::default();
    tally.record(&pipeline.run().await);
    tally
}

pub async fn run_daily(pipeline: &LivePipeline, config: &Config) -> Result<(), StartupError> {
    let timezone = config.schedule_timezone()?;
    log::info!(
        "report_scheduler_started hour={} minute={} timezone={} run_on_startup={}",
        config.schedule.hour,
        config.schedule.minute,
        timezone.name(),
        config.schedule.run_on_startup
    );
    schedules::run_daily(pipeline, &config.schedule, timezone).await;
    Ok(())
}
