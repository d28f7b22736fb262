use chrono::{DateTime, Days, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::time::{sleep, Duration};

use crate::chart::ChartRenderer;
use crate::config::ScheduleSettings;
use crate::mailer::ReportMailer;
use crate::pipeline::ReportPipeline;
use crate::store::ReadingSource;

use super::RunTally;

const FALLBACK_WAIT: Duration = Duration::from_secs(60);
const PAST_DUE_MARGIN_SECS: i64 = 30;

/// Runs the report every day at the configured wall-clock time until ctrl-c.
/// Missed runs are not caught up.
pub(super) async fn run_daily<S, R, M>(
    pipeline: &ReportPipeline<S, R, M>,
    schedule: &ScheduleSettings,
    timezone: Tz,
) where
    S: ReadingSource,
    R: ChartRenderer,
    M: ReportMailer,
{
    let mut tally = RunTally::default();

    if schedule.run_on_startup {
        log::info!("report_startup_run");
        tally.record(&pipeline.run().await);
    }

    loop {
        let now = Utc::now();
        let scheduled = next_run_after(now, schedule.hour, schedule.minute, timezone);
        let wait = wait_until(now, scheduled);
        log::info!(
            "report_next_run_scheduled at={} wait_secs={}",
            (now + TimeDelta::seconds(wait.as_secs() as i64)).to_rfc3339(),
            wait.as_secs()
        );

        tokio::select! {
            _ = sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!(
                    "report_scheduler_stopping reason=ctrl_c delivered={} failed={}",
                    tally.delivered,
                    tally.failed
                );
                return;
            }
        }

        if let Some(late) = scheduled.and_then(|at| past_due_by(at, Utc::now())) {
            log::warn!(
                "report_run_past_due late_secs={} margin_secs={}",
                late.num_seconds(),
                PAST_DUE_MARGIN_SECS
            );
        }

        tally.record(&pipeline.run().await);
    }
}

fn wait_until(now: DateTime<Utc>, scheduled: Option<DateTime<Utc>>) -> Duration {
    scheduled
        .and_then(|at| (at - now).to_std().ok())
        .unwrap_or(FALLBACK_WAIT)
}

/// How late the timer fired, when it is beyond the past-due margin.
fn past_due_by(scheduled: DateTime<Utc>, fired: DateTime<Utc>) -> Option<TimeDelta> {
    let late = fired - scheduled;
    (late > TimeDelta::seconds(PAST_DUE_MARGIN_SECS)).then_some(late)
}

/// First `hour:minute` in `timezone` strictly after `now`.
fn next_run_after(now: DateTime<Utc>, hour: u8, minute: u8, timezone: Tz) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&timezone).date_naive();

    (0..=2u64)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), 0))
        .filter_map(|naive| resolve_local(naive, timezone))
        .find(|scheduled| *scheduled > now)
}

/// Ambiguous local times take the earlier instant; times skipped by a DST
/// jump move forward one hour.
fn resolve_local(naive: NaiveDateTime, timezone: Tz) -> Option<DateTime<Utc>> {
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            timezone
                .from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|scheduled| scheduled.with_timezone(&Utc))
}
