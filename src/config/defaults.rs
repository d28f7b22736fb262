use super::schema::{ReportSettings, ScheduleSettings};

pub(super) const DEFAULT_DATABASE_NAME: &str = "TemperaturaUmidadeDB";
pub(super) const DEFAULT_CONTAINER_NAME: &str = "Leituras";
pub(super) const DEFAULT_SMTP_PORT: u16 = 587;

pub(super) fn default_report_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

pub(super) fn default_report_subject() -> String {
    "Daily Temperature and Humidity Report".to_string()
}

pub(super) fn default_report_body() -> String {
    "Attached is the daily temperature and humidity report.".to_string()
}

pub(super) fn default_artifact_dir() -> String {
    std::env::temp_dir().display().to_string()
}

pub(super) fn default_render_timeout_secs() -> u64 {
    30
}

pub(super) fn default_schedule_hour() -> u8 {
    8
}

pub(super) fn default_schedule_minute() -> u8 {
    0
}

pub(super) fn default_schedule_timezone() -> String {
    "UTC".to_string()
}

pub(super) fn default_run_on_startup() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            timezone: default_report_timezone(),
            subject: default_report_subject(),
            body: default_report_body(),
            artifact_dir: default_artifact_dir(),
            keep_artifact: false,
            render_timeout_secs: default_render_timeout_secs(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            hour: default_schedule_hour(),
            minute: default_schedule_minute(),
            timezone: default_schedule_timezone(),
            run_on_startup: default_run_on_startup(),
        }
    }
}
