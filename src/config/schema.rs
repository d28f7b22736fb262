use std::fmt;

use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub smtp: SmtpConfig,
    pub report: ReportSettings,
    pub schedule: ScheduleSettings,
}

/// Non-secret settings read from the optional TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
}

#[derive(Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
    pub database: String,
    pub container: String,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_report_timezone")]
    pub timezone: String,
    #[serde(default = "default_report_subject")]
    pub subject: String,
    #[serde(default = "default_report_body")]
    pub body: String,
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
    #[serde(default)]
    pub keep_artifact: bool,
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSettings {
    #[serde(default = "default_schedule_hour")]
    pub hour: u8,
    #[serde(default = "default_schedule_minute")]
    pub minute: u8,
    #[serde(default = "default_schedule_timezone")]
    pub timezone: String,
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("key", &"[REDACTED]")
            .field("database", &self.database)
            .field("container", &self.container)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}
