use chrono_tz::Tz;
use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment value {0}")]
    Missing(String),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: String,
        source: dotenvy::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "CONFIG_MISSING",
            Self::Invalid(_) => "CONFIG_INVALID",
            Self::Read { .. } => "CONFIG_READ_ERROR",
            Self::Parse { .. } => "CONFIG_PARSE_ERROR",
            Self::EnvFile { .. } => "CONFIG_ENV_FILE_ERROR",
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.store.url.starts_with("https://") && !self.store.url.starts_with("http://") {
            return Err(ConfigError::Invalid(
                "STORE_URL must be an http(s) URL".to_string(),
            ));
        }
        if self.smtp.port == 0 {
            return Err(ConfigError::Invalid(
                "SMTP_PORT must be greater than 0".to_string(),
            ));
        }
        if !self.smtp.recipient.contains('@') {
            return Err(ConfigError::Invalid(
                "EMAIL_RECIPIENT must be an email address".to_string(),
            ));
        }
        if !self.smtp.sender.contains('@') {
            return Err(ConfigError::Invalid(
                "sender address (EMAIL_SENDER or SMTP_USER) must be an email address".to_string(),
            ));
        }
        self.report_timezone()?;
        self.schedule_timezone()?;
        if self.report.artifact_dir.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "report.artifact_dir must not be empty".to_string(),
            ));
        }
        if self.report.render_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "report.render_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.schedule.hour > 23 {
            return Err(ConfigError::Invalid(
                "schedule.hour must be between 0 and 23".to_string(),
            ));
        }
        if self.schedule.minute > 59 {
            return Err(ConfigError::Invalid(
                "schedule.minute must be between 0 and 59".to_string(),
            ));
        }
        Ok(())
    }

    pub fn report_timezone(&self) -> Result<Tz, ConfigError> {
        parse_timezone("report.timezone", &self.report.timezone)
    }

    pub fn schedule_timezone(&self) -> Result<Tz, ConfigError> {
        parse_timezone("schedule.timezone", &self.schedule.timezone)
    }
}

fn parse_timezone(field: &str, value: &str) -> Result<Tz, ConfigError> {
    value.trim().parse::<Tz>().map_err(|_| {
        ConfigError::Invalid(format!(
            "{} must be an IANA timezone name, got {:?}",
            field, value
        ))
    })
}
