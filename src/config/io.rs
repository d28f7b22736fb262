use std::collections::HashMap;
use std::path::Path;

use super::env::{smtp_from_lookup, store_from_lookup};
use super::schema::{Config, FileConfig};
use super::validate::ConfigError;

/// Loads settings from `path` and credentials from the process environment,
/// falling back to values from `env_file` for keys the environment lacks.
pub fn load_config(path: impl AsRef<Path>, env_file: impl AsRef<Path>) -> Result<Config, ConfigError> {
    load_config_layered(path, env_file, |key| std::env::var(key).ok())
}

pub(super) fn load_config_layered<F>(
    path: impl AsRef<Path>,
    env_file: impl AsRef<Path>,
    process_lookup: F,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_values = read_env_file(env_file.as_ref())?;
    load_config_with(path, |key| {
        process_lookup(key)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| file_values.get(key).cloned())
    })
}

/// Builds the config from the optional settings file plus a key lookup.
pub(super) fn load_config_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = read_file_config(path.as_ref())?;
    let config = Config {
        store: store_from_lookup(&lookup)?,
        smtp: smtp_from_lookup(&lookup)?,
        report: file.report,
        schedule: file.schedule,
    };
    config.validate()?;
    Ok(config)
}

/// Parses a dotenv file without touching the process environment.
pub(super) fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        log::debug!("env_file_absent path={}", path.display());
        return Ok(HashMap::new());
    }

    let env_file_error = |source| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    };
    let values = dotenvy::from_path_iter(path)
        .map_err(env_file_error)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(env_file_error)?;

    log::info!(
        "env_file_loaded path={} keys={}",
        path.display(),
        values.len()
    );
    Ok(values)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        log::info!(
            "config_file_absent path={} using=defaults",
            path.display()
        );
        return Ok(FileConfig::default());
    }

    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })
}
