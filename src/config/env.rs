use super::defaults::{DEFAULT_CONTAINER_NAME, DEFAULT_DATABASE_NAME, DEFAULT_SMTP_PORT};
use super::schema::{SmtpConfig, StoreConfig};
use super::validate::ConfigError;

const STORE_URL_KEYS: &[&str] = &["STORE_URL", "COSMOS_DB_URL"];
const STORE_KEY_KEYS: &[&str] = &["STORE_KEY", "COSMOS_DB_KEY"];
const STORE_DATABASE_KEYS: &[&str] = &["STORE_DATABASE_NAME", "COSMOS_DB_DATABASE_NAME"];
const STORE_CONTAINER_KEYS: &[&str] = &["STORE_CONTAINER_NAME", "COSMOS_DB_CONTAINER_NAME"];
const SMTP_SERVER_KEYS: &[&str] = &["SMTP_SERVER"];
const SMTP_PORT_KEYS: &[&str] = &["SMTP_PORT"];
const SMTP_USER_KEYS: &[&str] = &["SMTP_USER"];
const SMTP_PASSWORD_KEYS: &[&str] = &["SMTP_PASSWORD"];
const EMAIL_SENDER_KEYS: &[&str] = &["EMAIL_SENDER"];
const EMAIL_RECIPIENT_KEYS: &[&str] = &["EMAIL_RECIPIENT"];

pub(super) fn store_from_lookup<F>(lookup: &F) -> Result<StoreConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(StoreConfig {
        url: required(lookup, STORE_URL_KEYS)?,
        key: required(lookup, STORE_KEY_KEYS)?,
        database: optional(lookup, STORE_DATABASE_KEYS)
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
        container: optional(lookup, STORE_CONTAINER_KEYS)
            .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.to_string()),
    })
}

pub(super) fn smtp_from_lookup<F>(lookup: &F) -> Result<SmtpConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = match optional(lookup, SMTP_PORT_KEYS) {
        Some(raw) => raw.parse::<u16>().map_err(|_| {
            ConfigError::Invalid(format!("SMTP_PORT must be a port number, got {:?}", raw))
        })?,
        None => DEFAULT_SMTP_PORT,
    };
    let user = required(lookup, SMTP_USER_KEYS)?;
    let sender = optional(lookup, EMAIL_SENDER_KEYS).unwrap_or_else(|| user.clone());

    Ok(SmtpConfig {
        server: required(lookup, SMTP_SERVER_KEYS)?,
        port,
        user,
        password: required(lookup, SMTP_PASSWORD_KEYS)?,
        sender,
        recipient: required(lookup, EMAIL_RECIPIENT_KEYS)?,
    })
}

fn optional<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn required<F>(lookup: &F, keys: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, keys).ok_or_else(|| ConfigError::Missing(keys[0].to_string()))
}
