use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::lifecycle::delivery::{CalendarError, WorkingCalendar};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_FILE_SIZE_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("NON_WORKING_DAYS: {0}")]
    Calendar(#[from] CalendarError),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub secret: String,
    pub token_ttl_hours: i64,
    pub upload_dir: PathBuf,
    pub file_size_limit: usize,
    pub calendar: WorkingCalendar,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let secret = lookup("SECRET").ok_or(ConfigError::Missing("SECRET"))?;

        Ok(Self {
            database_url,
            secret,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", &lookup, DEFAULT_TOKEN_TTL_HOURS)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            file_size_limit: parse_or("FILE_SIZE_LIMIT", &lookup, DEFAULT_FILE_SIZE_LIMIT)?,
            calendar: match lookup("NON_WORKING_DAYS") {
                Some(days) => days.parse()?,
                None => WorkingCalendar::default(),
            },
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_fill_everything_optional() {
        let config =
            AppConfig::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:"), ("SECRET", "s")]))
                .unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.file_size_limit, DEFAULT_FILE_SIZE_LIMIT);
        assert_eq!(config.calendar, WorkingCalendar::default());
    }

    #[test]
    fn required_values_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[("SECRET", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SECRET", "s"),
            ("FILE_SIZE_LIMIT", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "FILE_SIZE_LIMIT", .. }));
    }

    #[test]
    fn weekend_is_configurable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SECRET", "s"),
            ("NON_WORKING_DAYS", "Fri"),
        ]))
        .unwrap();
        assert_eq!(config.calendar.non_working_days(), &[Weekday::Fri]);
    }
}
