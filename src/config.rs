use anyhow::{Context, Result, anyhow};
use std::env;
use std::str::FromStr;

use crate::timekeeping::monthly_report::WeekendPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub run_migrations: bool,
    pub log_dir: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub weekend_policy: WeekendPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            rate_protected_per_min: parse_or(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,
            weekend_policy: WeekendPolicy {
                sundays: parse_or(&lookup, "WEEKEND_SUNDAYS", true)?,
                saturdays: match lookup("WEEKEND_SATURDAYS") {
                    Some(raw) => parse_saturdays(&raw)?,
                    None => WeekendPolicy::default().saturdays,
                },
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key}: cannot parse `{raw}`: {e}")),
        None => Ok(default),
    }
}

/// `"1,3"` → `[1, 3]`. An empty value means no Saturday is off.
fn parse_saturdays(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let ordinal: u32 = part
                .parse()
                .with_context(|| format!("WEEKEND_SATURDAYS: `{part}` is not a number"))?;
            if (1..=5).contains(&ordinal) {
                Ok(ordinal)
            } else {
                Err(anyhow!("WEEKEND_SATURDAYS: `{ordinal}` is outside 1..=5"))
            }
        })
        .collect()
}
