use chrono::TimeDelta;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;
    use std::time::Duration;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("XGROWTH_ENV", "development"))?;
    let log_level = or_default("XGROWTH_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("XGROWTH_DATA_DIR", "."));
    let profile_base_url = or_default("XGROWTH_PROFILE_BASE_URL", "https://x.com");
    let user_agent = or_default("XGROWTH_USER_AGENT", DEFAULT_USER_AGENT);

    let page_load_timeout =
        Duration::from_secs(parse_u64("XGROWTH_PAGE_LOAD_TIMEOUT_SECS", "10")?);
    let settle_delay = Duration::from_millis(parse_u64("XGROWTH_SETTLE_DELAY_MS", "2000")?);
    let retry_delay = Duration::from_secs(parse_u64("XGROWTH_RETRY_DELAY_SECS", "5")?);

    let max_attempts = parse_u32("XGROWTH_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(invalid(
            "XGROWTH_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    let horizons = or_default("XGROWTH_HORIZONS", "1h,6h,24h,7d")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_horizon(s).map_err(|reason| invalid("XGROWTH_HORIZONS", reason)))
        .collect::<Result<Vec<_>, _>>()?;
    if horizons.is_empty() {
        return Err(invalid(
            "XGROWTH_HORIZONS",
            "at least one horizon is required".to_string(),
        ));
    }

    let trailing_days = parse_u32("XGROWTH_TRAILING_DAYS", "7")?;
    let refresh_interval =
        Duration::from_secs(parse_u64("XGROWTH_REFRESH_INTERVAL_SECS", "60")?);
    let layout_path = lookup("XGROWTH_LAYOUT_PATH")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        profile_base_url,
        user_agent,
        page_load_timeout,
        settle_delay,
        retry_delay,
        max_attempts,
        horizons,
        trailing_days,
        refresh_interval,
        layout_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "XGROWTH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Parse a lookback horizon such as `"90s"`, `"15m"`, `"6h"`, `"7d"` or `"2w"`.
///
/// # Errors
///
/// Returns a human-readable reason when the amount or unit is invalid.
pub fn parse_horizon(raw: &str) -> Result<TimeDelta, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("horizon '{raw}' has no unit"))?;
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("horizon '{raw}' has no amount"))?;
    if amount == 0 {
        return Err(format!("horizon '{raw}' must be positive"));
    }

    let delta = match unit.to_ascii_lowercase().as_str() {
        "s" => TimeDelta::try_seconds(amount),
        "m" => TimeDelta::try_minutes(amount),
        "h" => TimeDelta::try_hours(amount),
        "d" => TimeDelta::try_days(amount),
        "w" => TimeDelta::try_weeks(amount),
        other => return Err(format!("horizon '{raw}' has unknown unit '{other}'")),
    };
    delta.ok_or_else(|| format!("horizon '{raw}' is out of range"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
