use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Operational parameters for acquisition and analytics.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory holding `<account>_stats.csv` files.
    pub data_dir: PathBuf,
    pub profile_base_url: String,
    pub user_agent: String,
    pub page_load_timeout: Duration,
    pub settle_delay: Duration,
    pub retry_delay: Duration,
    pub max_attempts: u32,
    pub horizons: Vec<TimeDelta>,
    pub trailing_days: u32,
    pub refresh_interval: Duration,
    pub layout_path: Option<PathBuf>,
}

impl AppConfig {
    /// Path of the persisted series for `account`.
    #[must_use]
    pub fn series_path(&self, account: &str) -> PathBuf {
        let account = account.trim_start_matches('@');
        self.data_dir.join(format!("{account}_stats.csv"))
    }

    /// Profile page URL for `account`.
    #[must_use]
    pub fn profile_url(&self, account: &str) -> String {
        format!(
            "{}/{}",
            self.profile_base_url.trim_end_matches('/'),
            account.trim_start_matches('@')
        )
    }
}
