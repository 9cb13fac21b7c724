//! `fetch` command: acquire counters and append them to the series.
//!
//! An exhausted attempt budget still records a row with followers `N/A` so
//! the series shows when readings were unavailable. A blocked profile stops
//! the command: retrying later will not help.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use xgrowth_core::{AppConfig, LayoutPaths, StatField, StatRecord};
use xgrowth_scraper::{acquire_stats, AcquireError, HttpDriver, PageDriver, RetryPolicy, StrategyChain};
use xgrowth_series::append_record;

use crate::refresh::{until_interrupted, wait_for_next_cycle};

/// Structural layout from `XGROWTH_LAYOUT_PATH`, or the built-in one.
pub(crate) fn resolve_layout(config: &AppConfig) -> anyhow::Result<LayoutPaths> {
    match &config.layout_path {
        Some(path) => {
            let layout = xgrowth_core::load_layout(path)
                .with_context(|| format!("failed to load layout from {}", path.display()))?;
            tracing::info!(path = %path.display(), "using layout override");
            Ok(layout)
        }
        None => Ok(LayoutPaths::default()),
    }
}

/// Fetch once, or every `interval` until interrupted.
///
/// # Errors
///
/// Returns an error if the layout or driver cannot be set up, the profile
/// is blocked, or the series file cannot be written.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    account: &str,
    interval: Option<Duration>,
) -> anyhow::Result<()> {
    let account = account.trim_start_matches('@');
    let chain = StrategyChain::with_layout(resolve_layout(config)?);
    let policy = RetryPolicy::from_config(config);
    let mut driver = HttpDriver::new(config.page_load_timeout, &config.user_agent)
        .context("failed to build HTTP driver")?;
    let url = config.profile_url(account);
    let path = config.series_path(account);

    loop {
        let cycle = fetch_once(&mut driver, &url, &chain, &policy, &path);
        match until_interrupted(cycle).await {
            Some(Ok(record)) => print!("{}", render_record(account, &record, &path)),
            Some(Err(e)) => return Err(e),
            None => break,
        }

        let Some(interval) = interval else { break };
        if !wait_for_next_cycle(interval).await {
            break;
        }
    }

    Ok(())
}

/// One acquisition plus append. Returns the record that was written.
pub(crate) async fn fetch_once<D: PageDriver>(
    driver: &mut D,
    url: &str,
    chain: &StrategyChain,
    policy: &RetryPolicy,
    path: &Path,
) -> anyhow::Result<StatRecord> {
    let record = match acquire_stats(driver, url, chain, policy).await {
        Ok(record) => record,
        Err(e @ AcquireError::Blocked { .. }) => return Err(e.into()),
        Err(e @ AcquireError::Exhausted { .. }) => {
            tracing::error!(url, error = %e, "recording unavailable reading");
            eprintln!("error: {e}");
            StatRecord::empty(Utc::now())
        }
    };

    append_record(path, &record)
        .with_context(|| format!("failed to append to {}", path.display()))?;
    Ok(record)
}

fn display_count(value: Option<i64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), crate::report::thousands)
}

/// Console summary of one written record.
fn render_record(account: &str, record: &StatRecord, path: &Path) -> String {
    let mut out = format!(
        "=== {account} @ {} ===\n",
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if record.is_empty() {
        out.push_str("Counters unavailable; recorded N/A\n");
    }
    for field in [StatField::Posts, StatField::Following, StatField::Followers] {
        let label = format!("{}:", capitalize(field.as_str()));
        let _ = writeln!(out, "{label:<11}{}", display_count(record.get(field)));
    }
    let _ = writeln!(out, "Stats written to {}", path.display());
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use xgrowth_scraper::{DriverError, HtmlPage};
    use xgrowth_series::load_series;

    use super::*;

    /// Serves the same page (or the same failure) on every navigation.
    struct StaticDriver {
        html: Option<&'static str>,
        not_found: bool,
        loaded: bool,
    }

    impl PageDriver for StaticDriver {
        type Page = HtmlPage;

        async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
            if self.not_found {
                return Err(DriverError::NotFound {
                    url: url.to_owned(),
                });
            }
            self.loaded = self.html.is_some();
            Ok(())
        }

        async fn is_ready(&mut self) -> bool {
            self.loaded
        }

        fn snapshot(&self) -> Result<HtmlPage, DriverError> {
            self.html
                .map(HtmlPage::parse)
                .ok_or(DriverError::NotNavigated)
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            page_load_timeout: Duration::from_millis(20),
            settle_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "xgrowth-cli-{}-{name}_stats.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn successful_fetch_appends_row() {
        let path = temp_path("ok");
        let mut driver = StaticDriver {
            html: Some(r#"<a href="/jack/followers" aria-label="1,024 Followers">x</a>"#),
            not_found: false,
            loaded: false,
        };
        let chain = StrategyChain::with_layout(LayoutPaths::default());

        let record = fetch_once(&mut driver, "https://x.test/jack", &chain, &policy(), &path)
            .await
            .unwrap();
        assert_eq!(record.followers, Some(1_024));

        let series = load_series(&path).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.ascending()[0].followers, 1_024);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn exhausted_fetch_appends_sentinel_row() {
        let path = temp_path("exhausted");
        let mut driver = StaticDriver {
            html: None,
            not_found: false,
            loaded: false,
        };
        let chain = StrategyChain::with_layout(LayoutPaths::default());

        let record = fetch_once(&mut driver, "https://x.test/jack", &chain, &policy(), &path)
            .await
            .unwrap();
        assert!(record.is_empty());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().ends_with(",,,N/A"));
        assert!(load_series(&path).unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn blocked_fetch_is_an_error_and_writes_nothing() {
        let path = temp_path("blocked");
        let mut driver = StaticDriver {
            html: None,
            not_found: true,
            loaded: false,
        };
        let chain = StrategyChain::with_layout(LayoutPaths::default());

        let err = fetch_once(&mut driver, "https://x.test/nobody", &chain, &policy(), &path)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<AcquireError>().is_some());
        assert!(!path.exists());
    }

    #[test]
    fn rendered_record_lists_counters() {
        let record = StatRecord {
            timestamp: Utc::now(),
            followers: Some(1_234_567),
            following: None,
            posts: Some(42),
        };
        let text = render_record("jack", &record, Path::new("jack_stats.csv"));
        assert!(text.contains("Posts:     42"));
        assert!(text.contains("Following: N/A"));
        assert!(text.contains("Followers: 1,234,567"));
        assert!(!text.contains("unavailable"));
    }

    #[test]
    fn rendered_empty_record_says_unavailable() {
        let text = render_record("jack", &StatRecord::empty(Utc::now()), Path::new("x.csv"));
        assert!(text.contains("Counters unavailable"));
        assert!(text.contains("Followers: N/A"));
    }

    #[test]
    fn layout_defaults_without_override() {
        let config = crate::tests::test_config(std::env::temp_dir());
        assert_eq!(resolve_layout(&config).unwrap(), LayoutPaths::default());
    }

    #[test]
    fn missing_layout_file_is_an_error() {
        let mut config = crate::tests::test_config(std::env::temp_dir());
        config.layout_path = Some(PathBuf::from("/nonexistent/xgrowth-layout.yaml"));
        assert!(resolve_layout(&config).is_err());
    }
}
