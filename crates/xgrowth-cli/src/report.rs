//! `growth` and `gains` commands: read-only views over a series file.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use xgrowth_core::{AppConfig, StatField};
use xgrowth_series::{
    compute_growth, daily_gains, load_series, DailyGain, GrowthReport, GrowthStat, Series,
    SeriesError,
};

use crate::refresh::wait_for_next_cycle;

/// Longest bar in the daily gain chart, in cells.
const CHART_WIDTH: i64 = 20;

const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

#[derive(Debug, Clone)]
pub(crate) struct GrowthOptions {
    pub horizons: Vec<TimeDelta>,
    pub include_posts: bool,
    pub plot: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GainsOptions {
    pub field: StatField,
    pub days: u32,
    pub json: bool,
}

fn load(path: &Path) -> anyhow::Result<Series> {
    load_series(path).with_context(|| format!("failed to load series {}", path.display()))
}

/// Print growth statistics, redrawing every `refresh` until interrupted.
///
/// # Errors
///
/// Returns an error if the series cannot be loaded or is malformed.
/// Insufficient data is reported and is not an error.
pub(crate) async fn run_growth(
    config: &AppConfig,
    account: &str,
    options: &GrowthOptions,
    refresh: Option<Duration>,
) -> anyhow::Result<()> {
    let account = account.trim_start_matches('@');
    let path = config.series_path(account);

    loop {
        let series = load(&path)?;
        match compute_growth(&series, &options.horizons, options.include_posts) {
            Ok(report) if options.json => println!("{}", serde_json::to_string_pretty(&report)?),
            Ok(report) => {
                if refresh.is_some() {
                    print!("{CLEAR_SCREEN}");
                }
                print!("{}", format_growth(&report, options.include_posts));
                if options.plot {
                    let gains = daily_gains(
                        &series,
                        StatField::Followers,
                        Utc::now().date_naive(),
                        config.trailing_days,
                    );
                    print!("{}", render_bar_chart(account, StatField::Followers, &gains));
                }
            }
            Err(SeriesError::InsufficientData(reason)) => {
                tracing::warn!(account, %reason, "growth not computed");
                eprintln!("Not enough data to calculate growth statistics ({reason}).");
            }
            Err(e) => return Err(e.into()),
        }

        let Some(interval) = refresh else { break };
        if !wait_for_next_cycle(interval).await {
            break;
        }
    }
    Ok(())
}

/// Print per-day gains, redrawing every `refresh` until interrupted.
///
/// # Errors
///
/// Returns an error if the series cannot be loaded or is malformed.
pub(crate) async fn run_gains(
    config: &AppConfig,
    account: &str,
    options: &GainsOptions,
    refresh: Option<Duration>,
) -> anyhow::Result<()> {
    let account = account.trim_start_matches('@');
    let path = config.series_path(account);

    loop {
        let series = load(&path)?;
        let gains = daily_gains(&series, options.field, Utc::now().date_naive(), options.days);
        if options.json {
            println!("{}", serde_json::to_string_pretty(&gains)?);
        } else {
            if refresh.is_some() {
                print!("{CLEAR_SCREEN}");
            }
            print!("{}", render_bar_chart(account, options.field, &gains));
        }

        let Some(interval) = refresh else { break };
        if !wait_for_next_cycle(interval).await {
            break;
        }
    }
    Ok(())
}

/// `1234567` → `"1,234,567"`.
pub(crate) fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short period label: `1-hour`, `24-hour`, `7-day`, `30-minute`.
pub(crate) fn horizon_label(horizon: TimeDelta) -> String {
    let secs = horizon.num_seconds();
    match secs {
        s if s >= 2 * 86_400 && s % 86_400 == 0 => format!("{}-day", s / 86_400),
        s if s >= 3_600 && s % 3_600 == 0 => format!("{}-hour", s / 3_600),
        s if s >= 60 && s % 60 == 0 => format!("{}-minute", s / 60),
        s => format!("{s}-second"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole(rate: f64) -> i64 {
    rate.trunc() as i64
}

fn growth_table(title: &str, current: i64, rows: &[(TimeDelta, GrowthStat)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current {title}: {}", thousands(current));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<10}{:>12}{:>14}{:>14}",
        "Period", "Change", "Per day", "Per week"
    );
    let _ = writeln!(out, "{}", "-".repeat(50));
    for (horizon, stat) in rows {
        let _ = writeln!(
            out,
            "{:<10}{:>12}{:>14}{:>14}",
            horizon_label(*horizon),
            thousands(stat.delta),
            thousands(whole(stat.rate_per_day)),
            thousands(whole(stat.rate_per_week())),
        );
    }
    out
}

/// Plain-text rendering of a growth report.
pub(crate) fn format_growth(report: &GrowthReport, include_posts: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Timestamp: {}",
        report.latest.timestamp.format("%Y-%m-%d %H:%M:%S")
    );

    let followers: Vec<_> = report
        .horizons
        .iter()
        .map(|h| (h.horizon, h.followers))
        .collect();
    out.push_str(&growth_table("followers", report.latest.followers, &followers));

    if include_posts {
        let posts: Vec<_> = report
            .horizons
            .iter()
            .filter_map(|h| h.posts.map(|p| (h.horizon, p)))
            .collect();
        let _ = writeln!(out);
        out.push_str(&growth_table("posts", report.latest.posts, &posts));
    }
    out
}

/// Horizontal bar chart of daily gains, bars scaled so the largest positive
/// gain spans the full chart width. Non-positive gains get no bar.
pub(crate) fn render_bar_chart(account: &str, field: StatField, gains: &[DailyGain]) -> String {
    let max_gain = gains.iter().map(|g| g.gain).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Daily {field} gains for {account}:");
    let _ = writeln!(out, "{:<12} {:<8} Chart", "Date", "Gain");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for gain in gains {
        let cells = if max_gain > 0 && gain.gain > 0 {
            (gain.gain.saturating_mul(CHART_WIDTH) / max_gain).min(CHART_WIDTH)
        } else {
            0
        };
        let bar = "\u{2588}".repeat(usize::try_from(cells).unwrap_or(0));
        let _ = writeln!(
            out,
            "{:<12} {:<8} {bar}",
            gain.date.format("%Y-%m-%d").to_string(),
            gain.gain
        );
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
