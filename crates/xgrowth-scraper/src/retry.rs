//! Bounded, fixed-delay retry around one profile acquisition.
//!
//! Each attempt navigates, waits for readiness, lets the page settle, checks
//! for block markers, and runs the strategy chain. Block markers and missing
//! profiles end the loop immediately; everything else is retried after a
//! fixed delay until the attempt budget is spent.

use std::time::Duration;

use chrono::Utc;
use xgrowth_core::{AppConfig, StatRecord};

use crate::chain::StrategyChain;
use crate::driver::PageDriver;
use crate::error::{AcquireError, AttemptError, BlockReason, DriverError};
use crate::page::ProfilePage;

/// How often readiness is polled while waiting for a page.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Page text that means the profile will never yield counters.
const BLOCK_MARKERS: [(&str, BlockReason); 6] = [
    ("This account doesn't exist", BlockReason::NotFound),
    ("This account doesn\u{2019}t exist", BlockReason::NotFound),
    ("Account suspended", BlockReason::Suspended),
    ("These posts are protected", BlockReason::Protected),
    ("These tweets are protected", BlockReason::Protected),
    ("This account is protected", BlockReason::Protected),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    pub page_load_timeout: Duration,
    /// Pause after readiness before reading the page.
    pub settle_delay: Duration,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            page_load_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            page_load_timeout: config.page_load_timeout,
            settle_delay: config.settle_delay,
            retry_delay: config.retry_delay,
        }
    }
}

/// Returns the reason a page is a block page, if it is one.
#[must_use]
pub fn detect_block(content: &str) -> Option<BlockReason> {
    BLOCK_MARKERS
        .iter()
        .find(|(marker, _)| content.contains(marker))
        .map(|(_, reason)| *reason)
}

enum AttemptFailure {
    Blocked(BlockReason),
    Transient(AttemptError),
}

impl From<AttemptError> for AttemptFailure {
    fn from(err: AttemptError) -> Self {
        AttemptFailure::Transient(err)
    }
}

impl From<DriverError> for AttemptFailure {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::NotFound { .. } => AttemptFailure::Blocked(BlockReason::NotFound),
            other => AttemptFailure::Transient(other.into()),
        }
    }
}

/// Acquires one [`StatRecord`] for the profile at `url`.
///
/// # Errors
///
/// - [`AcquireError::Blocked`] as soon as a block marker or a missing
///   profile is seen. Never retried.
/// - [`AcquireError::Exhausted`] when every attempt failed transiently;
///   carries the last attempt's error.
pub async fn acquire_stats<D: PageDriver>(
    driver: &mut D,
    url: &str,
    chain: &StrategyChain,
    policy: &RetryPolicy,
) -> Result<StatRecord, AcquireError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        tracing::info!(url, attempt, max_attempts, "acquiring profile stats");

        match attempt_once(driver, url, chain, policy).await {
            Ok(record) => {
                tracing::info!(
                    url,
                    attempt,
                    followers = ?record.followers,
                    following = ?record.following,
                    posts = ?record.posts,
                    "profile stats acquired"
                );
                return Ok(record);
            }
            Err(AttemptFailure::Blocked(reason)) => {
                tracing::error!(url, attempt, %reason, "profile is blocked; not retrying");
                return Err(AcquireError::Blocked {
                    url: url.to_owned(),
                    reason,
                });
            }
            Err(AttemptFailure::Transient(err)) => {
                if attempt >= max_attempts {
                    tracing::error!(url, attempt, error = %err, "attempt budget exhausted");
                    return Err(AcquireError::Exhausted {
                        url: url.to_owned(),
                        attempts: attempt,
                        last_error: err,
                    });
                }
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(policy.retry_delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "attempt failed; retrying after delay"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
        }
    }
}

async fn attempt_once<D: PageDriver>(
    driver: &mut D,
    url: &str,
    chain: &StrategyChain,
    policy: &RetryPolicy,
) -> Result<StatRecord, AttemptFailure> {
    driver.navigate(url).await?;
    wait_until_ready(driver, policy.page_load_timeout).await?;
    tokio::time::sleep(policy.settle_delay).await;

    let page = driver.snapshot()?;
    if let Some(reason) = detect_block(page.content()) {
        return Err(AttemptFailure::Blocked(reason));
    }

    let timestamp = Utc::now();
    chain
        .extract(&page)
        .map(|stats| stats.into_record(timestamp))
        .ok_or(AttemptFailure::Transient(AttemptError::EmptyExtraction))
}

async fn wait_until_ready<D: PageDriver>(
    driver: &mut D,
    timeout: Duration,
) -> Result<(), AttemptError> {
    let poll = async {
        while !driver.is_ready().await {
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| AttemptError::PageLoadTimeout(timeout))
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
