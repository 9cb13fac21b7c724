//! Refresh-loop plumbing shared by the subcommands.

use std::future::Future;
use std::time::Duration;

use xgrowth_core::AppConfig;

/// Turns the `--interval`/`--refresh` flag into a loop interval.
///
/// Absent flag or `0` means run once; a bare flag uses the configured
/// refresh interval.
pub(crate) fn resolve_interval(flag: Option<Option<u64>>, config: &AppConfig) -> Option<Duration> {
    match flag {
        None | Some(Some(0)) => None,
        Some(None) => Some(config.refresh_interval).filter(|d| !d.is_zero()),
        Some(Some(secs)) => Some(Duration::from_secs(secs)),
    }
}

/// Runs `fut` unless Ctrl-C arrives first. Returns `None` when interrupted.
///
/// Series appends are synchronous within a cycle, so dropping the cycle at
/// an await point never leaves a partial row behind.
pub(crate) async fn until_interrupted<F: Future>(fut: F) -> Option<F::Output> {
    tokio::pin!(fut);
    let signal = tokio::select! {
        output = &mut fut => return Some(output),
        signal = tokio::signal::ctrl_c() => signal,
    };
    match signal {
        Ok(()) => {
            tracing::info!("interrupt received; stopping");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            Some(fut.await)
        }
    }
}

/// Sleeps for `interval` unless interrupted. Returns `false` when the loop
/// should stop.
pub(crate) async fn wait_for_next_cycle(interval: Duration) -> bool {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "waiting before next refresh"
    );
    until_interrupted(tokio::time::sleep(interval))
        .await
        .is_some()
}
