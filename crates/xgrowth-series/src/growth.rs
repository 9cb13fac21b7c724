//! Growth rates over lookback horizons with nearest-sample matching.
//!
//! Samples are irregular, so a horizon rarely lands on a real sample. For
//! each horizon the engine picks the older sample closest in time to
//! `latest - horizon` and scales the change by the time that actually
//! elapsed between the two samples, not by the nominal horizon.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::types::{Sample, Series};
use crate::SeriesError;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn serialize_secs<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(delta.num_seconds())
}

/// Change of one counter over one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthStat {
    #[serde(rename = "horizon_secs", serialize_with = "serialize_secs")]
    pub horizon: TimeDelta,
    /// `latest - nearest`; negative when the counter dropped.
    pub delta: i64,
    pub rate_per_day: f64,
}

impl GrowthStat {
    #[must_use]
    pub fn rate_per_week(&self) -> f64 {
        self.rate_per_day * 7.0
    }
}

/// Followers (and optionally posts) growth for one horizon, measured
/// against the same reference sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonGrowth {
    #[serde(rename = "horizon_secs", serialize_with = "serialize_secs")]
    pub horizon: TimeDelta,
    /// Timestamp of the sample the latest one was compared to.
    pub reference: DateTime<Utc>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: TimeDelta,
    pub followers: GrowthStat,
    pub posts: Option<GrowthStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub latest: Sample,
    pub horizons: Vec<HorizonGrowth>,
}

/// Computes growth for every horizon in `horizons`.
///
/// Samples sharing the latest sample's timestamp are never used as a
/// reference, so a duplicated row does not hide the report.
///
/// # Errors
///
/// Returns [`SeriesError::InsufficientData`] when the series holds fewer
/// than two samples, or when every sample shares the latest timestamp.
pub fn compute_growth(
    series: &Series,
    horizons: &[TimeDelta],
    include_posts: bool,
) -> Result<GrowthReport, SeriesError> {
    let ordered = series.descending();
    let Some((&latest, rest)) = ordered.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        return Err(SeriesError::InsufficientData(format!(
            "need at least 2 samples, have {}",
            ordered.len()
        )));
    };

    let older: Vec<&Sample> = rest
        .iter()
        .copied()
        .filter(|s| s.timestamp < latest.timestamp)
        .collect();
    if older.is_empty() {
        return Err(SeriesError::InsufficientData(format!(
            "every sample shares the latest timestamp {}",
            latest.timestamp
        )));
    }

    let mut results = Vec::with_capacity(horizons.len());
    for &horizon in horizons {
        let target = lookback_target(latest.timestamp, horizon);
        // `min_by_key` keeps the first minimum, so ties go to the newer sample.
        let Some(nearest) = older
            .iter()
            .copied()
            .min_by_key(|s| (s.timestamp - target).abs())
        else {
            continue;
        };

        let elapsed = latest.timestamp - nearest.timestamp;

        let stat = |latest_value: i64, nearest_value: i64| {
            let delta = latest_value - nearest_value;
            GrowthStat {
                horizon,
                delta,
                rate_per_day: rate_per_day(delta, elapsed),
            }
        };

        tracing::debug!(
            horizon = %horizon,
            reference = %nearest.timestamp,
            elapsed_secs = elapsed.num_seconds(),
            "horizon matched"
        );

        results.push(HorizonGrowth {
            horizon,
            reference: nearest.timestamp,
            elapsed,
            followers: stat(latest.followers, nearest.followers),
            posts: include_posts.then(|| stat(latest.posts, nearest.posts)),
        });
    }

    Ok(GrowthReport {
        latest: latest.clone(),
        horizons: results,
    })
}

/// `latest - horizon`, clamped to the representable range. A horizon
/// reaching past the earliest date simply matches the oldest sample.
fn lookback_target(latest: DateTime<Utc>, horizon: TimeDelta) -> DateTime<Utc> {
    latest.checked_sub_signed(horizon).unwrap_or(if horizon > TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[allow(clippy::cast_precision_loss)]
fn rate_per_day(delta: i64, elapsed: TimeDelta) -> f64 {
    let elapsed_days = elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    delta as f64 / elapsed_days
}

#[cfg(test)]
#[path = "growth_test.rs"]
mod tests;
