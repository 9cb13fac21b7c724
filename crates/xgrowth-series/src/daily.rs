use chrono::{Days, NaiveDate};
use serde::Serialize;
use xgrowth_core::StatField;

use crate::types::Series;

/// Change of one counter over one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyGain {
    pub date: NaiveDate,
    pub gain: i64,
}

/// Per-day gains for the `days` days ending at `today`, oldest first.
///
/// A day's value is the first sample (in time order) dated that day; no
/// nearest-match is attempted. When either that day or the day before has
/// no sample the gain is reported as 0, so "no data" and "no change" look
/// the same to callers.
#[must_use]
pub fn daily_gains(series: &Series, field: StatField, today: NaiveDate, days: u32) -> Vec<DailyGain> {
    let value_on = |date: NaiveDate| {
        series
            .ascending()
            .iter()
            .find(|s| s.timestamp.date_naive() == date)
            .and_then(|s| s.value(field))
    };

    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| {
            let previous = date.pred_opt().and_then(value_on);
            let gain = match (value_on(date), previous) {
                (Some(end), Some(start)) => end - start,
                _ => 0,
            };
            DailyGain { date, gain }
        })
        .collect()
}
