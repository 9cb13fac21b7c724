//! Loader for persisted series files.
//!
//! Columns are found by case-insensitive substring match on the header, so
//! files written by older tools (`timestamp`, `Followers Count`, ...) load
//! as long as the vocabulary matches.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::{Sample, Series};
use crate::write::MISSING_SENTINEL;
use crate::SeriesError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Resolved column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    timestamp: usize,
    followers: usize,
    posts: usize,
    following: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SeriesError> {
        let find = |needle: &str| {
            headers
                .iter()
                .position(|h| h.to_lowercase().contains(needle))
        };
        let required = |needle: &'static str| {
            find(needle).ok_or(SeriesError::Schema { column: needle })
        };
        Ok(Self {
            timestamp: required("time")?,
            followers: required("follower")?,
            posts: required("post")?,
            following: find("following"),
        })
    }
}

/// Loads the series file at `path`.
///
/// # Errors
///
/// See [`parse_series`]; additionally [`SeriesError::Io`] when the file
/// cannot be opened.
pub fn load_series(path: &Path) -> Result<Series, SeriesError> {
    let file = std::fs::File::open(path).map_err(|source| SeriesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let series = parse_series(file)?;
    tracing::debug!(path = %path.display(), samples = series.len(), "series loaded");
    Ok(series)
}

/// Parses a series from CSV text.
///
/// Rows with followers `N/A` are dropped. Empty, `N/A` or non-numeric posts
/// become 0; following becomes `None` in the same cases.
///
/// # Errors
///
/// - [`SeriesError::Schema`] if a required column is missing.
/// - [`SeriesError::Row`] for an unparsable timestamp or followers cell.
/// - [`SeriesError::Csv`] for malformed CSV.
pub fn parse_series<R: Read>(reader: R) -> Result<Series, SeriesError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;
    let mut samples = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let followers = cell(columns.followers);
        if followers == MISSING_SENTINEL {
            dropped += 1;
            continue;
        }
        let followers = followers.parse::<i64>().map_err(|_| SeriesError::Row {
            line,
            reason: format!("followers value \"{followers}\" is not an integer"),
        })?;

        let raw_ts = cell(columns.timestamp);
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| SeriesError::Row {
            line,
            reason: format!("unparsable timestamp \"{raw_ts}\""),
        })?;

        samples.push(Sample {
            timestamp,
            followers,
            following: columns.following.and_then(|idx| cell(idx).parse().ok()),
            posts: cell(columns.posts).parse().unwrap_or(0),
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, "skipped rows without a followers reading");
    }
    Ok(Series::new(samples))
}

/// Parses an ISO-8601 timestamp.
///
/// A trailing `Z` means UTC. Timestamps without an offset are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_owned(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "read_test.rs"]
mod tests;
