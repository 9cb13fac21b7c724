//! Persisted follower series: append writer, loader, and the analytics
//! computed over it.

pub mod daily;
pub mod growth;
pub mod read;
pub mod types;
pub mod write;

use thiserror::Error;

pub use daily::{daily_gains, DailyGain};
pub use growth::{compute_growth, GrowthReport, GrowthStat, HorizonGrowth};
pub use read::{load_series, parse_series, parse_timestamp};
pub use types::{Sample, Series};
pub use write::{append_record, MISSING_SENTINEL, SERIES_HEADER};

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series has no column matching \"{column}\"")]
    Schema { column: &'static str },

    #[error("failed to access series file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    Row { line: u64, reason: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),
}
