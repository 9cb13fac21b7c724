use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::SecondsFormat;
use xgrowth_core::StatRecord;

use crate::SeriesError;

/// Column order of series files written by this crate.
pub const SERIES_HEADER: [&str; 4] = ["datetime", "posts", "following", "followers"];

/// Cell value for a followers reading that could not be taken.
pub const MISSING_SENTINEL: &str = "N/A";

/// Appends `record` as one row, writing the header first when the file is
/// new or empty.
///
/// The row (and header, if any) is encoded in memory and handed to a single
/// `write_all` on a file opened in append mode, so an interrupted process
/// leaves either the whole row or nothing.
///
/// # Errors
///
/// Returns [`SeriesError::Io`] if the file cannot be inspected, opened or
/// written, and [`SeriesError::Csv`] if encoding fails.
pub fn append_record(path: &Path, record: &StatRecord) -> Result<(), SeriesError> {
    let io_err = |source: std::io::Error| SeriesError::Io {
        path: path.display().to_string(),
        source,
    };

    let needs_header = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => return Err(io_err(e)),
    };

    let bytes = encode_row(record, needs_header).map_err(|e| match e {
        EncodeError::Csv(e) => SeriesError::Csv(e),
        EncodeError::Io(e) => io_err(e),
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(&bytes).map_err(io_err)?;

    tracing::debug!(
        path = %path.display(),
        header = needs_header,
        followers = ?record.followers,
        "series row appended"
    );
    Ok(())
}

enum EncodeError {
    Csv(csv::Error),
    Io(std::io::Error),
}

fn encode_row(record: &StatRecord, with_header: bool) -> Result<Vec<u8>, EncodeError> {
    let optional = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();

    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(SERIES_HEADER).map_err(EncodeError::Csv)?;
    }
    writer
        .write_record([
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            optional(record.posts),
            optional(record.following),
            record
                .followers
                .map_or_else(|| MISSING_SENTINEL.to_owned(), |v| v.to_string()),
        ])
        .map_err(EncodeError::Csv)?;
    writer
        .into_inner()
        .map_err(|e| EncodeError::Io(e.into_error()))
}
