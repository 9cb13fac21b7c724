use std::time::Duration;

use thiserror::Error;

/// Failure inside a single extraction strategy. Never fatal to the chain.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid structural path \"{path}\": {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("embedded data could not be decoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::PageDriver`] implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profile not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no page has been loaded yet")]
    NotNavigated,
}

/// Why a profile is permanently unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    NotFound,
    Suspended,
    Protected,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockReason::NotFound => write!(f, "account does not exist"),
            BlockReason::Suspended => write!(f, "account is suspended"),
            BlockReason::Protected => write!(f, "account is protected"),
        }
    }
}

/// A transient failure of one acquisition attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("page driver failed: {0}")]
    Driver(#[from] DriverError),

    #[error("page did not become ready within {0:?}")]
    PageLoadTimeout(Duration),

    #[error("no followers count could be extracted")]
    EmptyExtraction,
}

/// Terminal outcome of the retry controller when no record was produced.
///
/// `Blocked` and `Exhausted` are deliberately distinct so callers can tell
/// "does not exist" apart from "temporarily unreachable".
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("profile {url} is unavailable: {reason}")]
    Blocked { url: String, reason: BlockReason },

    #[error("gave up on {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last_error: AttemptError,
    },
}
