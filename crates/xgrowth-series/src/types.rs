use chrono::{DateTime, Utc};
use serde::Serialize;
use xgrowth_core::StatField;

/// One usable row of a persisted series.
///
/// Followers is always present: rows without it never become samples.
/// Posts is coerced to zero when the cell was empty or unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub followers: i64,
    pub following: Option<i64>,
    pub posts: i64,
}

impl Sample {
    #[must_use]
    pub fn value(&self, field: StatField) -> Option<i64> {
        match field {
            StatField::Followers => Some(self.followers),
            StatField::Following => self.following,
            StatField::Posts => Some(self.posts),
        }
    }
}

/// Samples for one account, kept in ascending timestamp order.
///
/// Duplicate timestamps are kept in the order they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    #[must_use]
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest first.
    #[must_use]
    pub fn ascending(&self) -> &[Sample] {
        &self.samples
    }

    /// Newest first. Equal timestamps keep their read order.
    #[must_use]
    pub fn descending(&self) -> Vec<&Sample> {
        let mut samples: Vec<&Sample> = self.samples.iter().collect();
        samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        samples
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.descending().first().copied()
    }
}
