use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three public profile counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Followers,
    Following,
    Posts,
}

impl StatField {
    pub const ALL: [StatField; 3] = [StatField::Followers, StatField::Following, StatField::Posts];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatField::Followers => "followers",
            StatField::Following => "following",
            StatField::Posts => "posts",
        }
    }
}

impl std::fmt::Display for StatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sampling of a profile's counters.
///
/// Missing counters stay `None`; they are never coerced to zero here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub timestamp: DateTime<Utc>,
    pub followers: Option<i64>,
    pub following: Option<i64>,
    pub posts: Option<i64>,
}

impl StatRecord {
    #[must_use]
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            followers: None,
            following: None,
            posts: None,
        }
    }

    #[must_use]
    pub fn get(&self, field: StatField) -> Option<i64> {
        match field {
            StatField::Followers => self.followers,
            StatField::Following => self.following,
            StatField::Posts => self.posts,
        }
    }

    /// True when no counter was read, as for an exhausted fetch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}
