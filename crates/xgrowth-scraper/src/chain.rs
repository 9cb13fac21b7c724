//! Strategy chain and field-priority merge.
//!
//! Strategies run in their fixed order. Every token they produce is
//! normalized with [`normalize_count`] as it arrives; a token that does not
//! normalize is dropped so a lower-priority source can fill the field.
//! The winner for each field is picked from [`FIELD_PRIORITY`].

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use xgrowth_core::{LayoutPaths, StatField, StatRecord};

use crate::normalize::normalize_count;
use crate::page::ProfilePage;
use crate::strategy::{default_strategies, ExtractionResult, ExtractionStrategy, Provenance};

/// Source precedence per field, highest first.
///
/// Embedded followers come first: they are exact integers, while every
/// text source may be abbreviated (`"12.3K"`).
pub const FIELD_PRIORITY: [(StatField, [Provenance; 4]); 3] = [
    (
        StatField::Followers,
        [
            Provenance::EmbeddedData,
            Provenance::Structural,
            Provenance::AriaLabel,
            Provenance::LinkContext,
        ],
    ),
    (
        StatField::Following,
        [
            Provenance::Structural,
            Provenance::AriaLabel,
            Provenance::LinkContext,
            Provenance::EmbeddedData,
        ],
    ),
    (
        StatField::Posts,
        [
            Provenance::Structural,
            Provenance::AriaLabel,
            Provenance::LinkContext,
            Provenance::EmbeddedData,
        ],
    ),
];

fn priority_of(field: StatField) -> &'static [Provenance] {
    FIELD_PRIORITY
        .iter()
        .find(|(f, _)| *f == field)
        .map_or(&[], |(_, order)| order.as_slice())
}

/// Merged counters from one page. Followers is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStats {
    pub followers: i64,
    pub following: Option<i64>,
    pub posts: Option<i64>,
    /// Which strategy supplied each present field.
    pub sources: BTreeMap<StatField, Provenance>,
}

impl ExtractedStats {
    #[must_use]
    pub fn into_record(self, timestamp: DateTime<Utc>) -> StatRecord {
        StatRecord {
            timestamp,
            followers: Some(self.followers),
            following: self.following,
            posts: self.posts,
        }
    }
}

/// Normalized candidates collected so far, keyed by field then source.
#[derive(Debug, Default)]
struct Candidates {
    values: BTreeMap<StatField, BTreeMap<Provenance, i64>>,
}

impl Candidates {
    fn absorb(&mut self, result: &ExtractionResult) {
        for (field, token) in result.tokens() {
            match normalize_count(token) {
                Some(value) => {
                    self.values
                        .entry(field)
                        .or_default()
                        .entry(result.provenance)
                        .or_insert(value);
                }
                None => tracing::debug!(
                    %field,
                    strategy = %result.provenance,
                    token,
                    "token did not normalize; leaving field to later strategies"
                ),
            }
        }
    }

    fn winner(&self, field: StatField) -> Option<(Provenance, i64)> {
        let by_source = self.values.get(&field)?;
        priority_of(field)
            .iter()
            .find_map(|p| by_source.get(p).map(|v| (*p, *v)))
    }

    /// A field is settled once its winner cannot be displaced by any
    /// strategy that has not run yet.
    fn is_settled(&self, field: StatField, pending: &HashSet<Provenance>) -> bool {
        let Some((source, _)) = self.winner(field) else {
            return false;
        };
        priority_of(field)
            .iter()
            .take_while(|p| **p != source)
            .all(|p| !pending.contains(p))
    }
}

/// Ordered list of extraction strategies with per-strategy error isolation.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl StrategyChain {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard four-strategy chain over `layout`.
    #[must_use]
    pub fn with_layout(layout: LayoutPaths) -> Self {
        Self::new(default_strategies(layout))
    }

    /// Runs the chain over `page`.
    ///
    /// Returns `None` when nothing was recovered or followers is missing.
    #[must_use]
    pub fn extract(&self, page: &dyn ProfilePage) -> Option<ExtractedStats> {
        let mut candidates = Candidates::default();
        let mut pending: HashSet<Provenance> =
            self.strategies.iter().map(|s| s.provenance()).collect();

        for strategy in &self.strategies {
            let provenance = strategy.provenance();
            match strategy.attempt(page) {
                Ok(result) => {
                    tracing::debug!(
                        strategy = %provenance,
                        found = result.tokens().count(),
                        "strategy finished"
                    );
                    candidates.absorb(&result);
                }
                Err(e) => {
                    tracing::warn!(strategy = %provenance, error = %e, "strategy failed; continuing");
                }
            }
            pending.remove(&provenance);

            if StatField::ALL
                .iter()
                .all(|f| candidates.is_settled(*f, &pending))
            {
                tracing::debug!(strategy = %provenance, "all fields settled");
                break;
            }
        }

        let mut sources = BTreeMap::new();
        let mut pick = |field: StatField| {
            candidates.winner(field).map(|(source, value)| {
                sources.insert(field, source);
                value
            })
        };
        let followers = pick(StatField::Followers);
        let following = pick(StatField::Following);
        let posts = pick(StatField::Posts);

        let Some(followers) = followers else {
            tracing::warn!(
                following = ?following,
                posts = ?posts,
                "no followers count recovered"
            );
            return None;
        };

        Some(ExtractedStats {
            followers,
            following,
            posts,
            sources,
        })
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
