//! Extraction strategies for the profile counters.
//!
//! Each strategy is independent and may recover any subset of the counters.
//! Strategies only isolate raw text tokens; converting them to integers is
//! the merge step's job (see [`crate::chain`]).

mod aria_label;
mod embedded;
mod link_context;
mod structural;

use std::collections::BTreeMap;

pub use aria_label::AriaLabel;
pub use embedded::EmbeddedData;
pub use link_context::LinkContext;
pub use structural::StructuralPosition;

use xgrowth_core::{LayoutPaths, StatField};

use crate::error::StrategyError;
use crate::page::ProfilePage;

/// Which strategy produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provenance {
    Structural,
    AriaLabel,
    LinkContext,
    EmbeddedData,
}

impl Provenance {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Structural => "structural",
            Provenance::AriaLabel => "aria_label",
            Provenance::LinkContext => "link_context",
            Provenance::EmbeddedData => "embedded_data",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial field → raw token mapping from one strategy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub provenance: Provenance,
    tokens: BTreeMap<StatField, String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            tokens: BTreeMap::new(),
        }
    }

    /// Records `token` for `field` unless the field already has one.
    pub fn offer(&mut self, field: StatField, token: impl Into<String>) {
        self.tokens.entry(field).or_insert_with(|| token.into());
    }

    #[must_use]
    pub fn token(&self, field: StatField) -> Option<&str> {
        self.tokens.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: StatField) -> bool {
        self.tokens.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = (StatField, &str)> {
        self.tokens.iter().map(|(field, token)| (*field, token.as_str()))
    }
}

/// One way of reading the counters off a page.
pub trait ExtractionStrategy {
    fn provenance(&self) -> Provenance;

    /// Attempts extraction.
    ///
    /// # Errors
    ///
    /// Any [`StrategyError`]; the chain logs it and moves on.
    fn attempt(&self, page: &dyn ProfilePage) -> Result<ExtractionResult, StrategyError>;
}

/// The four strategies in their fixed priority order.
#[must_use]
pub fn default_strategies(layout: LayoutPaths) -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(StructuralPosition::new(layout)),
        Box::new(AriaLabel),
        Box::new(LinkContext),
        Box::new(EmbeddedData),
    ]
}
