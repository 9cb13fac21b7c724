//! Strategy 1: counters at fixed positions in the layout tree.

use xgrowth_core::{LayoutPaths, StatField};

use super::{ExtractionResult, ExtractionStrategy, Provenance};
use crate::error::StrategyError;
use crate::page::ProfilePage;

/// Reads counters from configured structural paths.
///
/// For followers the hover/title text wins over the visible text: the title
/// usually carries the exact count (`"12,345"`) where the visible text is
/// abbreviated (`"12.3K"`).
#[derive(Debug, Clone)]
pub struct StructuralPosition {
    layout: LayoutPaths,
}

impl StructuralPosition {
    #[must_use]
    pub fn new(layout: LayoutPaths) -> Self {
        Self { layout }
    }

    fn paths(&self) -> Vec<(StatField, &str)> {
        let mut paths = vec![
            (StatField::Following, self.layout.following.as_str()),
            (StatField::Followers, self.layout.followers.as_str()),
        ];
        if let Some(posts) = self.layout.posts.as_deref() {
            paths.push((StatField::Posts, posts));
        }
        paths
    }
}

impl ExtractionStrategy for StructuralPosition {
    fn provenance(&self) -> Provenance {
        Provenance::Structural
    }

    fn attempt(&self, page: &dyn ProfilePage) -> Result<ExtractionResult, StrategyError> {
        let mut result = ExtractionResult::new(self.provenance());
        let mut first_error = None;

        for (field, path) in self.paths() {
            let elements = match page.elements_at(path) {
                Ok(elements) => elements,
                Err(e) => {
                    tracing::warn!(%field, path, error = %e, "structural lookup failed");
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            tracing::debug!(%field, count = elements.len(), "structural elements found");

            for element in &elements {
                if field == StatField::Followers {
                    if let Some(hover) = page.hover_text(element) {
                        tracing::debug!(%field, hover = hover.as_str(), "using hover text");
                        result.offer(field, hover);
                        break;
                    }
                }
                if !element.text.is_empty() {
                    result.offer(field, element.text.clone());
                    break;
                }
            }
        }

        match first_error {
            Some(e) if result.is_empty() => Err(e),
            _ => Ok(result),
        }
    }
}
