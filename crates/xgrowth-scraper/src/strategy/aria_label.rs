//! Strategy 2: accessible labels such as `aria-label="1,234 Followers"`.

use std::sync::LazyLock;

use regex::Regex;
use xgrowth_core::StatField;

use super::{ExtractionResult, ExtractionStrategy, Provenance};
use crate::error::StrategyError;
use crate::page::ProfilePage;

static FOLLOWING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*(?:\.\d+)?\s*[kmb]?)\s+Following\b").expect("valid regex")
});

static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*(?:\.\d+)?\s*[kmb]?)\s+Followers\b").expect("valid regex")
});

/// Scans labelled links to `/following` and `/followers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaLabel;

impl ExtractionStrategy for AriaLabel {
    fn provenance(&self) -> Provenance {
        Provenance::AriaLabel
    }

    fn attempt(&self, page: &dyn ProfilePage) -> Result<ExtractionResult, StrategyError> {
        let mut result = ExtractionResult::new(self.provenance());

        for link in page.labelled_links() {
            let (Some(href), Some(label)) = (link.href.as_deref(), link.aria_label.as_deref())
            else {
                continue;
            };
            if !(href.contains("/following") || href.contains("/followers")) {
                continue;
            }

            let lower = label.to_lowercase();
            let (field, re) = if lower.contains("following") {
                (StatField::Following, &*FOLLOWING_RE)
            } else if lower.contains("followers") {
                (StatField::Followers, &*FOLLOWERS_RE)
            } else {
                continue;
            };

            if let Some(token) = re.captures(label).and_then(|c| c.get(1)) {
                result.offer(field, token.as_str().trim());
            }
        }

        tracing::debug!(
            found = result.tokens().count(),
            "accessibility-label scan complete"
        );
        Ok(result)
    }
}
