//! Strategy 3: regex scan of raw markup around `/following` and `/followers`
//! anchors.
//!
//! Works on the raw page text rather than a DOM, so it still finds counters
//! when the markup is too broken for the structural lookup. Posts have no
//! anchor of their own; they are read from a `"<count> posts"` phrase in
//! the tag-stripped page text.

use std::sync::LazyLock;

use regex::Regex;
use xgrowth_core::StatField;

use super::{ExtractionResult, ExtractionStrategy, Provenance};
use crate::error::StrategyError;
use crate::normalize::labelled_token;
use crate::page::ProfilePage;

static ANCHOR_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>"#).expect("valid regex")
});

static ANCHOR_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</a\s*>").expect("valid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

const POSTS_LABELS: [&str; 2] = ["posts", "tweets"];

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:,\d+)*(?:\.\d+)?(?:\s*[kmb])?").expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkContext;

impl ExtractionStrategy for LinkContext {
    fn provenance(&self) -> Provenance {
        Provenance::LinkContext
    }

    fn attempt(&self, page: &dyn ProfilePage) -> Result<ExtractionResult, StrategyError> {
        let html = page.content();
        let mut result = ExtractionResult::new(self.provenance());

        for cap in ANCHOR_OPEN_RE.captures_iter(html) {
            let (Some(open), Some(href)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let field = match href.as_str() {
                h if h.contains("/following") => StatField::Following,
                h if h.contains("/followers") => StatField::Followers,
                _ => continue,
            };
            if result.has(field) {
                continue;
            }

            let rest = &html[open.end()..];
            let inner = ANCHOR_CLOSE_RE
                .find(rest)
                .map_or(rest, |close| &rest[..close.start()]);
            let text = TAG_RE.replace_all(inner, " ");

            if let Some(number) = NUMBER_RE.find(&text) {
                tracing::debug!(%field, token = number.as_str(), "link-context match");
                result.offer(field, number.as_str());
            }

            if result.has(StatField::Following) && result.has(StatField::Followers) {
                break;
            }
        }

        let text = TAG_RE.replace_all(html, " ");
        if let Some(posts) = POSTS_LABELS
            .iter()
            .find_map(|label| labelled_token(&text, label))
        {
            tracing::debug!(token = posts, "link-context posts match");
            result.offer(StatField::Posts, posts);
        }

        Ok(result)
    }
}
