//! Strategy 4: machine-readable counters embedded in the page payload.
//!
//! Sources, in order:
//! 1. schema.org JSON-LD `InteractionCounter` entries, mapped by their
//!    feature name (`Follows`, `Friends`, `Tweets`).
//! 2. API-shaped fields anywhere in the payload (`followers_count`,
//!    `friends_count`, `statuses_count`).
//! 3. A bare `userInteractionCount`, which on profile pages is the
//!    follower counter.
//!
//! These are exact integers, so the merge step lets embedded followers
//! override abbreviated text-derived values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use xgrowth_core::StatField;

use super::{ExtractionResult, ExtractionStrategy, Provenance};
use crate::error::StrategyError;
use crate::page::ProfilePage;

static JSONLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static API_FIELDS: LazyLock<[(StatField, Regex); 3]> = LazyLock::new(|| {
    let field_re = |name: &str| {
        Regex::new(&format!(r#""{name}"\s*:\s*"?(\d+)"#)).expect("valid regex")
    };
    [
        (StatField::Followers, field_re("followers_count")),
        (StatField::Following, field_re("friends_count")),
        (StatField::Posts, field_re("statuses_count")),
    ]
});

static BARE_INTERACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""userInteractionCount"\s*:\s*"?(\d+)"#).expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedData;

impl ExtractionStrategy for EmbeddedData {
    fn provenance(&self) -> Provenance {
        Provenance::EmbeddedData
    }

    fn attempt(&self, page: &dyn ProfilePage) -> Result<ExtractionResult, StrategyError> {
        let payload = page.content();
        let mut result = ExtractionResult::new(self.provenance());
        let mut decode_error = None;

        for cap in JSONLD_RE.captures_iter(payload) {
            let Some(block) = cap.get(1) else { continue };
            match serde_json::from_str::<Value>(block.as_str()) {
                Ok(value) => collect_interaction_counters(&value, &mut result),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable JSON-LD block");
                    decode_error.get_or_insert(e);
                }
            }
        }

        for (field, re) in API_FIELDS.iter() {
            if let Some(count) = re.captures(payload).and_then(|c| c.get(1)) {
                result.offer(*field, count.as_str());
            }
        }

        if let Some(count) = BARE_INTERACTION_RE.captures(payload).and_then(|c| c.get(1)) {
            result.offer(StatField::Followers, count.as_str());
        }

        match decode_error {
            Some(e) if result.is_empty() => Err(e.into()),
            _ => Ok(result),
        }
    }
}

fn interaction_field(name: &str) -> Option<StatField> {
    match name.to_ascii_lowercase().as_str() {
        "follows" | "followers" => Some(StatField::Followers),
        "friends" | "following" => Some(StatField::Following),
        "tweets" | "posts" | "statuses" => Some(StatField::Posts),
        _ => None,
    }
}

/// Walks a JSON-LD document collecting named `userInteractionCount`s.
fn collect_interaction_counters(value: &Value, result: &mut ExtractionResult) {
    match value {
        Value::Object(map) => {
            if let (Some(count), Some(name)) = (
                map.get("userInteractionCount"),
                map.get("name").and_then(Value::as_str),
            ) {
                let token = match count {
                    Value::Number(n) => Some(n.to_string()),
                    Value::String(s) => Some(s.clone()),
                    _ => None,
                };
                if let (Some(field), Some(token)) = (interaction_field(name), token) {
                    result.offer(field, token);
                }
            }
            for child in map.values() {
                collect_interaction_counters(child, result);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_interaction_counters(item, result);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HtmlPage;

    const PROFILE_JSONLD: &str = r#"
        <script type="application/ld+json">
        {"@context":"http://schema.org","@type":"ProfilePage","mainEntity":{
          "@type":"Person","additionalName":"jack",
          "interactionStatistic":[
            {"@type":"InteractionCounter","name":"Follows","userInteractionCount":6512345},
            {"@type":"InteractionCounter","name":"Friends","userInteractionCount":4123},
            {"@type":"InteractionCounter","name":"Tweets","userInteractionCount":"29876"}
          ]}}
        </script>"#;

    #[test]
    fn maps_named_interaction_counters() {
        let page = HtmlPage::parse(PROFILE_JSONLD);
        let result = EmbeddedData.attempt(&page).unwrap();
        assert_eq!(result.token(StatField::Followers), Some("6512345"));
        assert_eq!(result.token(StatField::Following), Some("4123"));
        assert_eq!(result.token(StatField::Posts), Some("29876"));
    }

    #[test]
    fn reads_api_shaped_fields() {
        let page = HtmlPage::parse(
            r#"<script type="application/json">
               {"followers_count": 12345, "friends_count": 678, "statuses_count": 910}
               </script>"#,
        );
        let result = EmbeddedData.attempt(&page).unwrap();
        assert_eq!(result.token(StatField::Followers), Some("12345"));
        assert_eq!(result.token(StatField::Following), Some("678"));
        assert_eq!(result.token(StatField::Posts), Some("910"));
    }

    #[test]
    fn bare_interaction_count_is_followers() {
        let page = HtmlPage::parse(r#"<div data-x='{"userInteractionCount":4321}'></div>"#);
        let result = EmbeddedData.attempt(&page).unwrap();
        assert_eq!(result.token(StatField::Followers), Some("4321"));
        assert!(!result.has(StatField::Posts));
    }

    #[test]
    fn named_counter_beats_bare_count() {
        let html = format!(r#"<div data-x='{{"userInteractionCount":5}}'></div>{PROFILE_JSONLD}"#);
        let page = HtmlPage::parse(html);
        let result = EmbeddedData.attempt(&page).unwrap();
        assert_eq!(result.token(StatField::Followers), Some("6512345"));
    }

    #[test]
    fn undecodable_block_with_nothing_else_is_an_error() {
        let page = HtmlPage::parse(
            r#"<script type="application/ld+json">{"broken": </script>"#,
        );
        let err = EmbeddedData.attempt(&page).unwrap_err();
        assert!(matches!(err, StrategyError::Json(_)));
    }

    #[test]
    fn undecodable_block_does_not_hide_raw_fields() {
        let page = HtmlPage::parse(
            r#"<script type="application/ld+json">{"broken": </script>
               <script>window.state={"friends_count":17}</script>"#,
        );
        let result = EmbeddedData.attempt(&page).unwrap();
        assert_eq!(result.token(StatField::Following), Some("17"));
    }

    #[test]
    fn page_without_embedded_data_is_empty() {
        let page = HtmlPage::parse("<p>12,345 Followers</p>");
        assert!(EmbeddedData.attempt(&page).unwrap().is_empty());
    }
}
