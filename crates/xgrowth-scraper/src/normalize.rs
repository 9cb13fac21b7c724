//! Count normalization for human-formatted counter text.
//!
//! Every token any extraction strategy produces is routed through
//! [`normalize_count`], whether it came from visible text, a title
//! attribute, an aria-label or an embedded JSON field.

use std::sync::LazyLock;

use regex::Regex;

/// `digits(,digits)*(.digits)?` followed by an optional magnitude suffix.
/// The suffix may run straight into a label, as in `"12.3KFollowers"`.
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*(?:\.\d+)?)\s*([kmb])?").expect("valid regex")
});

/// Parses a count such as `"1,234"`, `"12.3K"`, `"1.5M Followers"` into an
/// exact integer.
///
/// With a suffix (`K`, `M`, `B`, any case) the result is
/// `round(base * multiplier)`; without one the fractional part is truncated.
/// Returns `None` for empty input or when no numeric substring is present.
#[must_use]
pub fn normalize_count(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let caps = COUNT_RE.captures(text)?;
    let number = caps.get(1)?.as_str().replace(',', "");
    let base: f64 = number.parse().ok()?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(suffix) if suffix == "K" => Some(1_000.0),
        Some(suffix) if suffix == "M" => Some(1_000_000.0),
        Some(suffix) if suffix == "B" => Some(1_000_000_000.0),
        _ => None,
    };

    #[allow(clippy::cast_possible_truncation)]
    let value = match multiplier {
        Some(m) => (base * m).round() as i64,
        None => base.trunc() as i64,
    };
    Some(value)
}

/// Finds the raw count token immediately followed by `label` (e.g.
/// `"posts"`). Matching is case-insensitive; the token still has to go
/// through [`normalize_count`].
///
/// `"Joined 2009 · 10K posts"` with label `"posts"` yields `"10K"`; the
/// unlabelled `2009` is ignored.
#[must_use]
pub fn labelled_token<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let pattern = format!(
        r"(?i)(\d+(?:,\d+)*(?:\.\d+)?\s*[kmb]?)\s*{}\b",
        regex::escape(label)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)?.get(1).map(|m| m.as_str().trim_end())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
