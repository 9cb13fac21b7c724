//! Structural selectors for the profile header.
//!
//! The counters live at fixed positions in the rendered layout tree. The
//! platform reshuffles that tree regularly, so the selectors can be replaced
//! from a YAML file without rebuilding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const HEADER_STATS_ROW: &str = "#react-root > div > div > div:nth-of-type(2) > main > div > div > div > div > div > div:nth-of-type(3) > div > div > div > div > div:nth-of-type(5)";

/// CSS selectors locating each counter's text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPaths {
    pub followers: String,
    pub following: String,
    #[serde(default)]
    pub posts: Option<String>,
}

impl Default for LayoutPaths {
    fn default() -> Self {
        Self {
            following: format!(
                "{HEADER_STATS_ROW} > div:nth-of-type(1) > a > span:nth-of-type(1) > span"
            ),
            followers: format!(
                "{HEADER_STATS_ROW} > div:nth-of-type(2) > a > span:nth-of-type(1) > span"
            ),
            posts: None,
        }
    }
}

/// Load and validate layout selectors from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or holds an
/// empty selector.
pub fn load_layout(path: &Path) -> Result<LayoutPaths, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LayoutFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_layout(&content)
}

fn parse_layout(content: &str) -> Result<LayoutPaths, ConfigError> {
    let layout: LayoutPaths = serde_yaml::from_str(content)?;
    validate_layout(&layout)?;
    Ok(layout)
}

fn validate_layout(layout: &LayoutPaths) -> Result<(), ConfigError> {
    let selectors = [
        ("followers", Some(layout.followers.as_str())),
        ("following", Some(layout.following.as_str())),
        ("posts", layout.posts.as_deref()),
    ];
    for (name, selector) in selectors {
        if selector.is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{name} selector must be non-empty"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_targets_header_row() {
        let layout = LayoutPaths::default();
        assert!(layout.followers.starts_with("#react-root"));
        assert!(layout.followers.contains("div:nth-of-type(2) > a"));
        assert!(layout.following.contains("div:nth-of-type(1) > a"));
        assert!(layout.posts.is_none());
    }

    #[test]
    fn parse_layout_reads_yaml() {
        let yaml = "followers: \"a[href$='/followers'] span\"\nfollowing: \"a[href$='/following'] span\"\n";
        let layout = parse_layout(yaml).unwrap();
        assert_eq!(layout.followers, "a[href$='/followers'] span");
        assert_eq!(layout.following, "a[href$='/following'] span");
        assert!(layout.posts.is_none());
    }

    #[test]
    fn parse_layout_rejects_blank_selector() {
        let yaml = "followers: \"  \"\nfollowing: \"span\"\n";
        let err = parse_layout(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("followers")));
    }

    #[test]
    fn parse_layout_rejects_missing_field() {
        let err = parse_layout("followers: \"span\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::LayoutFileParse(_)));
    }

    #[test]
    fn load_layout_reports_missing_file() {
        let err = load_layout(Path::new("/nonexistent/xgrowth-layout.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::LayoutFileIo { .. }));
    }
}
