//! Read-only view over a fetched profile page.

use scraper::{ElementRef, Html, Selector};

use crate::error::StrategyError;

/// The parts of a DOM element the extraction strategies look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    /// Visible text, whitespace-trimmed.
    pub text: String,
    pub title: Option<String>,
    pub aria_label: Option<String>,
    pub href: Option<String>,
}

/// A snapshot of one loaded profile page.
///
/// Object safe so the strategy chain can run over any driver's pages.
pub trait ProfilePage {
    /// Raw markup / payload of the page.
    fn content(&self) -> &str;

    /// Elements at a structural path (a CSS selector).
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::InvalidPath`] when the path cannot be parsed.
    fn elements_at(&self, path: &str) -> Result<Vec<PageElement>, StrategyError>;

    /// Anchors carrying an accessible label.
    fn labelled_links(&self) -> Vec<PageElement>;

    /// Hover text for an element: its `title`, falling back to `aria-label`.
    fn hover_text(&self, element: &PageElement) -> Option<String> {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        non_blank(element.title.as_deref()).or_else(|| non_blank(element.aria_label.as_deref()))
    }
}

/// A static HTML document.
pub struct HtmlPage {
    source: String,
    document: Html,
}

impl HtmlPage {
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let document = Html::parse_document(&source);
        Self { source, document }
    }
}

impl std::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPage")
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl ProfilePage for HtmlPage {
    fn content(&self) -> &str {
        &self.source
    }

    fn elements_at(&self, path: &str) -> Result<Vec<PageElement>, StrategyError> {
        let selector = Selector::parse(path).map_err(|e| StrategyError::InvalidPath {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(self.document.select(&selector).map(to_page_element).collect())
    }

    fn labelled_links(&self) -> Vec<PageElement> {
        let Ok(selector) = Selector::parse("a[aria-label]") else {
            return Vec::new();
        };
        self.document.select(&selector).map(to_page_element).collect()
    }
}

fn to_page_element(element: ElementRef<'_>) -> PageElement {
    let attr = |name: &str| element.value().attr(name).map(str::to_owned);
    PageElement {
        text: element.text().collect::<String>().trim().to_owned(),
        title: attr("title"),
        aria_label: attr("aria-label"),
        href: attr("href"),
    }
}
