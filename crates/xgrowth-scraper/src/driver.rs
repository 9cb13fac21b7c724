use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::DriverError;
use crate::page::{HtmlPage, ProfilePage};

/// Loads profile pages and hands out read-only snapshots of them.
///
/// The retry controller only needs these three capabilities, so a headless
/// browser, a plain HTTP fetch, or a scripted fake all fit behind it.
pub trait PageDriver {
    type Page: ProfilePage;

    /// Starts loading `url`, replacing whatever page was loaded before.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), DriverError>>;

    /// Whether the current page has finished loading.
    fn is_ready(&mut self) -> impl Future<Output = bool>;

    /// A snapshot of the current page.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NotNavigated`] when no page is loaded.
    fn snapshot(&self) -> Result<Self::Page, DriverError>;
}

/// [`PageDriver`] over a plain HTTP GET.
///
/// Sees only the server-rendered markup, which for client-rendered profiles
/// usually means the embedded-data strategy does the work.
pub struct HttpDriver {
    client: Client,
    body: Option<String>,
}

impl HttpDriver {
    /// # Errors
    ///
    /// Returns [`DriverError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, body: None })
    }
}

impl PageDriver for HttpDriver {
    type Page = HtmlPage;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.body = None;

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DriverError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(DriverError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "profile page loaded");
        self.body = Some(body);
        Ok(())
    }

    async fn is_ready(&mut self) -> bool {
        self.body.is_some()
    }

    fn snapshot(&self) -> Result<HtmlPage, DriverError> {
        self.body
            .as_deref()
            .map(HtmlPage::parse)
            .ok_or(DriverError::NotNavigated)
    }
}
