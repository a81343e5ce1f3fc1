pub mod locators;
pub mod session;
pub mod webdriver;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::settings::Settings;
use locators::Locator;
use session::{Browser, PageSession};

const MIN_TITLE_CHARS: usize = 3;
const MIN_BODY_CHARS: usize = 50;

/// Rendered page content. Fields are `None` when nothing usable was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub url: String,
    pub title: Option<String>,
    pub body_text: Option<String>,
}

impl Document {
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            body_text: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Explicit wait per locator rule.
    pub locator_wait: Duration,
    pub poll_interval: Duration,
    /// Pause after navigation before searching.
    pub settle_delay: Duration,
}

impl From<&Settings> for FetchOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            locator_wait: Duration::from_millis(settings.locator_wait_ms),
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
        }
    }
}

/// Loads a job page in its own browser session and pulls out title and body.
///
/// Best effort: a missing element is expected and skipped, and any failure
/// of the session yields an empty `Document`. `fetch` never errors.
#[derive(Clone)]
pub struct Fetcher {
    browser: Arc<dyn Browser>,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(browser: Arc<dyn Browser>, options: FetchOptions) -> Self {
        Self { browser, options }
    }

    pub async fn fetch(&self, url: &str) -> Document {
        let mut session = match self.browser.open().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not start browser for {}: {}", url, e);
                return Document::empty(url);
            }
        };

        let outcome = self.scan(session.as_mut(), url).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session for {}: {}", url, e);
        }

        match outcome {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Error scraping {}: {}", url, e);
                Document::empty(url)
            }
        }
    }

    async fn scan(&self, session: &mut dyn PageSession, url: &str) -> Result<Document, FetchError> {
        // A slow page still leaves a partial DOM worth searching.
        if let Err(e) = session.navigate(url).await {
            warn!("Navigation to {} did not finish: {}", url, e);
        }
        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }

        let plan = locators::plan_for(url);
        let title = self.first_match(session, &plan.title, MIN_TITLE_CHARS).await?;
        let mut body = self.first_match(session, &plan.body, MIN_BODY_CHARS).await?;

        if body.is_none() {
            body = match session.page_text().await {
                Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                Err(e) => {
                    debug!("No page text for {}: {}", url, e);
                    None
                }
            };
        }

        Ok(Document {
            url: url.to_string(),
            title,
            body_text: body,
        })
    }

    /// First locator whose element text is longer than `min_chars`.
    async fn first_match(
        &self,
        session: &mut dyn PageSession,
        rules: &[Locator],
        min_chars: usize,
    ) -> Result<Option<String>, FetchError> {
        for locator in rules {
            let Some(text) = self.wait_for_text(session, locator).await? else {
                debug!("No element for {:?}", locator);
                continue;
            };
            let text = text.trim();
            if text.chars().count() > min_chars {
                return Ok(Some(text.to_string()));
            }
        }
        Ok(None)
    }

    /// Poll for element presence until the per-locator wait runs out.
    async fn wait_for_text(
        &self,
        session: &mut dyn PageSession,
        locator: &Locator,
    ) -> Result<Option<String>, FetchError> {
        let deadline = Instant::now() + self.options.locator_wait;
        loop {
            match session.element_text(locator).await {
                Ok(Some(text)) => return Ok(Some(text)),
                Ok(None) => {}
                Err(e) if e.is_locator_miss() => {}
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}


// ── Tests ──

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::testing::{quick_options, FakeBrowser, FakePage};
    use super::*;

    const LONG_BODY: &str = "We are hiring a backend engineer to build data pipelines on cloud infrastructure.";

    fn fetcher(browser: FakeBrowser) -> Fetcher {
        Fetcher::new(Arc::new(browser), quick_options())
    }

    #[tokio::test]
    async fn site_rules_find_title_and_body() {
        let url = "https://www.linkedin.com/jobs/view/1";
        let browser = FakeBrowser::default().page(
            url,
            FakePage::default()
                .with(".job-details-jobs-unified-top-card__job-title", "  Backend Engineer ")
                .with(".show-more-less-html__markup", LONG_BODY),
        );
        let closed = Arc::clone(&browser.closed);

        let doc = fetcher(browser).fetch(url).await;
        assert_eq!(doc.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(doc.body_text.as_deref(), Some(LONG_BODY));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn short_matches_fall_through_to_generic_rules() {
        let url = "https://unstop.com/jobs/designer-1";
        let browser = FakeBrowser::default().page(
            url,
            FakePage::default()
                .with("h1", "Dev")
                .with("h1.job-title", "Graphic Designer")
                .with(r#"//*[@id="tab-detail"]/div[1]/ul[1]"#, "too short")
                .with("div.job-description", LONG_BODY),
        );

        let doc = fetcher(browser).fetch(url).await;
        assert_eq!(doc.title.as_deref(), Some("Graphic Designer"));
        assert_eq!(doc.body_text.as_deref(), Some(LONG_BODY));
    }

    #[tokio::test]
    async fn page_text_is_the_last_resort() {
        let url = "https://jobs.example.com/42";
        let browser = FakeBrowser::default().page(url, FakePage::default().text("  whole page  "));
        let lookups = Arc::clone(&browser.lookups);

        let doc = fetcher(browser).fetch(url).await;
        assert_eq!(doc.title, None);
        assert_eq!(doc.body_text.as_deref(), Some("whole page"));

        let tried = lookups.lock().unwrap();
        assert!(tried.contains(&"//div[contains(@class, 'description')]"));
    }

    #[tokio::test]
    async fn failed_navigation_still_searches() {
        let url = "https://jobs.example.com/slow";
        let page = FakePage {
            navigation_fails: true,
            ..FakePage::default()
        }
        .with(".job-title", "Data Engineer");

        let doc = fetcher(FakeBrowser::default().page(url, page)).fetch(url).await;
        assert_eq!(doc.title.as_deref(), Some("Data Engineer"));
        assert_eq!(doc.body_text, None);
    }

    #[tokio::test]
    async fn driver_crash_yields_empty_document_and_closes() {
        let url = "https://jobs.example.com/crash";
        let page = FakePage {
            driver_crashes: true,
            ..FakePage::default()
        }
        .text("should not be used");
        let browser = FakeBrowser::default().page(url, page);
        let closed = Arc::clone(&browser.closed);

        let doc = fetcher(browser).fetch(url).await;
        assert_eq!(doc, Document::empty(url));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unavailable_browser_yields_empty_document() {
        let browser = FakeBrowser {
            fail_open: true,
            ..FakeBrowser::default()
        };
        let doc = fetcher(browser).fetch("https://x.example/1").await;
        assert_eq!(doc, Document::empty("https://x.example/1"));
    }
}
