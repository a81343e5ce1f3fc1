use async_trait::async_trait;

use super::locators::Locator;
use crate::error::FetchError;

/// Starts browser sessions. One session per fetch, never shared.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageSession>, FetchError>;
}

/// A live page in a browser.
#[async_trait]
pub trait PageSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), FetchError>;

    /// Text of the first element matching `locator`, or `None` if no element
    /// is present yet.
    async fn element_text(&mut self, locator: &Locator) -> Result<Option<String>, FetchError>;

    /// Visible text of the whole page.
    async fn page_text(&mut self) -> Result<String, FetchError>;

    async fn close(&mut self) -> Result<(), FetchError>;
}
