use thiserror::Error;

/// Errors raised while driving a browser session.
///
/// None of these escape `Fetcher::fetch`: locator misses are skipped, the
/// rest turn the document into an empty one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webdriver error ({code}): {message}")]
    WebDriver { code: String, message: String },

    #[error("unexpected webdriver response: {0}")]
    Protocol(String),

    #[error("browser session unavailable: {0}")]
    SessionUnavailable(String),
}

impl FetchError {
    /// The locator found nothing usable; the next rule should be tried.
    pub fn is_locator_miss(&self) -> bool {
        matches!(
            self,
            FetchError::WebDriver { code, .. }
                if code == "no such element"
                    || code == "stale element reference"
                    || code == "invalid selector"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wd(code: &str) -> FetchError {
        FetchError::WebDriver {
            code: code.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn locator_misses() {
        assert!(wd("no such element").is_locator_miss());
        assert!(wd("stale element reference").is_locator_miss());
        assert!(!wd("invalid session id").is_locator_miss());
        assert!(!FetchError::Protocol("x".into()).is_locator_miss());
    }
}
