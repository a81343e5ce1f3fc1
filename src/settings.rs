use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::analysis::KeywordPolicy;
use crate::vocab::default_heading_keywords;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.102 Safari/537.36";

/// Runtime settings: defaults, then `jobscout.toml` (or `--config`), then
/// `JOBSCOUT_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// WebDriver endpoint, e.g. a local chromedriver.
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    /// Browsers running at once.
    pub workers: usize,
    pub page_load_timeout_ms: u64,
    pub locator_wait_ms: u64,
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub database_path: PathBuf,
    pub heading_keywords: Vec<String>,
    pub keywords: KeywordPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            workers: 4,
            page_load_timeout_ms: 15_000,
            locator_wait_ms: 3_000,
            poll_interval_ms: 250,
            settle_delay_ms: 1_000,
            database_path: PathBuf::from("bookmarks.db"),
            heading_keywords: default_heading_keywords(),
            keywords: KeywordPolicy::default(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("jobscout").required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("JOBSCOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_config_file_must_exist() {
        assert!(Settings::load(Some(Path::new("does/not/exist.toml"))).is_err());
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.workers, 4);
        assert_eq!(s.page_load_timeout_ms, 15_000);
        assert_eq!(s.heading_keywords.len(), 8);
        assert_eq!(s.keywords, KeywordPolicy::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            f,
            "workers = 2\nheadless = false\nheading_keywords = [\"tech stack\"]\n\n[keywords]\nmax_keywords = 5"
        )
        .unwrap();

        let s = Settings::load(Some(f.path())).unwrap();
        assert_eq!(s.workers, 2);
        assert!(!s.headless);
        assert_eq!(s.heading_keywords, vec!["tech stack"]);
        assert_eq!(s.keywords.max_keywords, 5);
        assert_eq!(s.keywords.candidate_pool, 15);
        assert_eq!(s.locator_wait_ms, 3_000);
    }
}
