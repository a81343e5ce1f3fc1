use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::analysis::{extract_keywords_with, extract_section, KeywordList, KeywordPolicy, Section};
use crate::fetcher::{Document, Fetcher};

/// Everything derived from one job URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_keywords: KeywordList,
    pub requirements_text: Option<Section>,
    pub requirements_keywords: KeywordList,
}

impl ExtractionResult {
    /// Result for a URL that could not be processed at all.
    pub fn failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            description: None,
            description_keywords: Vec::new(),
            requirements_text: None,
            requirements_keywords: Vec::new(),
        }
    }

    /// Union of description and requirements keywords.
    pub fn skills(&self) -> BTreeSet<String> {
        self.description_keywords
            .iter()
            .chain(&self.requirements_keywords)
            .cloned()
            .collect()
    }
}

/// Derive keywords and the requirements section from a fetched page.
pub fn analyze_document(
    doc: Document,
    heading_keywords: &[String],
    policy: &KeywordPolicy,
) -> ExtractionResult {
    let Some(body) = doc.body_text else {
        return ExtractionResult {
            title: doc.title,
            ..ExtractionResult::failed(&doc.url)
        };
    };

    let description_keywords = extract_keywords_with(&body, policy);
    let requirements_text = extract_section(&body, heading_keywords);
    let requirements_keywords = requirements_text
        .as_ref()
        .map(|s| extract_keywords_with(&s.text, policy))
        .unwrap_or_default();

    ExtractionResult {
        url: doc.url,
        title: doc.title,
        description: Some(body),
        description_keywords,
        requirements_text,
        requirements_keywords,
    }
}

/// Runs fetch + analysis for batches of URLs on a bounded pool.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Fetcher,
    heading_keywords: Arc<[String]>,
    policy: KeywordPolicy,
}

impl Extractor {
    pub fn new(fetcher: Fetcher, heading_keywords: Vec<String>, policy: KeywordPolicy) -> Self {
        Self {
            fetcher,
            heading_keywords: heading_keywords.into(),
            policy,
        }
    }

    pub async fn extract_one(&self, url: &str) -> ExtractionResult {
        let doc = self.fetcher.fetch(url).await;
        analyze_document(doc, &self.heading_keywords, &self.policy)
    }

    /// Process `urls` with at most `worker_count` browsers at once.
    ///
    /// Results arrive in completion order; the map is returned once every URL
    /// is done. A task that panics is recorded as a failed result for its URL
    /// and does not affect the others.
    pub async fn extract_many(
        &self,
        urls: Vec<String>,
        worker_count: usize,
    ) -> HashMap<String, ExtractionResult> {
        let workers = worker_count.max(1);
        let total = urls.len();
        let semaphore = Arc::new(Semaphore::new(workers));

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        // Channel: workers send results, this loop owns the map
        let (tx, mut rx) = mpsc::channel::<ExtractionResult>(workers * 2);

        for url in urls {
            let sem = Arc::clone(&semaphore);
            let tx = tx.clone();
            let this = self.clone();

            tokio::spawn(async move {
                let _permit = sem.acquire().await;
                let target = url.clone();
                let work = tokio::spawn(async move { this.extract_one(&target).await });
                let result = match work.await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Worker for {} failed: {}", url, e);
                        ExtractionResult::failed(&url)
                    }
                };
                let _ = tx.send(result).await;
            });
        }

        // Drop our copy of tx so rx closes when all spawned tasks finish
        drop(tx);

        let mut results = HashMap::with_capacity(total);
        let mut ok = 0usize;
        while let Some(result) = rx.recv().await {
            if result.description.is_some() {
                ok += 1;
                info!(
                    url = %result.url,
                    description_keywords = ?result.description_keywords,
                    requirements_keywords = ?result.requirements_keywords,
                    "Scraped"
                );
            } else {
                warn!("Failed: {}", result.url);
            }
            pb.inc(1);
            results.insert(result.url.clone(), result);
        }

        pb.finish_and_clear();
        info!("Extracted {} URLs ({} ok, {} failed)", total, ok, total - ok);
        results
    }
}

// ── Tests ──
