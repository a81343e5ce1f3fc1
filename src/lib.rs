//! Job posting scraper: renders job pages in a headless browser, isolates the
//! requirements section and extracts job-relevant keywords.

pub mod analysis;
pub mod db;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod gap;
pub mod settings;
pub mod tracker;
pub mod vocab;
