pub mod keywords;
pub mod lemma;
pub mod sections;
pub mod tagger;

pub use keywords::{extract_keywords_with, KeywordList, KeywordPolicy};
pub use sections::{extract_section, Section};
