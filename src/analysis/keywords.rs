use std::collections::HashMap;

use serde::Deserialize;

use super::lemma::lemmatize;
use super::tagger::{tag, Pos, Token};
use crate::vocab::{is_job_related, is_stopword};

/// Ordered, deduplicated job-relevant lemmas, most frequent first.
pub type KeywordList = Vec<String>;

/// Thresholds applied after counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeywordPolicy {
    /// How many of the most frequent lemmas are considered at all.
    pub candidate_pool: usize,
    /// Length cap of the returned list.
    pub max_keywords: usize,
    /// A lemma seen fewer times is kept only if it is job-related on its own.
    pub min_repeat: usize,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            candidate_pool: 15,
            max_keywords: 10,
            min_repeat: 2,
        }
    }
}

pub fn extract_keywords(text: &str) -> KeywordList {
    extract_keywords_with(text, &KeywordPolicy::default())
}

pub fn extract_keywords_with(text: &str, policy: &KeywordPolicy) -> KeywordList {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let tokens = tag(&text.to_lowercase());
    let mut counts = FrequencyCounter::default();

    for (i, token) in tokens.iter().enumerate() {
        if is_stopword(&token.text) || token.text.chars().count() <= 2 || !token.is_alpha() {
            continue;
        }
        if !is_candidate(token, tokens.get(i + 1)) {
            continue;
        }
        let lemma = lemmatize(&token.text, token.pos);
        if is_job_related(&lemma) {
            counts.add(lemma);
        }
    }

    counts
        .most_common(policy.candidate_pool)
        .into_iter()
        .filter(|(word, freq)| *freq >= policy.min_repeat || is_job_related(word))
        .map(|(word, _)| word)
        .take(policy.max_keywords)
        .collect()
}

/// Nouns, and adjectives directly attached to a following noun.
fn is_candidate(token: &Token, next: Option<&Token>) -> bool {
    match token.pos {
        Pos::Noun => true,
        Pos::Adj => next.is_some_and(|n| n.pos == Pos::Noun),
        _ => false,
    }
}

/// Counts occurrences while remembering first-seen order, which breaks ties.
#[derive(Default)]
struct FrequencyCounter {
    order: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyCounter {
    fn add(&mut self, word: String) {
        match self.index.get(&word) {
            Some(&slot) => self.order[slot].1 += 1,
            None => {
                self.index.insert(word.clone(), self.order.len());
                self.order.push((word, 1));
            }
        }
    }

    fn most_common(self, n: usize) -> Vec<(String, usize)> {
        let mut entries = self.order;
        // stable: equal counts keep first-seen order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

// ── Tests ──
