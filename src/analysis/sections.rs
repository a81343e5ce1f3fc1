use serde::Serialize;

use super::tagger::split_sentences;

/// Text captured under a requirements-style heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub text: String,
    /// Heading keywords that caused the capture.
    pub triggers: Vec<String>,
}

/// Isolate the requirements/skills part of a posting.
///
/// First pass: the line after a heading containing one of `heading_keywords`
/// starts a capture that runs until a blank line or a line with a colon.
/// Second pass (only when the first captured nothing): every sentence that
/// itself mentions a heading keyword.
pub fn extract_section<S: AsRef<str>>(text: &str, heading_keywords: &[S]) -> Option<Section> {
    let keywords: Vec<String> = heading_keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut captured: Vec<String> = Vec::new();
    let mut triggers: Vec<String> = Vec::new();
    let mut capturing = false;

    for line in text.split('\n') {
        let lowered = line.trim().to_lowercase();

        let hits = matching(&keywords, &lowered);
        if !hits.is_empty() {
            capturing = true;
            merge(&mut triggers, hits);
            continue;
        }

        if capturing && (line.trim().is_empty() || line.contains(':')) {
            break;
        }

        if capturing {
            captured.push(line.trim().to_string());
        }
    }

    if captured.is_empty() {
        triggers.clear();
        for sentence in split_sentences(text) {
            let hits = matching(&keywords, &sentence.to_lowercase());
            if !hits.is_empty() {
                merge(&mut triggers, hits);
                captured.push(sentence);
            }
        }
    }

    build(&captured, triggers)
}

fn matching<'a>(keywords: &'a [String], haystack: &str) -> Vec<&'a str> {
    keywords
        .iter()
        .filter(|k| haystack.contains(k.as_str()))
        .map(String::as_str)
        .collect()
}

fn merge(triggers: &mut Vec<String>, hits: Vec<&str>) {
    for hit in hits {
        if !triggers.iter().any(|t| t == hit) {
            triggers.push(hit.to_string());
        }
    }
}

fn build(parts: &[String], triggers: Vec<String>) -> Option<Section> {
    if parts.is_empty() {
        return None;
    }
    Some(Section {
        text: parts.join(" "),
        triggers,
    })
}

// ── Tests ──
