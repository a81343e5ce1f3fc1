use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?|[^\s\p{L}\p{N}]").unwrap());

/// Coarse part of speech, enough to pick out skill-like terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
    Func,
    Num,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }
}

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "all", "both", "each",
    "every", "either", "neither", "no", "another", "such", "i", "me", "my", "we", "us", "our",
    "you", "your", "he", "him", "his", "she", "her", "it", "its", "they", "them", "their",
    "who", "whom", "whose", "which", "what", "of", "in", "on", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "out", "off", "over", "under", "within", "across",
    "per", "via", "and", "or", "but", "nor", "so", "yet", "if", "as", "than", "because",
    "while", "although", "not",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "will", "would", "can", "could",
    "should", "must", "may", "might", "shall", "do", "does", "did", "have", "has", "had", "to",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "we", "you", "they", "he", "she", "who"];

/// Verbs that are rarely nouns in postings.
const VERBS: &[&str] = &[
    "develop", "build", "create", "manage", "collaborate", "ensure", "maintain", "deliver",
    "implement", "communicate", "analyze", "analyse", "improve", "provide", "help", "assist",
    "prepare", "review", "identify", "define", "coordinate", "execute", "perform",
    "participate", "lead", "write", "work", "own", "optimize", "monitor", "troubleshoot",
    "deploy", "integrate", "contribute", "establish", "conduct", "handle", "track", "oversee",
    "mentor", "utilize", "demonstrate", "possess", "thrive", "enjoy", "learn", "grow", "bring",
    "join", "apply", "understand", "include", "require", "seek", "offer", "become", "keep",
    "meet", "solve", "shape", "scale", "partner", "make", "take", "give", "get", "want", "like",
    "prefer", "need", "use", "know", "see", "find", "love", "gain", "think",
];

/// Words that are nouns by default but verbs after a modal, "to" or a pronoun.
const AMBIGUOUS: &[&str] = &[
    "design", "support", "test", "plan", "report", "research", "market", "drive", "train",
    "process", "schedule", "document", "model", "program", "focus", "produce", "lead",
];

const ADJECTIVES: &[&str] = &[
    "senior", "junior", "key", "solid", "great", "fast", "remote", "hybrid", "full", "agile",
    "modern", "complex", "robust", "relevant", "proficient", "familiar", "preferred",
    "detailed", "excellent", "strong", "good", "new", "high", "large", "small", "current",
    "best", "better", "open", "early", "entry", "mid", "real", "deep", "front", "back",
    "native", "quick", "clear", "fluent", "basic", "advanced", "ideal", "able", "eager",
];

/// Nouns that look like adjectives or adverbs by their ending.
const NOUN_OVERRIDES: &[&str] = &[
    "music", "logic", "topic", "traffic", "graphic", "clinic", "mechanic", "rubric", "metric",
    "fabric", "magic", "arithmetic", "republic", "proposal", "approval", "journal", "portal",
    "signal", "animal", "capital", "hospital", "manual", "rental", "referral", "interval",
    "terminal", "tutorial", "principal", "potential", "professional", "individual",
    "executive", "objective", "initiative", "representative", "incentive", "archive",
    "detective", "directive", "narrative", "supply", "family", "assembly", "anomaly",
    "monopoly", "italy", "july", "reply", "apply", "rely", "comply", "ally", "butterfly",
    "material", "criminal", "festival", "editorial", "rationale", "general",
];

static FUNCTION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| FUNCTION_WORDS.iter().copied().collect());
static AUX_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| AUXILIARIES.iter().copied().collect());
static VERB_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| VERBS.iter().copied().collect());
static AMBIGUOUS_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| AMBIGUOUS.iter().copied().collect());
static ADJ_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ADJECTIVES.iter().copied().collect());
static NOUN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NOUN_OVERRIDES.iter().copied().collect());

/// Split text into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokenize and tag `text`. Expects lowercased input.
pub fn tag(text: &str) -> Vec<Token> {
    let words = tokenize(text);
    let mut tags: Vec<Pos> = words.iter().map(|w| lexical_pos(w)).collect();

    // Context pass: the previous/next token disambiguates a few classes.
    for i in 0..words.len() {
        let prev = i.checked_sub(1).map(|p| words[p].as_str());
        let next = words.get(i + 1).map(String::as_str);
        let word = words[i].as_str();

        if AMBIGUOUS_SET.contains(word) {
            if prev.is_some_and(|p| AUX_SET.contains(p) || SUBJECT_PRONOUNS.contains(&p)) {
                tags[i] = Pos::Verb;
            }
            continue;
        }

        if word.ends_with("ing") && tags[i] == Pos::Verb {
            // "technical writing" is a noun; "writing the code" / "is writing" are verbs.
            let verbal = prev.is_some_and(|p| AUX_SET.contains(p) || SUBJECT_PRONOUNS.contains(&p))
                || next.is_some_and(|n| FUNCTION_SET.contains(n) && n != "and" && n != "or");
            if !verbal {
                tags[i] = Pos::Noun;
            }
            continue;
        }

        if tags[i] == Pos::Noun && is_plural_of_verb(word) {
            // "data analyses" is a noun; "she analyses data" is a verb.
            if prev.is_some_and(|p| AUX_SET.contains(p) || SUBJECT_PRONOUNS.contains(&p)) {
                tags[i] = Pos::Verb;
            }
            continue;
        }

        if word.ends_with("ed") && tags[i] == Pos::Verb {
            let after_aux =
                prev.is_some_and(|p| AUX_SET.contains(p) || SUBJECT_PRONOUNS.contains(&p));
            let before_noun = next.is_some_and(|n| lexical_pos(n) == Pos::Noun);
            if before_noun && !after_aux {
                tags[i] = Pos::Adj;
            }
        }
    }

    words
        .into_iter()
        .zip(tags)
        .map(|(text, pos)| Token { text, pos })
        .collect()
}

fn lexical_pos(word: &str) -> Pos {
    if word.chars().all(|c| c.is_numeric()) {
        return Pos::Num;
    }
    if !word.chars().any(char::is_alphanumeric) {
        return Pos::Punct;
    }
    if FUNCTION_SET.contains(word) || AUX_SET.contains(word) {
        return Pos::Func;
    }
    if NOUN_SET.contains(word) || AMBIGUOUS_SET.contains(word) {
        return Pos::Noun;
    }
    if ADJ_SET.contains(word) {
        return Pos::Adj;
    }
    if VERB_SET.contains(word) {
        return Pos::Verb;
    }
    match verb_stem(word) {
        // -s forms default to plural nouns, the context pass may flip them back
        Some((_, "s" | "es")) => return Pos::Noun,
        Some(_) => return Pos::Verb,
        None => {}
    }

    let len = word.chars().count();
    if len > 4 && word.ends_with("ly") {
        return Pos::Adv;
    }
    if word.ends_with("ed") && len > 4 {
        return Pos::Verb;
    }
    let adjective_suffix = ["ive", "ous", "ful", "able", "ible", "less", "ish"]
        .iter()
        .any(|s| word.ends_with(s))
        || (word.ends_with("al") && len > 5)
        || (word.ends_with("ic") && len > 4);
    if adjective_suffix {
        return Pos::Adj;
    }
    Pos::Noun
}

/// Base form of an inflected lexicon verb ("developing" -> "develop"),
/// together with the suffix that was stripped.
fn verb_stem(word: &str) -> Option<(&'static str, &'static str)> {
    for suffix in ["ing", "ed", "es", "s"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if let Some(v) = VERB_SET.get(stem) {
            return Some((*v, suffix));
        }
        // managing -> manag + e
        if suffix != "s" {
            let restored = format!("{stem}e");
            if let Some(v) = VERB_SET.get(restored.as_str()) {
                return Some((*v, suffix));
            }
        }
        // planned -> plan
        let mut chars = stem.chars();
        if let (Some(a), Some(b)) = (chars.next_back(), chars.next_back()) {
            if a == b {
                if let Some(v) = VERB_SET.get(&stem[..stem.len() - a.len_utf8()]) {
                    return Some((*v, suffix));
                }
            }
        }
    }
    None
}

fn is_plural_of_verb(word: &str) -> bool {
    matches!(verb_stem(word), Some((_, "s" | "es")))
}

/// Split text into sentences on line breaks and terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            let terminal = matches!(c, '.' | '!' | '?');
            if terminal && chars.peek().map_or(true, |n| n.is_whitespace()) {
                push_sentence(&mut sentences, &mut current);
            }
        }
        push_sentence(&mut sentences, &mut current);
    }
    sentences
}

fn push_sentence(out: &mut Vec<String>, buf: &mut String) {
    let s = buf.trim();
    if !s.is_empty() {
        out.push(s.to_string());
    }
    buf.clear();
}
