use super::tagger::Pos;

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("analyses", "analysis"),
    ("criteria", "criterion"),
    ("indices", "index"),
    ("diagnoses", "diagnosis"),
    ("theses", "thesis"),
    ("hypotheses", "hypothesis"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("lives", "life"),
    ("wives", "wife"),
    ("leaves", "leave"),
];

/// Endings of words that already are their own singular.
const INVARIANT_ENDINGS: &[&str] = &["ss", "us", "is", "ics", "ous", "ness"];

/// Dictionary form of `word`. Only nouns are inflected back; other tags are
/// returned unchanged.
pub fn lemmatize(word: &str, pos: Pos) -> String {
    if pos != Pos::Noun {
        return word.to_string();
    }
    if let Some((_, lemma)) = IRREGULAR_NOUNS.iter().find(|(plural, _)| *plural == word) {
        return lemma.to_string();
    }
    if word.chars().count() <= 3 || INVARIANT_ENDINGS.iter().any(|e| word.ends_with(e)) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for sibilant in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(sibilant) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
