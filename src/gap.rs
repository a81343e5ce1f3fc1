use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::vocab::{CERTIFICATIONS, SOFT_SKILLS, TECHNICAL_SKILLS};

/// Fewer recognised skills than this usually means the text came out garbled.
const MIN_RESUME_SKILLS: usize = 3;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Plain text of a resume: PDF and DOCX are parsed, anything else is read as UTF-8.
pub fn resume_text(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract text from {}", path.display())),
        "docx" => docx_text(path),
        _ => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn docx_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a DOCX archive", path.display()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .with_context(|| format!("{} has no word/document.xml", path.display()))?
        .read_to_string(&mut xml)?;
    document_xml_text(&xml)
}

/// One line per `w:p` paragraph of a WordprocessingML body.
fn document_xml_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event().context("Malformed document.xml")? {
            Event::Text(e) => current.push_str(&e.unescape()?),
            Event::Empty(e) if matches!(e.name().as_ref(), b"w:tab" | b"w:br") => {
                current.push(' ')
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                let line = current.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                current.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkillKind {
    Technical(&'static str),
    Soft,
    Certification,
}

struct SkillMatcher {
    kind: SkillKind,
    skill: &'static str,
    re: Regex,
}

/// Whole-term matchers. `\b` does not work around skills like "c++", so the
/// neighbours just have to be non-word characters.
static SKILL_MATCHERS: LazyLock<Vec<SkillMatcher>> = LazyLock::new(|| {
    let technical = TECHNICAL_SKILLS
        .iter()
        .flat_map(|&(area, skills)| skills.iter().map(move |s| (SkillKind::Technical(area), *s)));
    let soft = SOFT_SKILLS.iter().map(|s| (SkillKind::Soft, *s));
    let certs = CERTIFICATIONS.iter().map(|s| (SkillKind::Certification, *s));

    technical
        .chain(soft)
        .chain(certs)
        .map(|(kind, skill)| SkillMatcher {
            kind,
            skill,
            re: Regex::new(&format!(r"(?:^|\W){}(?:\W|$)", regex::escape(skill))).unwrap(),
        })
        .collect()
});

/// A technical skill and the area it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalSkill {
    pub area: &'static str,
    pub skill: &'static str,
}

/// Known skills found in a resume, by category, in taxonomy order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeSkills {
    pub technical: Vec<TechnicalSkill>,
    pub soft: Vec<&'static str>,
    pub certifications: Vec<&'static str>,
}

impl ResumeSkills {
    pub fn len(&self) -> usize {
        self.technical.len() + self.soft.len() + self.certifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Match the resume against the technical, soft-skill and certification lists.
pub fn extract_resume_skills(text: &str) -> ResumeSkills {
    let text = text.to_lowercase();
    let mut found = ResumeSkills::default();

    for m in SKILL_MATCHERS.iter().filter(|m| m.re.is_match(&text)) {
        match m.kind {
            SkillKind::Technical(area) => found.technical.push(TechnicalSkill {
                area,
                skill: m.skill,
            }),
            SkillKind::Soft => found.soft.push(m.skill),
            SkillKind::Certification => found.certifications.push(m.skill),
        }
    }

    if found.len() < MIN_RESUME_SKILLS {
        warn!("Only {} known skills found in resume", found.len());
    }
    found
}

/// Every lowercased word in the resume counts as a possible skill.
pub fn resume_words(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Skills each job asks for that the resume never mentions.
/// Every job is reported, including those with nothing missing.
pub fn skill_gap(
    job_skills: &BTreeMap<String, BTreeSet<String>>,
    resume: &HashSet<String>,
) -> BTreeMap<String, Vec<String>> {
    job_skills
        .iter()
        .map(|(url, skills)| {
            let missing = skills
                .iter()
                .filter(|s| !resume.contains(s.as_str()))
                .cloned()
                .collect();
            (url.clone(), missing)
        })
        .collect()
}
