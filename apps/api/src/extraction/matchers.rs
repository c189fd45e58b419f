//! Field matchers: heuristic, rule-based extractors over normalized resume text.
//!
//! Each matcher is a pure function from text to an ordered list of values. An
//! unmatched field yields an empty list, never an error. Matchers are
//! independent of each other and registered in a `MatcherSet`, which runs them
//! all and hands their outputs to the grouper.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::config::MatcherConfig;
use crate::extraction::grouper::{group_entities, EntityGroup, FieldLabel};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Common signature for all field extractors.
pub trait FieldMatcher: Send + Sync {
    fn label(&self) -> FieldLabel;
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Case-insensitive matcher for a configured literal, returning the text as it
/// appears in the document.
fn literal_matcher(literal: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(literal.trim()))
        .case_insensitive(true)
        .build()
}

fn contains_any(haystack_upper: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack_upper.contains(kw))
}

// ────────────────────────────────────────────────────────────────────────────
// Name
// ────────────────────────────────────────────────────────────────────────────

/// Section headers, dates and role words that often sit above the candidate's name.
const NAME_DENYLIST: &[&str] = &[
    "SKILLS",
    "EDUCATION",
    "PROJECTS",
    "SUMMARY",
    "EXPERIENCE",
    "PRESENT",
    "2020",
    "2021",
    "2022",
    "2023",
    "2024",
    "2025",
    "CGPA",
    "SEMESTER",
    "COMMITTEE",
    "INTERNSHIP",
    "STUDENT",
];

const MAX_NAME_CHARS: usize = 50;

/// Returns the configured candidate name if present, otherwise the first
/// substantive line of the document.
pub struct NameMatcher {
    known_name: Option<Regex>,
}

impl NameMatcher {
    pub fn new(known_name: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            known_name: known_name.map(literal_matcher).transpose()?,
        })
    }
}

impl FieldMatcher for NameMatcher {
    fn label(&self) -> FieldLabel {
        FieldLabel::Name
    }

    fn extract(&self, text: &str) -> Vec<String> {
        if let Some(m) = self.known_name.as_ref().and_then(|re| re.find(text)) {
            return vec![m.as_str().to_string()];
        }

        text.lines()
            .map(str::trim)
            .find(|line| is_name_candidate(line))
            .map(|line| vec![line.to_string()])
            .unwrap_or_default()
    }
}

fn is_name_candidate(line: &str) -> bool {
    !line.is_empty()
        && !line.contains('@')
        && !line.contains("http")
        && line.chars().count() <= MAX_NAME_CHARS
        && !contains_any(&line.to_uppercase(), NAME_DENYLIST)
}

// ────────────────────────────────────────────────────────────────────────────
// Email
// ────────────────────────────────────────────────────────────────────────────

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap());

/// Every `local@domain.tld` shaped token, in order, duplicates included.
pub struct EmailMatcher;

impl FieldMatcher for EmailMatcher {
    fn label(&self) -> FieldLabel {
        FieldLabel::Email
    }

    fn extract(&self, text: &str) -> Vec<String> {
        EMAIL_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// College
// ────────────────────────────────────────────────────────────────────────────

static EDUCATION_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)EDUCATION(.*?)(?:PROJECTS|TECHNICAL SKILLS|EXPERIENCE)").unwrap()
});

static INSTITUTION_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i).*(?:College of Engineering|University|Institute of Technology).*").unwrap()
});

/// Returns the configured institution if present, otherwise every
/// institution-looking line inside the EDUCATION section.
pub struct CollegeMatcher {
    known_institution: Option<Regex>,
}

impl CollegeMatcher {
    pub fn new(known_institution: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            known_institution: known_institution.map(literal_matcher).transpose()?,
        })
    }
}

impl FieldMatcher for CollegeMatcher {
    fn label(&self) -> FieldLabel {
        FieldLabel::CollegeName
    }

    fn extract(&self, text: &str) -> Vec<String> {
        if let Some(m) = self.known_institution.as_ref().and_then(|re| re.find(text)) {
            return vec![m.as_str().to_string()];
        }

        let Some(section) = EDUCATION_SECTION_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
        else {
            return Vec::new();
        };

        INSTITUTION_LINE_RE
            .find_iter(section.as_str())
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Technical skills
// ────────────────────────────────────────────────────────────────────────────

/// A line exactly equal to one of these closes the skills section.
const SECTION_HEADERS: &[&str] = &[
    "PROJECTS",
    "EDUCATION",
    "EXPERIENCE",
    "PUBLICATIONS",
    "INTERNSHIPS",
    "CERTIFICATIONS",
];

/// Institution, committee/role and section words that leak into skills lists.
const SKILL_DENYLIST: &[&str] = &[
    "CGPA",
    "SEMESTER",
    "COMMITTEE",
    "SECRETARY",
    "PARTICIPATION",
    "PROJECTS",
    "EDUCATION",
    "EXPERIENCE",
    "INTERNSHIP",
    "SOCIAL WORK",
    "MARKETING",
    "EDITORIAL",
    "MEMBER",
    "CONTACT",
    "COLLEGE",
];

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•*-]\s*").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b20\d{2}\b").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.-]+$").unwrap());

/// Collects de-noised, deduplicated items from the skills section.
pub struct SkillsMatcher {
    /// Upper-cased; built-ins first, then configured extras.
    denylist: Vec<String>,
}

impl SkillsMatcher {
    pub fn new(extra_denylist: &[String], known_institution: Option<&str>) -> Self {
        let denylist = SKILL_DENYLIST
            .iter()
            .map(|kw| kw.to_string())
            .chain(extra_denylist.iter().map(|kw| kw.trim().to_uppercase()))
            .chain(known_institution.map(|name| name.trim().to_uppercase()))
            .filter(|kw| !kw.is_empty())
            .collect();
        Self { denylist }
    }

    fn is_noise(&self, item: &str) -> bool {
        let upper = item.to_uppercase();
        self.denylist.iter().any(|kw| upper.contains(kw.as_str()))
            || YEAR_RE.is_match(item)
            || NUMERIC_RE.is_match(item)
    }

    /// Applies the noise filter and removes duplicates, keeping first occurrences.
    pub fn refine<I, S>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .map(Into::into)
            .filter(|item| !self.is_noise(item))
            .filter(|item| seen.insert(item.clone()))
            .collect()
    }
}

impl FieldMatcher for SkillsMatcher {
    fn label(&self) -> FieldLabel {
        FieldLabel::TechnicalSkills
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let Some(section) = skills_section(text) else {
            return Vec::new();
        };
        self.refine(section.into_iter().flat_map(split_candidates))
    }
}

/// Header line: ends with "SKILLS", ignoring case, trailing whitespace and a trailing colon.
fn is_skills_header(line: &str) -> bool {
    line.trim()
        .trim_end_matches(':')
        .trim_end()
        .to_uppercase()
        .ends_with("SKILLS")
}

fn is_section_header(line: &str) -> bool {
    let upper = line.trim().to_uppercase();
    SECTION_HEADERS.contains(&upper.as_str())
}

/// Lines between the first skills header and the next blank line or section header.
///
/// The closing line must carry its own line break; a section that runs into
/// end of text is not a section.
fn skills_section(text: &str) -> Option<Vec<&str>> {
    let mut lines = text.split_inclusive('\n');
    lines.by_ref().find(|line| is_skills_header(line))?;

    let mut section = Vec::new();
    for raw in lines {
        let terminated = raw.ends_with('\n');
        let line = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if line.trim().is_empty() {
            if section.is_empty() {
                continue;
            }
            return terminated.then_some(section);
        }
        if is_section_header(line) {
            return terminated.then_some(section);
        }
        section.push(line);
    }
    None
}

/// Strips a leading bullet and splits comma-separated lines into items.
fn split_candidates(line: &str) -> Vec<String> {
    let line = BULLET_RE.replace(line.trim(), "");
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    if line.contains(',') {
        line.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    } else {
        vec![line.to_string()]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// The registered set of matchers run against every document.
pub struct MatcherSet {
    matchers: Vec<Box<dyn FieldMatcher>>,
}

impl MatcherSet {
    pub fn new(matchers: Vec<Box<dyn FieldMatcher>>) -> Self {
        Self { matchers }
    }

    /// Name, email, college and skills matchers wired from configuration.
    pub fn from_config(config: &MatcherConfig) -> Result<Self, regex::Error> {
        let institution = config.known_institution.as_deref();
        Ok(Self::new(vec![
            Box::new(NameMatcher::new(config.known_candidate_name.as_deref())?),
            Box::new(EmailMatcher),
            Box::new(CollegeMatcher::new(institution)?),
            Box::new(SkillsMatcher::new(&config.skill_denylist_extra, institution)),
        ]))
    }

    pub fn labels(&self) -> Vec<FieldLabel> {
        self.matchers.iter().map(|m| m.label()).collect()
    }

    /// Runs every matcher over the text and groups the non-empty outputs.
    pub fn run(&self, text: &str) -> EntityGroup {
        group_entities(
            self.matchers
                .iter()
                .map(|matcher| (matcher.label(), matcher.extract(text))),
        )
    }
}
