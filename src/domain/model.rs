use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw page body as returned by the fetcher. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub url: String,
    pub body: String,
}

/// Page text with markup, entities and redundant whitespace removed.
///
/// Only `core::normalizer::normalize` constructs this type, so holding one
/// guarantees: no tags, no runs of whitespace, no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(pub(crate) String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub role: String,
    pub description: String,
    /// Lower-cased, deduplicated, in first-seen order.
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub skills: Vec<String>,
    pub link: String,
}

impl PortfolioEntry {
    /// Lower-cases and deduplicates the skill tags, keeping first-seen order.
    pub fn new<I, S>(skills: I, link: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            skills: dedup_skills(skills),
            link: link.into(),
        }
    }
}

/// Read-only set of past projects, in the order they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

impl Portfolio {
    pub fn new(entries: Vec<PortfolioEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trims and lower-cases each skill, dropping blanks and repeats.
pub fn dedup_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Portfolio links ranked by skill overlap, best first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchedLinks(pub Vec<String>);

impl MatchedLinks {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a MatchedLinks {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColdEmail {
    pub role: String,
    pub body: String,
}

impl fmt::Display for ColdEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
