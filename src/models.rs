use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkMode {
    Onsite,
    Hybrid,
    Remote,
}

impl WorkMode {
    pub const ALL: [WorkMode; 3] = [WorkMode::Onsite, WorkMode::Hybrid, WorkMode::Remote];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Onsite => "Onsite",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::Remote => "Remote",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::Mode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Experience {
    Fresher,
    #[serde(rename = "0-1 Years")]
    ZeroToOne,
    #[serde(rename = "1-3 Years")]
    OneToThree,
}

impl Experience {
    pub const ALL: [Experience; 3] = [
        Experience::Fresher,
        Experience::ZeroToOne,
        Experience::OneToThree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Fresher => "Fresher",
            Experience::ZeroToOne => "0-1 Years",
            Experience::OneToThree => "1-3 Years",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    LinkedIn,
    Naukri,
    Indeed,
    Instahyre,
    Hirist,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::LinkedIn,
        Source::Naukri,
        Source::Indeed,
        Source::Instahyre,
        Source::Hirist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::LinkedIn => "LinkedIn",
            Source::Naukri => "Naukri",
            Source::Indeed => "Indeed",
            Source::Instahyre => "Instahyre",
            Source::Hirist => "Hirist",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::Source(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub mode: WorkMode,
    pub experience: Experience,
    pub skills: Vec<String>,
    pub source: Source,
    pub posted_days_ago: u8,
    pub salary_range: String,
    pub apply_url: String,
    pub description: String,
    /// Derived from the current preferences; refreshed by `scoring::rescore_all`.
    #[serde(default)]
    pub match_score: u8,
}

pub const DEFAULT_MIN_MATCH_SCORE: u8 = 40;

/// User matching criteria. Every field falls back to its default when missing
/// from the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub role_keywords: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub preferred_mode: Vec<String>,
    /// Empty means any tier.
    pub experience_level: String,
    pub skills: Vec<String>,
    pub min_match_score: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            role_keywords: Vec::new(),
            preferred_locations: Vec::new(),
            preferred_mode: Vec::new(),
            experience_level: String::new(),
            skills: Vec::new(),
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
        }
    }
}

impl Preferences {
    /// True when the record carries a ranking signal at all.
    pub fn is_set(&self) -> bool {
        has_entries(&self.role_keywords) || has_entries(&self.preferred_locations)
    }
}

fn has_entries(list: &[String]) -> bool {
    list.iter().any(|s| !s.trim().is_empty())
}

/// Split a comma separated form field into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
