use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::Result;

/// All cached profiles, keyed by tag (`Name-Digits`, case-sensitive)
pub type ProfileCache = BTreeMap<String, ProfileEntry>;

/// Outcome of scraping a page.
///
/// A failed fetch is kept as `{"error": "..."}` so it can be cached and
/// inspected later instead of being raised.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scraped<T> {
    Failed { error: String },
    Parsed(T),
}

impl<T> Scraped<T> {
    pub fn failed<S: Into<String>>(error: S) -> Self {
        Scraped::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Scraped::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Scraped::Failed { error } => Some(error),
            Scraped::Parsed(_) => None,
        }
    }

    pub fn parsed(&self) -> Option<&T> {
        match self {
            Scraped::Parsed(value) => Some(value),
            Scraped::Failed { .. } => None,
        }
    }

    /// Apply a fallible conversion to a parsed value,
    /// a failure marker is passed through untouched.
    pub fn try_map<U>(
        self,
        op: impl FnOnce(T) -> Result<U>,
    ) -> Result<Scraped<U>> {
        match self {
            Scraped::Parsed(value) => Ok(Scraped::Parsed(op(value)?)),
            Scraped::Failed { error } => Ok(Scraped::Failed { error }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileEntry {
    pub career: Scraped<CareerData>,
    #[serde(default)]
    pub heroes: BTreeMap<String, Scraped<HeroSummary>>,
}

impl ProfileEntry {
    pub fn new(career: Scraped<CareerData>) -> Self {
        Self {
            career,
            heroes: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CareerData {
    pub kills: Kills,
    pub played: BTreeMap<String, TimeDistribution>,
    pub heroes: BTreeMap<String, HeroPortrait>,
    pub progress: ProgressTracks,
    pub artisans: BTreeMap<String, ArtisanLevels>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Kills {
    pub lifetime: u64,
    pub elites: u64,
}

/// Share of play time and best results for one hero class
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeDistribution {
    pub time_percent: u8,
    pub max_level: u32,
    pub max_difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeroPortrait {
    pub id: String,
    pub name: String,
    pub skill: String,
    pub level: u32,
    pub class: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = crate::ArmoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(crate::ArmoryError::invalid("gender", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressTracks {
    pub normal: Progress,
    pub hardcore: Progress,
}

/// Furthest point reached on one difficulty track
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Progress {
    pub difficulty: String,
    pub act: String,
    pub hero: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArtisanLevels {
    pub normal: u32,
    pub hardcore: u32,
}

/// Data scraped from a single hero page.
// TODO: extract skills, items and stats once hero page samples are collected
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeroSummary {
    pub id: String,
    pub title: Option<String>,
}
