//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of resolving one location string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "country", rename_all = "lowercase")]
pub enum CountryResult {
    /// Explicitly remote; excluded from per-country counts.
    Remote,
    /// A rule matched and named this country.
    Country(String),
    /// Nothing matched (or the input was empty); the table's default country.
    Default(String),
}

impl CountryResult {
    /// Canonical country name, or `None` for remote postings.
    pub fn country(&self) -> Option<&str> {
        match self {
            Self::Remote => None,
            Self::Country(name) | Self::Default(name) => Some(name),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}

impl fmt::Display for CountryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "Remote"),
            Self::Country(name) => write!(f, "{}", name),
            Self::Default(name) => write!(f, "{} (default)", name),
        }
    }
}

/// Which rule of the resolution chain produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "matched", rename_all = "snake_case")]
pub enum MatchedRule {
    Empty,
    RemoteKeyword,
    MultipleKeyword,
    RegionCode(String),
    CountryAlias(String),
    City(String),
    Fallback,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty location"),
            Self::RemoteKeyword => write!(f, "'remote' keyword"),
            Self::MultipleKeyword => write!(f, "'multiple' keyword"),
            Self::RegionCode(code) => write!(f, "region code {}", code),
            Self::CountryAlias(alias) => write!(f, "country alias '{}'", alias),
            Self::City(city) => write!(f, "city '{}'", city),
            Self::Fallback => write!(f, "no rule matched"),
        }
    }
}

/// A result together with the rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub input: Option<String>,
    pub result: CountryResult,
    pub rule: MatchedRule,
}

/// How tokens from the rule table are located inside a location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Raw substring containment ("Indiana" contains "India").
    #[default]
    Substring,
    /// Matches must start and end on a non-alphanumeric boundary.
    WordBoundary,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::WordBoundary => write!(f, "word-boundary"),
        }
    }
}

/// Errors raised while loading a rule table override.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("cannot read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rules JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("default_country must not be empty")]
    MissingDefaultCountry,
    #[error("region code '{code}' for {country} must be two uppercase ASCII letters")]
    InvalidRegionCode { country: String, code: String },
    #[error("empty {0} entry in rules table")]
    EmptyEntry(&'static str),
}
