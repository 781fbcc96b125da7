//! Location rule table: subdivision codes, country aliases and the city table.
//!
//! The built-in table covers the job feed's population (mostly US postings
//! with a tail of UK, Canadian, European, Indian and APAC ones). A deployment
//! can replace it with a JSON file of the same shape.

use super::types::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

// ─── Built-in dataset ───────────────────────────────────────────

const USA: &str = "United States of America";
const UK: &str = "United Kingdom";

const DEFAULT_COUNTRY: &str = USA;

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

const CANADIAN_PROVINCES: &[&str] = &[
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

/// Checked in this order; the first list containing the code wins.
const BUILTIN_SUBDIVISIONS: &[(&str, &[&str])] = &[
    (USA, US_STATES),
    ("Canada", CANADIAN_PROVINCES),
];

/// Longer aliases precede the shorter ones they contain
/// ("Northern Ireland" before "Ireland", "U.S.A." before "U.S.").
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("United States of America", USA),
    ("United States", USA),
    ("U.S.A.", USA),
    ("USA", USA),
    ("U.S.", USA),
    ("New South Wales", "Australia"),
    ("New England", USA),
    ("United Kingdom", UK),
    ("Great Britain", UK),
    ("Northern Ireland", UK),
    ("England", UK),
    ("Scotland", UK),
    ("Wales", UK),
    ("U.K.", UK),
    ("UK", UK),
    ("Canada", "Canada"),
    ("Germany", "Germany"),
    ("France", "France"),
    ("Netherlands", "Netherlands"),
    ("Ireland", "Ireland"),
    ("Switzerland", "Switzerland"),
    ("Sweden", "Sweden"),
    ("Norway", "Norway"),
    ("Denmark", "Denmark"),
    ("Finland", "Finland"),
    ("Spain", "Spain"),
    ("Italy", "Italy"),
    ("India", "India"),
    ("China", "China"),
    ("Japan", "Japan"),
    ("Australia", "Australia"),
    ("Brazil", "Brazil"),
    ("Singapore", "Singapore"),
];

// Ambiguous names (Cambridge, Birmingham, Perth) resolve to the entry listed here.
const BUILTIN_CITIES: &[(&str, &str)] = &[
    ("New York", USA), ("Los Angeles", USA), ("Chicago", USA),
    ("Seattle", USA), ("San Francisco", USA), ("Boston", USA),
    ("Austin", USA), ("Denver", USA), ("Atlanta", USA),
    ("Washington", USA), ("Miami", USA), ("Dallas", USA),
    ("Houston", USA), ("Philadelphia", USA), ("Phoenix", USA),
    ("San Diego", USA), ("San Jose", USA), ("Portland", USA),
    ("Las Vegas", USA), ("Detroit", USA), ("Minneapolis", USA),
    ("Nashville", USA), ("Baltimore", USA), ("Pittsburgh", USA),
    ("Cleveland", USA), ("Cincinnati", USA), ("Tampa", USA),
    ("Raleigh", USA), ("Arlington", USA), ("McLean", USA),
    ("Redmond", USA), ("Mountain View", USA), ("Palo Alto", USA),
    ("Cambridge", USA), ("Malden", USA), ("Fort Worth", USA),
    ("Redondo Beach", USA), ("Bedford", USA), ("Indianapolis", USA),
    ("Ann Arbor", USA),
    ("London", UK), ("Manchester", UK), ("Edinburgh", UK), ("Birmingham", UK),
    ("Toronto", "Canada"), ("Vancouver", "Canada"), ("Montreal", "Canada"),
    ("Calgary", "Canada"), ("Ottawa", "Canada"),
    ("Sydney", "Australia"), ("Melbourne", "Australia"), ("Brisbane", "Australia"),
    ("Perth", "Australia"),
    ("Berlin", "Germany"), ("Munich", "Germany"), ("Frankfurt", "Germany"),
    ("Hamburg", "Germany"),
    ("Paris", "France"), ("Lyon", "France"),
    ("Amsterdam", "Netherlands"),
    ("Mumbai", "India"), ("Bangalore", "India"), ("Hyderabad", "India"),
    ("Delhi", "India"), ("Pune", "India"),
];

// ─── Rule table ─────────────────────────────────────────────────

/// Administrative subdivision codes belonging to one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionList {
    pub country: String,
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityEntry {
    pub city: String,
    pub country: String,
}

/// Immutable lookup data consumed by the resolver.
///
/// Every list is ordered: resolution is first-match-wins, so table order is
/// part of the table's meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRuleTable {
    default_country: String,
    #[serde(default)]
    subdivisions: Vec<SubdivisionList>,
    #[serde(default)]
    country_aliases: Vec<AliasEntry>,
    #[serde(default)]
    cities: Vec<CityEntry>,
}

impl LocationRuleTable {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self {
            default_country: DEFAULT_COUNTRY.to_string(),
            subdivisions: BUILTIN_SUBDIVISIONS
                .iter()
                .map(|(country, codes)| SubdivisionList {
                    country: country.to_string(),
                    codes: codes.iter().map(|c| c.to_string()).collect(),
                })
                .collect(),
            country_aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, country)| AliasEntry {
                    alias: alias.to_string(),
                    country: country.to_string(),
                })
                .collect(),
            cities: BUILTIN_CITIES
                .iter()
                .map(|(city, country)| CityEntry {
                    city: city.to_string(),
                    country: country.to_string(),
                })
                .collect(),
        }
    }

    /// Parse and validate a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, RulesError> {
        let data = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Explicit path if given, else `~/.jobmap/rules.json` if it exists,
    /// else the built-in table.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, RulesError> {
        if let Some(p) = path {
            return Self::load_from(p);
        }
        let default = Self::default_path();
        if default.is_file() {
            return Self::load_from(&default);
        }
        Ok(Self::builtin())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".jobmap")
            .join("rules.json")
    }

    fn validate(&self) -> Result<(), RulesError> {
        if self.default_country.trim().is_empty() {
            return Err(RulesError::MissingDefaultCountry);
        }
        for list in &self.subdivisions {
            if list.country.trim().is_empty() {
                return Err(RulesError::EmptyEntry("subdivision country"));
            }
            for code in &list.codes {
                let valid = code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase());
                if !valid {
                    return Err(RulesError::InvalidRegionCode {
                        country: list.country.clone(),
                        code: code.clone(),
                    });
                }
            }
        }
        if self
            .country_aliases
            .iter()
            .any(|e| e.alias.is_empty() || e.country.trim().is_empty())
        {
            return Err(RulesError::EmptyEntry("country alias"));
        }
        if self
            .cities
            .iter()
            .any(|e| e.city.is_empty() || e.country.trim().is_empty())
        {
            return Err(RulesError::EmptyEntry("city"));
        }
        Ok(())
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    pub fn subdivisions(&self) -> &[SubdivisionList] {
        &self.subdivisions
    }

    pub fn country_aliases(&self) -> &[AliasEntry] {
        &self.country_aliases
    }

    pub fn cities(&self) -> &[CityEntry] {
        &self.cities
    }

    /// Every canonical country name the table can produce, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let mut set = BTreeSet::new();
        set.insert(self.default_country.as_str());
        set.extend(self.subdivisions.iter().map(|s| s.country.as_str()));
        set.extend(self.country_aliases.iter().map(|a| a.country.as_str()));
        set.extend(self.cities.iter().map(|c| c.country.as_str()));
        set.into_iter().collect()
    }
}

impl Default for LocationRuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
