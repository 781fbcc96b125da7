//! The job posting record as published in the feed.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Remote,
    Hybrid,
    #[default]
    Onsite,
    #[serde(other)]
    Other,
}

impl LocationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "Onsite",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "hybrid" => Ok(Self::Hybrid),
            "onsite" | "on-site" => Ok(Self::Onsite),
            _ => Err(format!("Unknown location type '{}'. Use remote, hybrid or onsite.", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Iam,
    Security,
    Architect,
    Analyst,
    Consultant,
    #[default]
    #[serde(other)]
    Other,
}

impl JobType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Iam => "IAM",
            Self::Security => "Security",
            Self::Architect => "Architect",
            Self::Analyst => "Analyst",
            Self::Consultant => "Consultant",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iam" => Ok(Self::Iam),
            "security" => Ok(Self::Security),
            "architect" => Ok(Self::Architect),
            "analyst" => Ok(Self::Analyst),
            "consultant" => Ok(Self::Consultant),
            _ => Err(format!("Unknown job type '{}'.", s)),
        }
    }
}

/// Experience level. Ordered from junior to lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    #[default]
    Mid,
    Senior,
    Principal,
    Lead,
    #[serde(other)]
    Other,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid-Level",
            Self::Senior => "Senior",
            Self::Principal => "Principal",
            Self::Lead => "Lead/Manager",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "junior" => Ok(Self::Junior),
            "mid" => Ok(Self::Mid),
            "senior" => Ok(Self::Senior),
            "principal" => Ok(Self::Principal),
            "lead" => Ok(Self::Lead),
            _ => Err(format!("Unknown level '{}'.", s)),
        }
    }
}

/// Security clearance requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Clearance {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "secret")]
    Secret,
    #[serde(rename = "ts")]
    TopSecret,
    #[serde(rename = "ts-sci")]
    TsSci,
    #[serde(other, rename = "other")]
    Other,
}

impl Clearance {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Secret => "Secret",
            Self::TopSecret => "Top Secret",
            Self::TsSci => "TS/SCI",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Clearance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "secret" => Ok(Self::Secret),
            "ts" => Ok(Self::TopSecret),
            "ts-sci" | "ts/sci" => Ok(Self::TsSci),
            _ => Err(format!("Unknown clearance '{}'. Use none, secret, ts or ts-sci.", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaSponsorship {
    Available,
    NotAvailable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl VisaSponsorship {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Yes",
            Self::NotAvailable => "No",
            Self::Unknown => "?",
        }
    }
}

impl std::str::FromStr for VisaSponsorship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" | "yes" => Ok(Self::Available),
            "not_available" | "no" => Ok(Self::NotAvailable),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown visa sponsorship '{}'.", s)),
        }
    }
}

/// One job posting. Never mutated by the resolver or the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: LocationType,
    #[serde(default, rename = "type")]
    pub job_type: JobType,
    #[serde(default)]
    pub level: Level,
    /// `null` in the feed means no clearance.
    #[serde(default, deserialize_with = "nullable_clearance")]
    pub clearance: Clearance,
    #[serde(default)]
    pub visa_sponsorship: VisaSponsorship,
    #[serde(default)]
    pub posted: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn nullable_clearance<'de, D>(deserializer: D) -> Result<Clearance, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Clearance>::deserialize(deserializer)?.unwrap_or_default())
}

impl JobPosting {
    /// A posting with defaults for everything but the identifying fields.
    pub fn new(company: impl Into<String>, title: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            location: location.map(str::to_string),
            location_type: LocationType::default(),
            job_type: JobType::default(),
            level: Level::default(),
            clearance: Clearance::default(),
            visa_sponsorship: VisaSponsorship::default(),
            posted: None,
            url: String::new(),
            description: None,
        }
    }

    /// Posting date; accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
    pub fn posted_date(&self) -> Option<NaiveDate> {
        self.posted.as_deref().and_then(parse_date)
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.company, self.title)
    }
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Human label for how long ago a posting went up.
pub fn relative_age(posted: Option<NaiveDate>, today: NaiveDate) -> String {
    let date = match posted {
        Some(d) => d,
        None => return "N/A".into(),
    };
    let days = (today - date).num_days().abs();
    match days {
        0 => "Today".into(),
        1 => "Yesterday".into(),
        2..=6 => format!("{} days ago", days),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}
