//! Filtering and ordering of postings for the table view.

use super::posting::{parse_date, Clearance, JobPosting, JobType, Level, LocationType, VisaSponsorship};
use crate::location::{jobs_in_country, remote_jobs, LocationResolver};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Conjunction of optional criteria. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive substring over title, company and description.
    pub search: Option<String>,
    pub job_type: Option<JobType>,
    pub level: Option<Level>,
    pub location_type: Option<LocationType>,
    pub clearance: Option<Clearance>,
    pub visa: Option<VisaSponsorship>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = job.title.to_lowercase().contains(&term)
                || job.company.to_lowercase().contains(&term)
                || job
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        self.job_type.map_or(true, |t| job.job_type == t)
            && self.level.map_or(true, |l| job.level == l)
            && self.location_type.map_or(true, |t| job.location_type == t)
            && self.clearance.map_or(true, |c| job.clearance == c)
            && self.visa.map_or(true, |v| job.visa_sponsorship == v)
    }

    pub fn apply<'a, I>(&self, jobs: I) -> Vec<&'a JobPosting>
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Company,
    Title,
    Location,
    LocationType,
    Level,
    Clearance,
    #[default]
    Posted,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(Self::Company),
            "title" => Ok(Self::Title),
            "location" => Ok(Self::Location),
            "locationType" | "location-type" => Ok(Self::LocationType),
            "level" => Ok(Self::Level),
            "clearance" => Ok(Self::Clearance),
            "posted" => Ok(Self::Posted),
            _ => Err(format!(
                "Unknown sort key '{}'. Use company, title, location, locationType, level, clearance or posted.",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort direction '{}'. Use 'asc' or 'desc'.", s)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Stable sort. Text columns compare case-insensitively; `posted` compares
/// as a date with unparseable dates first when ascending.
pub fn sort_jobs(jobs: &mut [&JobPosting], key: SortKey, direction: SortDirection) {
    jobs.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// The listing for one country view: select by country, filter, then sort.
///
/// `None` or a blank country keeps every posting. "Remote" in any case
/// selects remote-typed postings; anything else is a canonical country name.
pub fn select_jobs<'a>(
    resolver: &LocationResolver,
    jobs: &'a [JobPosting],
    country: Option<&str>,
    filter: &JobFilter,
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a JobPosting> {
    let selected = match country.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) if c.eq_ignore_ascii_case("remote") => remote_jobs(jobs),
        Some(c) => jobs_in_country(resolver, jobs, c),
        None => jobs.iter().collect(),
    };
    let mut matched = filter.apply(selected);
    sort_jobs(&mut matched, key, direction);
    matched
}

fn compare(a: &JobPosting, b: &JobPosting, key: SortKey) -> Ordering {
    fn text(s: &str) -> String {
        s.to_lowercase()
    }
    match key {
        SortKey::Company => text(&a.company).cmp(&text(&b.company)),
        SortKey::Title => text(&a.title).cmp(&text(&b.title)),
        SortKey::Location => text(a.location.as_deref().unwrap_or(""))
            .cmp(&text(b.location.as_deref().unwrap_or(""))),
        SortKey::LocationType => a.location_type.label().cmp(b.location_type.label()),
        SortKey::Level => a.level.cmp(&b.level),
        SortKey::Clearance => a.clearance.cmp(&b.clearance),
        SortKey::Posted => {
            let da = a.posted.as_deref().and_then(parse_date);
            let db = b.posted.as_deref().and_then(parse_date);
            da.cmp(&db)
        }
    }
}
