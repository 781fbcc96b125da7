//! Per-country aggregation of job postings.
//!
//! Every posting lands in exactly one bucket: a country, or the remote
//! total. `sum(counts) + remote == jobs.len()` always holds because
//! resolution is total.

use super::resolver::LocationResolver;
use super::types::CountryResult;
use crate::jobs::{JobPosting, LocationType};
use serde::Serialize;
use std::collections::HashMap;

/// Choropleth bucket for a country's job count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityTier {
    Empty,
    Low,
    Medium,
    High,
}

impl DensityTier {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Empty,
            1..=4 => Self::Low,
            5..=9 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn fill_color(self) -> &'static str {
        match self {
            Self::Empty => "#ecf0f1",
            Self::Low => "#3498db",
            Self::Medium => "#f39c12",
            Self::High => "#27ae60",
        }
    }
}

/// One row of the per-country breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub count: usize,
    /// Fraction of all postings (remote included), 0.0 when there are none.
    pub share: f64,
    pub tier: DensityTier,
    pub fill_color: &'static str,
}

/// Job counts keyed by canonical country name, plus the remote total.
///
/// Fallback results are counted under the default country's name; how many
/// of them there were is kept in `defaulted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryCounts {
    counts: HashMap<String, usize>,
    remote: usize,
    defaulted: usize,
}

impl CountryCounts {
    pub fn get(&self, country: &str) -> usize {
        self.counts.get(country).copied().unwrap_or(0)
    }

    pub fn remote(&self) -> usize {
        self.remote
    }

    /// Postings that no rule placed and were assigned the default country.
    pub fn defaulted(&self) -> usize {
        self.defaulted
    }

    /// Number of distinct countries with at least one posting.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Postings counted against a country.
    pub fn located(&self) -> usize {
        self.counts.values().sum()
    }

    /// Every posting seen, remote included.
    pub fn total(&self) -> usize {
        self.located() + self.remote
    }

    pub fn as_map(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    /// Countries ordered by count (descending), then name.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub fn summaries(&self) -> Vec<CountrySummary> {
        let total = self.total();
        self.sorted()
            .into_iter()
            .map(|(country, count)| {
                let tier = DensityTier::from_count(count);
                CountrySummary {
                    country: country.to_string(),
                    count,
                    share: if total == 0 { 0.0 } else { count as f64 / total as f64 },
                    tier,
                    fill_color: tier.fill_color(),
                }
            })
            .collect()
    }

    fn record(&mut self, result: &CountryResult) {
        match result {
            CountryResult::Remote => self.remote += 1,
            CountryResult::Country(name) => *self.counts.entry(name.clone()).or_insert(0) += 1,
            CountryResult::Default(name) => {
                self.defaulted += 1;
                *self.counts.entry(name.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Bucket postings by resolved country.
pub fn aggregate<'a, I>(resolver: &LocationResolver, jobs: I) -> CountryCounts
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    let mut counts = CountryCounts::default();
    for job in jobs {
        counts.record(&resolver.resolve_job(job));
    }
    counts
}

/// Postings whose location resolves to `country`. Remote postings never match.
pub fn jobs_in_country<'a>(
    resolver: &LocationResolver,
    jobs: &'a [JobPosting],
    country: &str,
) -> Vec<&'a JobPosting> {
    jobs.iter()
        .filter(|job| resolver.resolve_job(job).country() == Some(country))
        .collect()
}

/// Postings whose declared location type is remote.
///
/// Distinct from the resolver's remote sentinel: a posting typed `remote`
/// may carry a plain city as its location string.
pub fn remote_jobs(jobs: &[JobPosting]) -> Vec<&JobPosting> {
    jobs.iter()
        .filter(|job| job.location_type == LocationType::Remote)
        .collect()
}
