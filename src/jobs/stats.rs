//! Headline numbers for the feed.

use super::posting::{JobPosting, LocationType};
use crate::location::LocationResolver;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub total_jobs: usize,
    /// Postings typed `remote` (not the resolver's remote sentinel).
    pub remote_jobs: usize,
    pub companies: usize,
    /// Distinct non-remote resolved countries.
    pub countries: usize,
    /// Distinct raw location strings.
    pub locations: usize,
}

impl FeedStats {
    pub fn compute(resolver: &LocationResolver, jobs: &[JobPosting]) -> Self {
        let companies: HashSet<&str> = jobs.iter().map(|j| j.company.as_str()).collect();
        let locations: HashSet<Option<&str>> = jobs.iter().map(|j| j.location.as_deref()).collect();
        let countries: HashSet<String> = jobs
            .iter()
            .filter_map(|j| resolver.resolve_job(j).country().map(str::to_string))
            .collect();

        Self {
            total_jobs: jobs.len(),
            remote_jobs: jobs
                .iter()
                .filter(|j| j.location_type == LocationType::Remote)
                .count(),
            companies: companies.len(),
            countries: countries.len(),
            locations: locations.len(),
        }
    }
}
