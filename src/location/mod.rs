//! Location intelligence for the job feed.
//!
//! Resolves free-form location strings ("Austin, TX", "London", "Remote")
//! to canonical country names and aggregates postings per country for the
//! map view.

pub mod aggregate;
pub mod resolver;
pub mod rules;
pub mod types;

pub use aggregate::{aggregate, jobs_in_country, remote_jobs, CountryCounts, CountrySummary, DensityTier};
pub use resolver::LocationResolver;
pub use rules::LocationRuleTable;
pub use types::{CountryResult, MatchMode, MatchedRule, Resolution, RulesError};
