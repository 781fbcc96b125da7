//! The job feed: posting records, loading, filtering and headline stats.

pub mod feed;
pub mod posting;
pub mod query;
pub mod stats;

pub use feed::{FeedError, JobFeed};
pub use posting::{relative_age, Clearance, JobPosting, JobType, Level, LocationType, VisaSponsorship};
pub use query::{select_jobs, sort_jobs, JobFilter, SortDirection, SortKey};
pub use stats::FeedStats;
