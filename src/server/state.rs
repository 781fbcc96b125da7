use crate::jobs::{FeedStats, JobFeed};
use crate::location::{aggregate, CountryCounts, LocationResolver};

/// Everything the handlers read. Built once; never mutated while serving.
pub struct AppState {
    pub resolver: LocationResolver,
    pub feed: JobFeed,
    pub counts: CountryCounts,
    pub stats: FeedStats,
}

impl AppState {
    pub fn new(resolver: LocationResolver, feed: JobFeed) -> Self {
        let counts = aggregate(&resolver, &feed.jobs);
        let stats = FeedStats::compute(&resolver, &feed.jobs);
        Self { resolver, feed, counts, stats }
    }
}
