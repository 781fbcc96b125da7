//! jobmap: country resolution and aggregation for a static job-listing feed.

pub mod jobs;
pub mod location;
pub mod server;
