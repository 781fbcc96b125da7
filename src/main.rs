use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use jobmap::jobs::{relative_age, select_jobs, Clearance, FeedStats, JobFeed, JobFilter, JobType, Level, LocationType, SortDirection, SortKey};
use jobmap::location::{aggregate, LocationResolver, LocationRuleTable, MatchMode};
use std::path::PathBuf;

/// jobmap: resolve job locations to countries and browse a job feed by country
///
/// Examples:
///   jobmap "Austin, TX"
///   jobmap --strict "Indianapolis, Indiana"
///   jobmap --jobs data/jobs.json
///   jobmap --jobs data/jobs.json --country "United Kingdom" --sort company
///   jobmap --jobs https://example.org/data/jobs.json --serve --port 8080
#[derive(Parser)]
#[command(name = "jobmap", version, about, long_about = None)]
struct Cli {
    /// Location string to resolve. Example: jobmap "London, UK"
    #[arg(index = 1)]
    location: Option<String>,

    /// Jobs feed: a file path or an http(s) URL.
    #[arg(long, short = 'j')]
    jobs: Option<String>,

    /// List postings in this country ("Remote" for remote-typed postings).
    #[arg(long, short = 'c')]
    country: Option<String>,

    /// Case-insensitive search over title, company and description.
    #[arg(long, short = 's')]
    search: Option<String>,

    /// Job type filter (iam, security, architect, analyst, consultant).
    #[arg(long = "type")]
    job_type: Option<JobType>,

    /// Level filter (junior, mid, senior, principal, lead).
    #[arg(long)]
    level: Option<Level>,

    /// Location type filter (remote, hybrid, onsite).
    #[arg(long)]
    location_type: Option<LocationType>,

    /// Clearance filter (none, secret, ts, ts-sci).
    #[arg(long)]
    clearance: Option<Clearance>,

    /// Sort column for listings.
    #[arg(long, default_value = "posted")]
    sort: SortKey,

    /// Sort ascending instead of newest/highest first.
    #[arg(long)]
    asc: bool,

    /// Require word boundaries around region codes, aliases and cities.
    #[arg(long)]
    strict: bool,

    /// Rule table override (JSON). Defaults to ~/.jobmap/rules.json when present.
    #[arg(long, env = "JOBMAP_RULES")]
    rules: Option<PathBuf>,

    /// Serve the JSON API instead of printing.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Debug-level logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // ── Build resolver ──────────────────────────────────────────

    let rules = LocationRuleTable::load_or_builtin(cli.rules.as_deref())
        .context("failed to load location rules")?;
    let mode = if cli.strict { MatchMode::WordBoundary } else { MatchMode::Substring };
    let resolver = LocationResolver::with_rules(rules).with_mode(mode);
    tracing::debug!(
        "resolver ready: default={} mode={} cities={}",
        resolver.rules().default_country(),
        resolver.mode(),
        resolver.rules().cities().len(),
    );

    // ── Single location ─────────────────────────────────────────

    if let Some(ref location) = cli.location {
        let resolution = resolver.resolve_detailed(Some(location));
        eprintln!("  {} -> {} ({})", location, resolution.result, resolution.rule);
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    // ── Feed ────────────────────────────────────────────────────

    let source = match cli.jobs {
        Some(ref s) => s.clone(),
        None => bail!("nothing to do: pass a location string or --jobs <PATH|URL>"),
    };
    let feed = JobFeed::load(&source).with_context(|| format!("jobs data unavailable from {}", source))?;
    tracing::info!("loaded {} jobs from {}", feed.len(), source);

    if cli.serve {
        jobmap::server::start(&cli.host, cli.port, jobmap::server::AppState::new(resolver, feed))
            .await
            .with_context(|| format!("server error on {}:{}", cli.host, cli.port))?;
        return Ok(());
    }

    match cli.country.as_deref() {
        Some(country) => print_listing(&cli, &resolver, &feed, country)?,
        None => print_summary(&resolver, &feed)?,
    }
    Ok(())
}

fn print_summary(resolver: &LocationResolver, feed: &JobFeed) -> anyhow::Result<()> {
    let counts = aggregate(resolver, &feed.jobs);
    let stats = FeedStats::compute(resolver, &feed.jobs);

    eprintln!("  {:<32} {:>6}", "Country", "Jobs");
    eprintln!("  {}", "─".repeat(39));
    for (country, count) in counts.sorted() {
        eprintln!("  {:<32} {:>6}", country, count);
    }
    eprintln!("  {:<32} {:>6}", "Remote", counts.remote());
    if let Some(ts) = feed.last_updated() {
        eprintln!("  Last update: {}", ts.format("%Y-%m-%d %H:%M UTC"));
    }

    let out = serde_json::json!({
        "stats": stats,
        "countries": counts.summaries(),
        "remote": counts.remote(),
        "defaulted": counts.defaulted(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_listing(cli: &Cli, resolver: &LocationResolver, feed: &JobFeed, country: &str) -> anyhow::Result<()> {
    let filter = JobFilter {
        search: cli.search.clone(),
        job_type: cli.job_type,
        level: cli.level,
        location_type: cli.location_type,
        clearance: cli.clearance,
        visa: None,
    };
    let direction = if cli.asc { SortDirection::Asc } else { SortDirection::Desc };
    let matched = select_jobs(resolver, &feed.jobs, Some(country), &filter, cli.sort, direction);

    let today = Utc::now().date_naive();
    eprintln!("  {} - {} job{}", country, matched.len(), if matched.len() == 1 { "" } else { "s" });
    for job in &matched {
        eprintln!(
            "  {:<20} {:<36} {:<24} {:<8} {}",
            job.company,
            job.title,
            job.location.as_deref().unwrap_or("-"),
            job.location_type.label(),
            relative_age(job.posted_date(), today),
        );
    }

    println!("{}", serde_json::to_string_pretty(&matched)?);
    Ok(())
}
