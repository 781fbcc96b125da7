use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use crate::jobs::{select_jobs, FeedStats, JobFilter, JobPosting, SortDirection, SortKey};
use crate::location::{CountrySummary, Resolution};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub location: Option<String>,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Json<Resolution> {
    let start = Instant::now();
    let resolution = state.resolver.resolve_detailed(params.location.as_deref());

    tracing::info!(
        "GET /api/resolve location={:?} -> {} via {} ({:.1}ms)",
        params.location.as_deref().unwrap_or(""),
        resolution.result,
        resolution.rule,
        elapsed_ms(start),
    );

    Json(resolution)
}

// ─── GET /api/countries ──────────────────────────────────────────

#[derive(Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<CountrySummary>,
    pub remote: usize,
    pub defaulted: usize,
    pub total: usize,
}

pub async fn countries(State(state): State<Arc<AppState>>) -> Json<CountriesResponse> {
    let counts = &state.counts;
    tracing::debug!("GET /api/countries -> {} countries", counts.len());
    Json(CountriesResponse {
        countries: counts.summaries(),
        remote: counts.remote(),
        defaulted: counts.defaulted(),
        total: counts.total(),
    })
}

// ─── GET /api/jobs ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct JobsQuery {
    /// Canonical country name, or "remote" (any case) for remote-typed postings.
    pub country: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub clearance: Option<String>,
    pub visa: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

pub async fn jobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<JobPosting>>, ApiError> {
    let start = Instant::now();

    let filter = JobFilter {
        search: params.search.clone(),
        job_type: parse_param(params.job_type.as_deref())?,
        level: parse_param(params.level.as_deref())?,
        location_type: parse_param(params.location.as_deref())?,
        clearance: parse_param(params.clearance.as_deref())?,
        visa: parse_param(params.visa.as_deref())?,
    };
    let key: SortKey = parse_param(params.sort.as_deref())?.unwrap_or_default();
    let direction: SortDirection = parse_param(params.dir.as_deref())?.unwrap_or_default();

    let matched = select_jobs(
        &state.resolver,
        &state.feed.jobs,
        params.country.as_deref(),
        &filter,
        key,
        direction,
    );

    tracing::info!(
        "GET /api/jobs country={} -> {} jobs ({:.1}ms)",
        params.country.as_deref().unwrap_or("*"),
        matched.len(),
        elapsed_ms(start),
    );

    Ok(Json(matched.into_iter().cloned().collect()))
}

// ─── GET /api/stats ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: FeedStats,
    pub last_update: Option<String>,
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.stats.clone(),
        last_update: state.feed.last_update.clone(),
    })
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Empty values mean "not set"; anything else must parse.
fn parse_param<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = String>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e)),
    }
}
