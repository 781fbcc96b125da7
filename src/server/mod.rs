mod handlers;
mod state;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/countries", get(handlers::countries))
        .route("/api/jobs", get(handlers::jobs))
        .route("/api/stats", get(handlers::stats))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn start(host: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("jobmap API listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobFeed;
    use crate::location::LocationResolver;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    const FEED: &str = r#"{
        "lastUpdate": "2026-10-16T06:00:00Z",
        "jobs": [
            { "company": "Okta", "title": "IAM Engineer", "location": "Austin, TX",
              "locationType": "onsite", "type": "iam", "level": "mid", "posted": "2026-10-10" },
            { "company": "Ping", "title": "Security Architect", "location": "London",
              "locationType": "hybrid", "type": "architect", "level": "principal",
              "clearance": "none", "posted": "2026-10-12" },
            { "company": "CyberArk", "title": "PAM Consultant", "location": "Remote",
              "locationType": "remote", "type": "consultant", "level": "senior",
              "visaSponsorship": "available", "posted": "2026-10-14" },
            { "company": "Booz Allen", "title": "IAM Analyst", "location": null,
              "locationType": "onsite", "type": "analyst", "level": "junior",
              "clearance": "ts-sci", "posted": "2026-10-01" }
        ]
    }"#;

    fn test_app() -> Router {
        let feed = JobFeed::from_json(FEED).unwrap();
        build_router(AppState::new(LocationResolver::new(), feed))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let (status, body) = get_json("/api/resolve?location=Austin%2C%20TX").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["kind"], "country");
        assert_eq!(body["result"]["country"], "United States of America");
        assert_eq!(body["rule"]["rule"], "region_code");
        assert_eq!(body["rule"]["matched"], "TX");
    }

    #[tokio::test]
    async fn test_resolve_missing_location_is_default() {
        let (status, body) = get_json("/api/resolve").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["kind"], "default");
        assert_eq!(body["rule"]["rule"], "empty");
    }

    #[tokio::test]
    async fn test_resolve_remote() {
        let (_, body) = get_json("/api/resolve?location=Remote%20-%20London").await;
        assert_eq!(body["result"]["kind"], "remote");
    }

    #[tokio::test]
    async fn test_countries_endpoint() {
        let (status, body) = get_json("/api/countries").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 4);
        assert_eq!(body["remote"], 1);
        assert_eq!(body["defaulted"], 1);
        let countries = body["countries"].as_array().unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0]["country"], "United States of America");
        assert_eq!(countries[0]["count"], 2);
        assert_eq!(countries[0]["tier"], "low");
        assert_eq!(countries[1]["country"], "United Kingdom");
    }

    #[tokio::test]
    async fn test_jobs_by_country_sorted() {
        let (status, body) = get_json("/api/jobs?country=United%20States%20of%20America&sort=posted&dir=asc").await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["company"], "Booz Allen");
        assert_eq!(jobs[1]["company"], "Okta");
    }

    #[tokio::test]
    async fn test_jobs_remote_selection() {
        let (_, body) = get_json("/api/jobs?country=Remote").await;
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["company"], "CyberArk");
    }

    #[tokio::test]
    async fn test_jobs_remote_selection_any_case() {
        for uri in ["/api/jobs?country=remote", "/api/jobs?country=REMOTE"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK);
            let jobs = body.as_array().unwrap();
            assert_eq!(jobs.len(), 1);
            assert_eq!(jobs[0]["company"], "CyberArk");
        }
    }

    #[tokio::test]
    async fn test_jobs_filters() {
        let (_, body) = get_json("/api/jobs?clearance=none&search=iam").await;
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["company"], "Okta");

        let (_, body) = get_json("/api/jobs?visa=available").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_jobs_default_order_newest_first() {
        let (_, body) = get_json("/api/jobs").await;
        let companies: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["company"].as_str().unwrap())
            .collect();
        assert_eq!(companies, vec!["CyberArk", "Ping", "Okta", "Booz Allen"]);
    }

    #[tokio::test]
    async fn test_jobs_bad_sort_key() {
        let (status, body) = get_json("/api/jobs?sort=salary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("salary"));
    }

    #[tokio::test]
    async fn test_jobs_bad_level() {
        let (status, _) = get_json("/api/jobs?level=wizard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let (status, body) = get_json("/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_jobs"], 4);
        assert_eq!(body["remote_jobs"], 1);
        assert_eq!(body["companies"], 4);
        assert_eq!(body["countries"], 2);
        assert_eq!(body["lastUpdate"], "2026-10-16T06:00:00Z");
    }
}
