//! End-to-end checks of the view endpoints against an in-memory upstream.

use api_lib::{
    adapters::LogNotifier,
    config::Config,
    web::{reload_dataset, router, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use candidate_board_core::{
    domain::{Candidate, Job, JobStatus},
    ports::{DatasetSource, PortError, PortResult},
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tokio::sync::Notify;
use tower::ServiceExt;
use tracing::Level;

//=========================================================================================
// Test Fixtures
//=========================================================================================

/// Upstream stand-in; `None` makes the corresponding fetch fail.
struct InMemorySource {
    candidates: Mutex<Option<Vec<Candidate>>>,
    jobs: Mutex<Option<Vec<Job>>>,
}

impl InMemorySource {
    fn new(candidates: Option<Vec<Candidate>>, jobs: Option<Vec<Job>>) -> Self {
        Self {
            candidates: Mutex::new(candidates),
            jobs: Mutex::new(jobs),
        }
    }
}

#[async_trait]
impl DatasetSource for InMemorySource {
    async fn fetch_candidates(
        &self,
        _page: usize,
        _page_size: usize,
    ) -> PortResult<Vec<Candidate>> {
        self.candidates
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PortError::Status {
                status: 503,
                message: "unavailable".to_string(),
            })
    }

    async fn fetch_jobs(&self, _page: usize, _page_size: usize) -> PortResult<Vec<Job>> {
        self.jobs
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PortError::Malformed("no data array".to_string()))
    }
}

/// Upstream whose first candidate fetch stalls until released and then fails.
/// Every later fetch succeeds immediately.
struct StallingSource {
    candidates: Vec<Candidate>,
    calls: AtomicUsize,
    release: Notify,
}

impl StallingSource {
    fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            calls: AtomicUsize::new(0),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl DatasetSource for StallingSource {
    async fn fetch_candidates(
        &self,
        _page: usize,
        _page_size: usize,
    ) -> PortResult<Vec<Candidate>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.release.notified().await;
            return Err(PortError::Status {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(self.candidates.clone())
    }

    async fn fetch_jobs(&self, _page: usize, _page_size: usize) -> PortResult<Vec<Job>> {
        Ok(vec![job("j1", "Rust Engineer", "active")])
    }
}

fn config() -> Arc<Config> {
    Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        backend_url: "http://upstream.invalid".to_string(),
        log_level: Level::INFO,
        page_size: 12,
        bulk_page_size: 1000,
        request_timeout: std::time::Duration::from_secs(1),
        allowed_origin: "http://localhost:3000".to_string(),
    })
}

fn candidate(id: usize, name: &str, stage: &str, job_id: &str) -> Candidate {
    Candidate {
        id: format!("c{}", id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: format!("555-{:04}", id),
        stage: stage.to_string(),
        job_id: job_id.to_string(),
        applied_at: Some(Utc::now() - Duration::days(id as i64)),
        resume: String::new(),
        timeline: Vec::new(),
    }
}

fn job(id: &str, title: &str, status: &str) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        location: "Remote".to_string(),
        status: JobStatus::from(status),
        created_at: None,
    }
}

fn pool(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| candidate(i, &format!("Person {}", i), "applied", "j1"))
        .collect()
}

async fn loaded_state(source: InMemorySource) -> (Arc<AppState>, Arc<InMemorySource>) {
    let source = Arc::new(source);
    let state = Arc::new(AppState::new(
        config(),
        source.clone(),
        Arc::new(LogNotifier::new()),
    ));
    reload_dataset(&state).await;
    (state, source)
}

async fn send(state: &Arc<AppState>, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

//=========================================================================================
// Candidate List
//=========================================================================================

#[tokio::test]
async fn twenty_five_candidates_span_three_pages() {
    let (state, _) = loaded_state(InMemorySource::new(
        Some(pool(25)),
        Some(vec![job("j1", "Rust Engineer", "active")]),
    ))
    .await;

    let (status, first) = send(&state, "GET", "/candidates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total_filtered"], 25);
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["page"], 1);
    assert_eq!(first["items"].as_array().unwrap().len(), 12);
    assert_eq!(first["items"][0]["job_title"], "Rust Engineer");

    let (_, third) = send(&state, "GET", "/candidates?page=3").await;
    assert_eq!(third["items"].as_array().unwrap().len(), 1);
    assert_eq!(third["items"][0]["id"], "c24");

    // Past the last page the view is clamped back to it.
    let (_, fourth) = send(&state, "GET", "/candidates?page=4").await;
    assert_eq!(fourth["page"], 3);
    assert_eq!(fourth["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn filters_combine_and_unknown_job_gets_placeholder() {
    let candidates = vec![
        candidate(1, "Ada Lovelace", "hired", "j1"),
        candidate(2, "Ada Byron", "applied", "j1"),
        candidate(3, "Alan Turing", "hired", "j-gone"),
        candidate(4, "Grace Hopper", "foo", "j1"),
    ];
    let (state, _) = loaded_state(InMemorySource::new(
        Some(candidates),
        Some(vec![job("j1", "Rust Engineer", "active")]),
    ))
    .await;

    let (_, body) = send(&state, "GET", "/candidates?search=ADA&stage=hired&job=j1").await;
    assert_eq!(body["total_filtered"], 1);
    assert_eq!(body["items"][0]["id"], "c1");
    assert_eq!(body["items"][0]["stage_label"], "Hired");

    let (_, body) = send(&state, "GET", "/candidates?search=turing").await;
    assert_eq!(body["items"][0]["job_title"], "Unknown Position");

    // The raw value is served; only the label and color fall back.
    let (_, body) = send(&state, "GET", "/candidates?search=grace").await;
    assert_eq!(body["items"][0]["stage"], "foo");
    assert_eq!(body["items"][0]["stage_label"], "Applied");
    assert_eq!(body["items"][0]["stage_color"], "blue");

    let (_, body) = send(&state, "GET", "/candidates?search=9999").await;
    assert_eq!(body["total_filtered"], 0);
    assert_eq!(body["total_pages"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());

    let (_, body) = send(&state, "GET", "/candidates?search=&stage=&job=").await;
    assert_eq!(body["total_filtered"], 4);
}

#[tokio::test]
async fn unknown_stage_filter_is_a_bad_request() {
    let (state, _) = loaded_state(InMemorySource::new(Some(pool(3)), Some(Vec::new()))).await;
    let (status, _) = send(&state, "GET", "/candidates?stage=interviewing").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//=========================================================================================
// Dashboard, Filters and Reload
//=========================================================================================

#[tokio::test]
async fn dashboard_reports_counts_and_recent_applications() {
    let candidates = vec![
        candidate(0, "Today Person", "screen", "j1"),
        candidate(1, "Yesterday Person", "tech", "j1"),
        candidate(10, "Old Person", "hired", "j2"),
        candidate(20, "Older Person", "rejected", "j2"),
    ];
    let jobs = vec![
        job("j1", "Rust Engineer", "active"),
        job("j2", "Designer", "archived"),
    ];
    let (state, _) = loaded_state(InMemorySource::new(Some(candidates), Some(jobs))).await;

    let (status, body) = send(&state, "GET", "/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["total_jobs"], 2);
    assert_eq!(stats["active_jobs"], 1);
    assert_eq!(stats["archived_jobs"], 1);
    assert_eq!(stats["total_candidates"], 4);
    assert_eq!(stats["active_candidates"], 2);
    assert_eq!(stats["hired_candidates"], 1);
    assert_eq!(stats["rejected_candidates"], 1);
    assert_eq!(stats["pending_review"], 2);
    assert_eq!(stats["applied_this_week"], 2);

    assert_eq!(body["by_stage"].as_array().unwrap().len(), 6);
    let recent = body["recent_applications"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["id"], "c0");
    assert!(body["notice"].is_null());
}

#[tokio::test]
async fn failed_collection_degrades_to_empty_with_notice() {
    let (state, source) = loaded_state(InMemorySource::new(Some(pool(2)), None)).await;

    let (_, list) = send(&state, "GET", "/candidates").await;
    assert_eq!(list["total_filtered"], 2);
    assert_eq!(list["items"][0]["job_title"], "Unknown Position");

    let (_, dashboard) = send(&state, "GET", "/dashboard").await;
    assert_eq!(dashboard["stats"]["total_jobs"], 0);
    assert_eq!(
        dashboard["notice"],
        "Could not load jobs. Showing the data that is available."
    );

    // Once the jobs come back, a reload resolves titles and clears the notice.
    *source.jobs.lock().unwrap() = Some(vec![job("j1", "Rust Engineer", "active")]);
    let (status, reload) = send(&state, "POST", "/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reload["applied"], true);
    assert_eq!(reload["jobs"], 1);
    assert!(reload["failures"].as_array().unwrap().is_empty());

    let (_, list) = send(&state, "GET", "/candidates").await;
    assert_eq!(list["items"][0]["job_title"], "Rust Engineer");
    let (_, dashboard) = send(&state, "GET", "/dashboard").await;
    assert!(dashboard["notice"].is_null());
    assert_eq!(dashboard["stats"]["total_jobs"], 1);
}

#[tokio::test]
async fn filter_options_list_stages_and_jobs() {
    let jobs = vec![job("j1", "Rust Engineer", "active"), job("j2", "", "draft")];
    let (state, _) = loaded_state(InMemorySource::new(Some(Vec::new()), Some(jobs))).await;

    let (_, body) = send(&state, "GET", "/filters").await;
    let stages: Vec<&str> = body["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["value"].as_str().unwrap())
        .collect();
    assert_eq!(stages, vec!["applied", "screen", "tech", "offer", "hired", "rejected"]);

    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1]["title"], "Unknown Position");
    assert_eq!(jobs[1]["status"], "draft");
}

#[tokio::test]
async fn reload_sequence_numbers_increase() {
    let (state, _) = loaded_state(InMemorySource::new(Some(pool(1)), Some(Vec::new()))).await;

    let (_, first) = send(&state, "POST", "/reload").await;
    let (_, second) = send(&state, "POST", "/reload").await;
    assert_eq!(first["sequence"], 2);
    assert_eq!(second["sequence"], 3);
    assert_eq!(second["applied"], true);
}

#[tokio::test]
async fn stale_failed_reload_leaves_no_notice() {
    let source = Arc::new(StallingSource::new(pool(3)));
    let state = Arc::new(AppState::new(
        config(),
        source.clone(),
        Arc::new(LogNotifier::new()),
    ));

    let stale = tokio::spawn({
        let state = state.clone();
        async move { reload_dataset(&state).await }
    });
    // Wait until the first reload holds its ticket and is stuck upstream.
    while source.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let fresh = reload_dataset(&state).await;
    assert!(fresh.applied);
    assert!(fresh.failures.is_empty());

    source.release.notify_one();
    let stale = stale.await.unwrap();
    assert!(!stale.applied);
    assert_eq!(stale.failures.len(), 1);
    assert!(stale.sequence < fresh.sequence);

    assert!(state.notifier.latest().await.is_none());
    let (_, dashboard) = send(&state, "GET", "/dashboard").await;
    assert!(dashboard["notice"].is_null());
    assert_eq!(dashboard["stats"]["total_candidates"], 3);
}
