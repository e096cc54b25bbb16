//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the candidate list and dashboard views and the
//! master definition for the OpenAPI specification.

use crate::web::{reload::reload_dataset, state::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use candidate_board_core::{
    clamp_page,
    domain::{Candidate, Dataset, FilterCriteria, Stage},
    fallback::{display_text, format_date, job_title, stage_info, stage_info_for, stage_table},
    recent_applications, DashboardStats,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Number of entries in the dashboard's recent activity list.
const RECENT_APPLICATIONS_LIMIT: usize = 5;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_candidates_handler,
        dashboard_handler,
        filter_options_handler,
        reload_handler,
    ),
    components(
        schemas(
            CandidateRow,
            CandidateListResponse,
            StatsView,
            StageCountView,
            DashboardResponse,
            StageOption,
            JobOption,
            FilterOptionsResponse,
            LoadFailureView,
            ReloadResponse,
        )
    ),
    tags(
        (name = "Candidate Board API", description = "List, filter and dashboard views over the candidate pool.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Query and Response Structs
//=========================================================================================

/// Query parameters of the candidate list. Blank values impose no constraint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CandidateQuery {
    /// Case-insensitive substring of name, email or phone.
    pub search: Option<String>,
    /// One of `applied`, `screen`, `tech`, `offer`, `hired`, `rejected`.
    pub stage: Option<String>,
    /// Job id the candidates applied to.
    pub job: Option<String>,
    /// 1-based page; out-of-range values are clamped to the nearest page.
    pub page: Option<usize>,
}

/// A candidate as displayed in a list. Selecting a row only needs its `id`.
///
/// `stage` is the value the backend sent; `stage_label` and `stage_color` fall
/// back to the first pipeline stage when that value is unknown.
#[derive(Debug, Serialize, ToSchema)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub stage: String,
    pub stage_label: String,
    pub stage_color: String,
    pub job_id: String,
    pub job_title: String,
    pub applied_on: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub timeline_count: usize,
}

impl CandidateRow {
    fn from_candidate(candidate: &Candidate, dataset: &Dataset) -> Self {
        let stage = stage_info(&candidate.stage);
        Self {
            id: candidate.id.clone(),
            name: display_text(&candidate.name).to_string(),
            email: display_text(&candidate.email).to_string(),
            phone: display_text(&candidate.phone).to_string(),
            stage: candidate.stage.clone(),
            stage_label: stage.label.to_string(),
            stage_color: stage.color.to_string(),
            job_id: candidate.job_id.clone(),
            job_title: job_title(dataset, &candidate.job_id).to_string(),
            applied_on: format_date(candidate.applied_at.as_ref()),
            applied_at: candidate.applied_at,
            timeline_count: candidate.timeline_len(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CandidateListResponse {
    pub items: Vec<CandidateRow>,
    /// The page actually served.
    pub page: usize,
    pub page_size: usize,
    pub total_filtered: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsView {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub archived_jobs: usize,
    pub total_candidates: usize,
    pub active_candidates: usize,
    pub hired_candidates: usize,
    pub rejected_candidates: usize,
    pub applied_this_week: usize,
    pub applied_today: usize,
    pub pending_review: usize,
    pub last_updated: DateTime<Utc>,
}

impl From<&DashboardStats> for StatsView {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            total_jobs: stats.total_jobs,
            active_jobs: stats.active_jobs,
            archived_jobs: stats.archived_jobs,
            total_candidates: stats.total_candidates,
            active_candidates: stats.active_candidates,
            hired_candidates: stats.hired_candidates,
            rejected_candidates: stats.rejected_candidates,
            applied_this_week: stats.applied_this_week,
            applied_today: stats.applied_today,
            pending_review: stats.pending_review,
            last_updated: stats.last_updated,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StageCountView {
    pub stage: String,
    pub label: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: StatsView,
    pub by_stage: Vec<StageCountView>,
    pub recent_applications: Vec<CandidateRow>,
    /// Set when the last load could not fetch every collection.
    pub notice: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StageOption {
    pub value: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobOption {
    pub id: String,
    pub title: String,
    pub location: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterOptionsResponse {
    pub stages: Vec<StageOption>,
    pub jobs: Vec<JobOption>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoadFailureView {
    pub entity: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    pub sequence: u64,
    pub applied: bool,
    pub candidates: usize,
    pub jobs: usize,
    pub failures: Vec<LoadFailureView>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List one page of candidates matching the search, stage and job filters.
#[utoipa::path(
    get,
    path = "/candidates",
    params(CandidateQuery),
    responses(
        (status = 200, description = "The requested page of filtered candidates", body = CandidateListResponse),
        (status = 400, description = "Unknown stage or malformed query")
    )
)]
pub async fn list_candidates_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidateListResponse>, (StatusCode, String)> {
    let stage = parse_stage_filter(query.stage.as_deref())?;
    let criteria = FilterCriteria::new(
        query.search.as_deref().unwrap_or_default(),
        stage,
        query.job.as_deref(),
    );
    let page_size = app_state.config.page_size;
    let requested = query.page.unwrap_or(1);

    let (page, snapshot) = {
        let mut board = app_state.board.lock().await;
        let mut page = board.page(&criteria, requested, page_size);
        let served = clamp_page(requested, page.total_pages);
        if served != requested {
            debug!("Clamping page {} to {}", requested, served);
            page = board.page(&criteria, served, page_size);
        }
        (page, board.snapshot())
    };

    let items = page
        .items
        .iter()
        .map(|candidate| CandidateRow::from_candidate(candidate, &snapshot))
        .collect();

    Ok(Json(CandidateListResponse {
        items,
        page: page.page,
        page_size,
        total_filtered: page.total_filtered,
        total_pages: page.total_pages,
    }))
}

/// Dashboard rollup of the current dataset.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Stats computed at the last load", body = DashboardResponse)
    )
)]
pub async fn dashboard_handler(State(app_state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let (stats, snapshot) = {
        let mut board = app_state.board.lock().await;
        let stats = match board.last_stats().cloned() {
            Some(stats) => stats,
            None => board.refresh_stats(&Local::now()).clone(),
        };
        (stats, board.snapshot())
    };

    let by_stage = stats
        .by_stage
        .iter()
        .map(|entry| {
            let info = stage_info_for(entry.stage);
            StageCountView {
                stage: entry.stage.as_str().to_string(),
                label: info.label.to_string(),
                color: info.color.to_string(),
                count: entry.count,
            }
        })
        .collect();

    let recent = recent_applications(snapshot.candidates(), RECENT_APPLICATIONS_LIMIT)
        .into_iter()
        .map(|candidate| CandidateRow::from_candidate(candidate, &snapshot))
        .collect();

    let notice = app_state.notifier.latest().await.map(|notice| notice.message);

    Json(DashboardResponse {
        stats: StatsView::from(&stats),
        by_stage,
        recent_applications: recent,
        notice,
    })
}

/// Options for the stage and job filter controls.
#[utoipa::path(
    get,
    path = "/filters",
    responses(
        (status = 200, description = "Available filter values", body = FilterOptionsResponse)
    )
)]
pub async fn filter_options_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<FilterOptionsResponse> {
    let snapshot = app_state.board.lock().await.snapshot();

    let stages = stage_table()
        .iter()
        .map(|info| StageOption {
            value: info.stage.as_str().to_string(),
            label: info.label.to_string(),
            color: info.color.to_string(),
        })
        .collect();

    let jobs = snapshot
        .jobs()
        .iter()
        .map(|job| JobOption {
            id: job.id.clone(),
            title: job_title(&snapshot, &job.id).to_string(),
            location: display_text(&job.location).to_string(),
            status: job.status.as_str().to_string(),
        })
        .collect();

    Json(FilterOptionsResponse { stages, jobs })
}

/// Fetch the bulk dataset again from the upstream backend.
///
/// Failed collections are replaced by empty ones and reported in `failures`.
#[utoipa::path(
    post,
    path = "/reload",
    responses(
        (status = 200, description = "Load cycle finished", body = ReloadResponse)
    )
)]
pub async fn reload_handler(State(app_state): State<Arc<AppState>>) -> Json<ReloadResponse> {
    let report = reload_dataset(&app_state).await;
    if !report.applied {
        warn!(sequence = report.sequence, "Reload finished after a newer one; result dropped.");
    }

    Json(ReloadResponse {
        sequence: report.sequence,
        applied: report.applied,
        candidates: report.candidates,
        jobs: report.jobs,
        failures: report
            .failures
            .into_iter()
            .map(|failure| LoadFailureView {
                entity: failure.entity.to_string(),
                message: failure.message,
            })
            .collect(),
    })
}

fn parse_stage_filter(raw: Option<&str>) -> Result<Option<Stage>, (StatusCode, String)> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Stage>()
            .map(Some)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string())),
    }
}
