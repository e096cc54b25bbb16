//! crates/candidate_board_core/src/domain.rs
//!
//! Defines the pure, core data structures for the candidate board.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Stage
//=========================================================================================

/// The pipeline position of a candidate. The declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// Every stage, in pipeline order.
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screen,
        Stage::Tech,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    /// The value used for this stage by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    /// Hired and rejected candidates have left the pipeline.
    pub fn is_closed(self) -> bool {
        matches!(self, Stage::Hired | Stage::Rejected)
    }

    /// Candidates in screening or technical interviews wait on a reviewer.
    pub fn is_pending_review(self) -> bool {
        matches!(self, Stage::Screen | Stage::Tech)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the six stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown stage: '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

//=========================================================================================
// Candidate
//=========================================================================================

/// A single entry of a candidate's activity history.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub kind: String,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// A candidate as held in the bulk snapshot.
///
/// `stage` keeps the raw backend value so that filtering compares exactly what
/// the backend sent; use [`Candidate::parsed_stage`] for the typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub stage: String,
    pub job_id: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub resume: String,
    pub timeline: Vec<TimelineEvent>,
}

impl Candidate {
    /// The typed stage, or `None` when the backend sent an unrecognized value.
    pub fn parsed_stage(&self) -> Option<Stage> {
        self.stage.parse().ok()
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }
}

//=========================================================================================
// Job
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Active,
    Archived,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
            JobStatus::Other(other) => other,
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "active" => JobStatus::Active,
            "archived" => JobStatus::Archived,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

/// A job posting. Only used as a lookup target and a filter dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
}

//=========================================================================================
// Dataset
//=========================================================================================

/// One complete, immutable load of candidates and jobs.
///
/// A dataset is never mutated after construction; a reload builds a new one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    job_index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(candidates: Vec<Candidate>, jobs: Vec<Job>) -> Self {
        let mut job_index = HashMap::with_capacity(jobs.len());
        for (position, job) in jobs.iter().enumerate() {
            // First occurrence wins for duplicated ids.
            job_index.entry(job.id.clone()).or_insert(position);
        }
        Self {
            candidates,
            jobs,
            job_index,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Finds the job a candidate references, if it was loaded.
    pub fn job(&self, job_id: &str) -> Option<&Job> {
        self.job_index.get(job_id).map(|&position| &self.jobs[position])
    }
}

//=========================================================================================
// Filter Criteria
//=========================================================================================

/// The active search/stage/job constraints. Every constraint is optional and
/// they combine with AND.
///
/// The search term is stored trimmed and lowercased, so two criteria built from
/// `"Ada "` and `"ada"` compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    search: String,
    stage: Option<Stage>,
    job_id: Option<String>,
}

impl FilterCriteria {
    pub fn new(search: &str, stage: Option<Stage>, job_id: Option<&str>) -> Self {
        Self::default()
            .with_search(search)
            .with_stage(stage)
            .with_job(job_id)
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.trim().to_lowercase();
        self
    }

    pub fn with_stage(mut self, stage: Option<Stage>) -> Self {
        self.stage = stage;
        self
    }

    /// A blank job id means "any job".
    pub fn with_job(mut self, job_id: Option<&str>) -> Self {
        self.job_id = job_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.stage.is_none() && self.job_id.is_none()
    }
}
