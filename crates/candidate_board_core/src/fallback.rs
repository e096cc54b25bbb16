//! crates/candidate_board_core/src/fallback.rs
//!
//! Every display lookup resolves through this module, so a missing job, an
//! unknown stage or a blank field always degrades to the same default value.

use chrono::{DateTime, Utc};

use crate::domain::{Dataset, Stage};

/// Shown when a candidate's job reference cannot be resolved to a title.
pub const UNKNOWN_POSITION: &str = "Unknown Position";
/// Shown when a date is missing.
pub const NOT_AVAILABLE: &str = "N/A";
/// Shown when a free-text field is blank.
pub const UNKNOWN_TEXT: &str = "?";

/// Display metadata for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: &'static str,
    pub color: &'static str,
}

// Ordered like `Stage::ALL`; the first row is the fallback for unknown values.
const STAGE_TABLE: [StageInfo; 6] = [
    StageInfo {
        stage: Stage::Applied,
        label: "Applied",
        color: "blue",
    },
    StageInfo {
        stage: Stage::Screen,
        label: "Screening",
        color: "yellow",
    },
    StageInfo {
        stage: Stage::Tech,
        label: "Technical",
        color: "purple",
    },
    StageInfo {
        stage: Stage::Offer,
        label: "Offer",
        color: "orange",
    },
    StageInfo {
        stage: Stage::Hired,
        label: "Hired",
        color: "green",
    },
    StageInfo {
        stage: Stage::Rejected,
        label: "Rejected",
        color: "red",
    },
];

/// The full stage table in pipeline order.
pub fn stage_table() -> &'static [StageInfo] {
    &STAGE_TABLE
}

/// Resolves a raw stage value; unrecognized values get the first table entry.
pub fn stage_info(raw: &str) -> &'static StageInfo {
    STAGE_TABLE
        .iter()
        .find(|info| info.stage.as_str() == raw)
        .unwrap_or(&STAGE_TABLE[0])
}

pub fn stage_info_for(stage: Stage) -> &'static StageInfo {
    stage_info(stage.as_str())
}

/// Resolves a job id to its title, or [`UNKNOWN_POSITION`] when the job is not
/// loaded or carries a blank title.
pub fn job_title<'a>(dataset: &'a Dataset, job_id: &str) -> &'a str {
    dataset
        .job(job_id)
        .map(|job| job.title.as_str())
        .filter(|title| !title.trim().is_empty())
        .unwrap_or(UNKNOWN_POSITION)
}

pub fn display_text(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN_TEXT
    } else {
        value
    }
}

/// Formats a timestamp as e.g. `Mar 4, 2024`, or [`NOT_AVAILABLE`].
pub fn format_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(at) => at.format("%b %-d, %Y").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}
