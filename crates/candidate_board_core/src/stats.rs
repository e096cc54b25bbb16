//! crates/candidate_board_core/src/stats.rs
//!
//! The dashboard aggregator. Every call recomputes the snapshot from scratch.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use std::cmp::Reverse;

use crate::domain::{Candidate, Job, JobStatus, Stage};
use crate::fallback::stage_info;

/// Length of the rolling "this week" window.
pub const WEEK_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

/// A point-in-time rollup of the bulk dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub archived_jobs: usize,
    pub total_candidates: usize,
    /// Candidates not yet hired or rejected.
    pub active_candidates: usize,
    pub hired_candidates: usize,
    pub rejected_candidates: usize,
    pub applied_this_week: usize,
    pub applied_today: usize,
    /// Candidates in screening or technical stages.
    pub pending_review: usize,
    /// Candidate count per stage in pipeline order; unknown stages are counted
    /// under the stage they display as.
    pub by_stage: Vec<StageCount>,
    pub last_updated: DateTime<Utc>,
}

/// Computes the dashboard snapshot as seen at `now`.
///
/// "Today" starts at midnight of `now`'s calendar date in `now`'s time zone;
/// "this week" is the rolling seven days ending at `now`. Both bounds are inclusive.
pub fn compute_stats<Tz: TimeZone>(
    jobs: &[Job],
    candidates: &[Candidate],
    now: &DateTime<Tz>,
) -> DashboardStats {
    let now_utc = now.with_timezone(&Utc);
    let today_start = start_of_day(now);
    let week_start = now_utc - Duration::days(WEEK_WINDOW_DAYS);

    let mut active_jobs = 0;
    let mut archived_jobs = 0;
    for job in jobs {
        match job.status {
            JobStatus::Active => active_jobs += 1,
            JobStatus::Archived => archived_jobs += 1,
            JobStatus::Other(_) => {}
        }
    }

    let mut active_candidates = 0;
    let mut hired_candidates = 0;
    let mut rejected_candidates = 0;
    let mut pending_review = 0;
    let mut applied_this_week = 0;
    let mut applied_today = 0;
    let mut stage_totals = [0usize; Stage::ALL.len()];

    for candidate in candidates {
        let stage = candidate.parsed_stage();
        match stage {
            Some(Stage::Hired) => hired_candidates += 1,
            Some(Stage::Rejected) => rejected_candidates += 1,
            _ => {}
        }
        if !stage.is_some_and(Stage::is_closed) {
            active_candidates += 1;
        }
        if stage.is_some_and(Stage::is_pending_review) {
            pending_review += 1;
        }
        stage_totals[stage_info(&candidate.stage).stage as usize] += 1;

        if let Some(applied_at) = candidate.applied_at {
            if applied_at >= week_start {
                applied_this_week += 1;
            }
            if applied_at >= today_start {
                applied_today += 1;
            }
        }
    }

    let by_stage = Stage::ALL
        .into_iter()
        .map(|stage| StageCount {
            stage,
            count: stage_totals[stage as usize],
        })
        .collect();

    DashboardStats {
        total_jobs: jobs.len(),
        active_jobs,
        archived_jobs,
        total_candidates: candidates.len(),
        active_candidates,
        hired_candidates,
        rejected_candidates,
        applied_this_week,
        applied_today,
        pending_review,
        by_stage,
        last_updated: now_utc,
    }
}

/// The `limit` most recent applications, newest first. Candidates without an
/// application time sort last; ties keep their input order.
pub fn recent_applications(candidates: &[Candidate], limit: usize) -> Vec<&Candidate> {
    let mut recent: Vec<&Candidate> = candidates.iter().collect();
    recent.sort_by_key(|candidate| Reverse(candidate.applied_at));
    recent.truncate(limit);
    recent
}

fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight does not exist on DST-gap days; step back by the local wall time instead.
        None => now.with_timezone(&Utc) - (now.naive_local() - midnight),
    }
}
