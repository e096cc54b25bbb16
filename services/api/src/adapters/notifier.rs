//! services/api/src/adapters/notifier.rs
//!
//! Implements the `LoadNotifier` port. Failures are logged and the latest
//! notice is kept so the dashboard can show it to the user.

use async_trait::async_trait;
use candidate_board_core::ports::{LoadFailure, LoadNotifier};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error};

/// A user-facing message about the most recent failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadNotice {
    pub sequence: u64,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct NoticeSlot {
    /// Sequence of the newest load reported so far.
    sequence: u64,
    notice: Option<LoadNotice>,
}

#[derive(Default)]
pub struct LogNotifier {
    slot: Mutex<NoticeSlot>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self) -> Option<LoadNotice> {
        self.slot.lock().await.notice.clone()
    }
}

#[async_trait]
impl LoadNotifier for LogNotifier {
    async fn report_applied_load(&self, sequence: u64, failures: &[LoadFailure]) {
        let mut slot = self.slot.lock().await;
        if sequence < slot.sequence {
            debug!(sequence, newest = slot.sequence, "Ignoring report for an older load.");
            return;
        }
        slot.sequence = sequence;

        if failures.is_empty() {
            slot.notice = None;
            return;
        }
        for failure in failures {
            error!(sequence, "Loading {} failed: {}", failure.entity, failure.message);
        }
        slot.notice = Some(LoadNotice {
            sequence,
            message: notice_message(failures),
            raised_at: Utc::now(),
        });
    }
}

fn notice_message(failures: &[LoadFailure]) -> String {
    let entities: Vec<String> = failures.iter().map(|f| f.entity.to_string()).collect();
    format!(
        "Could not load {}. Showing the data that is available.",
        entities.join(" and ")
    )
}
