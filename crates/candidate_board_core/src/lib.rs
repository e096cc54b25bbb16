pub mod board;
pub mod domain;
pub mod fallback;
pub mod filter;
pub mod loader;
pub mod ports;
pub mod stats;

pub use board::{CandidateBoard, LoadTicket};
pub use domain::{
    Candidate, Dataset, FilterCriteria, Job, JobStatus, Stage, TimelineEvent, UnknownStage,
};
pub use filter::{clamp_page, filter_and_paginate, Page, DEFAULT_PAGE_SIZE};
pub use loader::{load_dataset, LoadOutcome, DEFAULT_BULK_PAGE_SIZE};
pub use ports::{DatasetSource, EntityKind, LoadFailure, LoadNotifier, PortError, PortResult};
pub use stats::{compute_stats, recent_applications, DashboardStats, StageCount};
