//! services/api/src/adapters/backend.rs
//!
//! The HTTP adapter for the upstream ATS backend. It implements the
//! `DatasetSource` port from the core crate using `reqwest`.
//!
//! Whole-response problems (transport errors, non-success status, a body
//! without a `data` array) become port errors. Individual records are decoded
//! leniently: a wrong-typed field degrades to an empty or absent value instead
//! of failing the whole collection.

use async_trait::async_trait;
use candidate_board_core::domain::{Candidate, Job, JobStatus, TimelineEvent};
use candidate_board_core::ports::{DatasetSource, PortError, PortResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const CANDIDATES_PATH: &str = "/api/candidates";
const JOBS_PATH: &str = "/api/jobs";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Fetches bulk collections from the ATS backend.
#[derive(Clone)]
pub struct HttpDatasetSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDatasetSource {
    /// Creates a new `HttpDatasetSource` for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_collection(
        &self,
        path: &str,
        page: usize,
        page_size: usize,
    ) -> PortResult<Vec<Value>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} page={} pageSize={}", url, page, page_size);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PortError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: CollectionEnvelope = response
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch_candidates(
        &self,
        page: usize,
        page_size: usize,
    ) -> PortResult<Vec<Candidate>> {
        let records = self.fetch_collection(CANDIDATES_PATH, page, page_size).await?;
        Ok(decode_candidates(records))
    }

    async fn fetch_jobs(&self, page: usize, page_size: usize) -> PortResult<Vec<Job>> {
        let records = self.fetch_collection(JOBS_PATH, page, page_size).await?;
        Ok(decode_jobs(records))
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct CollectionEnvelope {
    data: Vec<Value>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CandidateRecord {
    id: Value,
    name: Value,
    email: Value,
    phone: Value,
    stage: Value,
    job_id: Value,
    applied_at: Value,
    resume: Value,
    timeline: Value,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct JobRecord {
    id: Value,
    title: Value,
    location: Value,
    status: Value,
    created_at: Value,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TimelineRecord {
    #[serde(rename = "type")]
    kind: Value,
    date: Value,
}

/// A wire record that converts into a domain value once its id is settled.
trait WireRecord: for<'de> Deserialize<'de> + Default {
    type Domain;

    fn raw_id(&self) -> &Value;

    fn into_domain(self, id: String) -> Self::Domain;
}

impl WireRecord for CandidateRecord {
    type Domain = Candidate;

    fn raw_id(&self) -> &Value {
        &self.id
    }

    fn into_domain(self, id: String) -> Candidate {
        Candidate {
            id,
            name: text(&self.name),
            email: text(&self.email),
            phone: text(&self.phone),
            stage: text(&self.stage),
            job_id: identifier(&self.job_id).unwrap_or_default(),
            applied_at: timestamp(&self.applied_at),
            resume: text(&self.resume),
            timeline: timeline(&self.timeline),
        }
    }
}

impl WireRecord for JobRecord {
    type Domain = Job;

    fn raw_id(&self) -> &Value {
        &self.id
    }

    fn into_domain(self, id: String) -> Job {
        Job {
            id,
            title: text(&self.title),
            location: text(&self.location),
            status: JobStatus::from(text(&self.status).as_str()),
            created_at: timestamp(&self.created_at),
        }
    }
}

//=========================================================================================
// Lenient Decoding
//=========================================================================================

/// Decodes candidate records. Every entry yields one candidate.
pub fn decode_candidates(records: Vec<Value>) -> Vec<Candidate> {
    decode_all::<CandidateRecord>(records, "candidate")
}

/// Decodes job records. Every entry yields one job.
pub fn decode_jobs(records: Vec<Value>) -> Vec<Job> {
    decode_all::<JobRecord>(records, "job")
}

/// Every entry of the collection yields one domain value, so counts always
/// match the backend. An entry that is not an object decodes as if every field
/// were missing. An entry without a usable id gets a placeholder derived from
/// its position in the collection.
fn decode_all<R: WireRecord>(records: Vec<Value>, kind: &str) -> Vec<R::Domain> {
    let total = records.len();
    let mut placeholders = 0;
    let decoded: Vec<R::Domain> = records
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let record = serde_json::from_value::<R>(value).unwrap_or_default();
            let id = identifier(record.raw_id()).unwrap_or_else(|| {
                placeholders += 1;
                placeholder_id(position)
            });
            record.into_domain(id)
        })
        .collect();
    if placeholders > 0 {
        warn!(
            "{} of {} {} record(s) had no usable id; placeholder ids were assigned.",
            placeholders, total, kind
        );
    }
    decoded
}

/// Ids may arrive as strings or numbers; anything else is unusable.
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Position-based id for a record the backend sent without one.
fn placeholder_id(position: usize) -> String {
    format!("missing-id-{}", position)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Zone-less date-time layouts, read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 strings, zone-less date-times and plain dates (both read
/// as UTC, a date at midnight), or epoch milliseconds.
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
}

fn timeline(value: &Value) -> Vec<TimelineEvent> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| {
            let record: TimelineRecord = serde_json::from_value(entry.clone()).unwrap_or_default();
            TimelineEvent {
                kind: text(&record.kind),
                occurred_at: timestamp(&record.date),
            }
        })
        .collect()
}
