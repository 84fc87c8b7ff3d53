//! `OptimizationTask` — a single parameter-set evaluation within a job.

use crate::models::error_detail::TaskErrorDetail;
use crate::models::status::Status;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type ParamSet = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationTask {
    pub id: String,
    pub job_id: String,
    pub owner_id: String,
    pub version_id: String,
    pub params: ParamSet,
    pub status: Status,
    pub progress: Option<f64>,
    pub retries: u32,
    pub throttled: bool,
    pub next_run_at: DateTime<Utc>,
    pub score: Option<f64>,
    pub result_summary_id: Option<String>,
    pub error: Option<TaskErrorDetail>,
    pub last_error: Option<TaskErrorDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OptimizationTask {
    /// Construct a freshly-generated task: queued, zero retries, due now.
    pub fn new_queued(
        id: String,
        job_id: String,
        owner_id: String,
        version_id: String,
        params: ParamSet,
        throttled: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            job_id,
            owner_id,
            version_id,
            params,
            status: Status::Queued,
            progress: None,
            retries: 0,
            throttled,
            next_run_at: now,
            score: None,
            result_summary_id: None,
            error: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        self.status == Status::Queued && !self.throttled && self.next_run_at <= now
    }
}
