//! `OptimizationJob` — a parameter-grid search owned by a single owner.

use crate::models::early_stop::{EarlyStopPolicy, StopReason};
use crate::models::status::Status;
use crate::models::summary::OptimizationSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationJob {
    pub id: String,
    pub owner_id: String,
    pub version_id: String,
    /// The original, opaque `paramSpace` as submitted — returned verbatim.
    pub param_space: Value,
    pub concurrency_limit: u32,
    pub early_stop_policy: Option<EarlyStopPolicy>,
    pub status: Status,
    pub total_tasks: usize,
    pub estimate: u64,
    pub summary: OptimizationSummary,
    pub locked_status: Option<Status>,
    pub stop_reason: Option<StopReason>,
    pub source_job_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OptimizationJob {
    pub const fn is_locked(&self) -> bool {
        self.locked_status.is_some()
    }
}
