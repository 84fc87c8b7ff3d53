//! SQLite row shapes for the persistence mirror and their conversions
//! to/from the domain model. JSON columns round-trip through
//! `serde_json::to_string`/`from_str` since SQLite has no native JSON type.

use crate::error::{OrchestratorError, Result};
use crate::models::{
    EarlyStopPolicy, OptimizationJob, OptimizationSummary, OptimizationTask, Status, StopReason,
    TaskErrorDetail,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

pub const CREATE_JOBS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS optimization_jobs (
    id TEXT PRIMARY KEY,
    owner TEXT NOT NULL,
    version TEXT NOT NULL,
    param_space TEXT NOT NULL,
    concurrency_limit INTEGER NOT NULL,
    early_stop_policy TEXT,
    status TEXT NOT NULL,
    total_tasks INTEGER NOT NULL,
    estimate INTEGER NOT NULL,
    summary TEXT NOT NULL,
    locked_status TEXT,
    stop_reason TEXT,
    source_job_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#;

pub const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS optimization_tasks (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    owner TEXT NOT NULL,
    version TEXT NOT NULL,
    param_set TEXT NOT NULL,
    status TEXT NOT NULL,
    progress REAL,
    retries INTEGER NOT NULL,
    throttled INTEGER NOT NULL,
    next_run_at TEXT NOT NULL,
    score REAL,
    result_summary_id TEXT,
    error TEXT,
    last_error TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#;

#[derive(Debug, sqlx::FromRow)]
pub struct JobRow {
    pub id: String,
    pub owner: String,
    pub version: String,
    pub param_space: String,
    pub concurrency_limit: i64,
    pub early_stop_policy: Option<String>,
    pub status: String,
    pub total_tasks: i64,
    pub estimate: i64,
    pub summary: String,
    pub locked_status: Option<String>,
    pub stop_reason: Option<String>,
    pub source_job_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn from_job(job: &OptimizationJob) -> Result<Self> {
        Ok(Self {
            id: job.id.clone(),
            owner: job.owner_id.clone(),
            version: job.version_id.clone(),
            param_space: job.param_space.to_string(),
            concurrency_limit: job.concurrency_limit as i64,
            early_stop_policy: json_opt(&job.early_stop_policy)?,
            status: status_to_string(job.status),
            total_tasks: job.total_tasks as i64,
            estimate: job.estimate as i64,
            summary: serde_json::to_string(&job.summary)
                .map_err(|e| OrchestratorError::internal(format!("summary encode failed: {e}")))?,
            locked_status: job.locked_status.map(status_to_string),
            stop_reason: json_opt(&job.stop_reason)?,
            source_job_id: job.source_job_id.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }

    pub fn into_job(self) -> Result<OptimizationJob> {
        Ok(OptimizationJob {
            id: self.id,
            owner_id: self.owner,
            version_id: self.version,
            param_space: serde_json::from_str(&self.param_space)
                .map_err(|e| OrchestratorError::internal(format!("paramSpace decode failed: {e}")))?,
            concurrency_limit: self.concurrency_limit as u32,
            early_stop_policy: json_opt_decode::<EarlyStopPolicy>(self.early_stop_policy)?,
            status: status_from_string(&self.status)?,
            total_tasks: self.total_tasks as usize,
            estimate: self.estimate as u64,
            summary: serde_json::from_str::<OptimizationSummary>(&self.summary)
                .map_err(|e| OrchestratorError::internal(format!("summary decode failed: {e}")))?,
            locked_status: self.locked_status.map(|s| status_from_string(&s)).transpose()?,
            stop_reason: json_opt_decode::<StopReason>(self.stop_reason)?,
            source_job_id: self.source_job_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct TaskRow {
    pub id: String,
    pub job_id: String,
    pub owner: String,
    pub version: String,
    pub param_set: String,
    pub status: String,
    pub progress: Option<f64>,
    pub retries: i64,
    pub throttled: bool,
    pub next_run_at: DateTime<Utc>,
    pub score: Option<f64>,
    pub result_summary_id: Option<String>,
    pub error: Option<String>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    pub fn from_task(task: &OptimizationTask) -> Result<Self> {
        Ok(Self {
            id: task.id.clone(),
            job_id: task.job_id.clone(),
            owner: task.owner_id.clone(),
            version: task.version_id.clone(),
            param_set: serde_json::to_string(&task.params)
                .map_err(|e| OrchestratorError::internal(format!("params encode failed: {e}")))?,
            status: status_to_string(task.status),
            progress: task.progress,
            retries: task.retries as i64,
            throttled: task.throttled,
            next_run_at: task.next_run_at,
            score: task.score,
            result_summary_id: task.result_summary_id.clone(),
            error: json_opt(&task.error)?,
            last_error: json_opt(&task.last_error)?,
            created_at: task.created_at,
            updated_at: task.updated_at,
        })
    }

    pub fn into_task(self) -> Result<OptimizationTask> {
        Ok(OptimizationTask {
            id: self.id,
            job_id: self.job_id,
            owner_id: self.owner,
            version_id: self.version,
            params: serde_json::from_str::<IndexMap<String, serde_json::Value>>(&self.param_set)
                .map_err(|e| OrchestratorError::internal(format!("params decode failed: {e}")))?,
            status: status_from_string(&self.status)?,
            progress: self.progress,
            retries: self.retries as u32,
            throttled: self.throttled,
            next_run_at: self.next_run_at,
            score: self.score,
            result_summary_id: self.result_summary_id,
            error: json_opt_decode::<TaskErrorDetail>(self.error)?,
            last_error: json_opt_decode::<TaskErrorDetail>(self.last_error)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn status_to_string(status: Status) -> String {
    status.as_str().to_string()
}

fn status_from_string(raw: &str) -> Result<Status> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| OrchestratorError::internal(format!("status decode failed: {e}")))
}

fn json_opt<T: serde::Serialize>(value: &Option<T>) -> Result<Option<String>> {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(|e| OrchestratorError::internal(format!("json encode failed: {e}")))
}

fn json_opt_decode<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Result<Option<T>> {
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| OrchestratorError::internal(format!("json decode failed: {e}")))
}
