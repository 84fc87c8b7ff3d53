//! Request/response view types for the orchestrator's public operations.
//!
//! These are the shapes the `http` layer serializes directly; keeping them
//! here (rather than building ad-hoc JSON in `http`) means the CLI and any
//! in-process caller get the exact same view.

use crate::models::{EarlyStopPolicy, OptimizationSummary, StopReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub owner_id: String,
    pub version_id: String,
    pub param_space: Value,
    pub concurrency_limit: u32,
    #[serde(default)]
    pub early_stop_policy: Option<EarlyStopPolicy>,
    /// Client-supplied hint, accepted for request-shape parity; the
    /// authoritative estimate is always the normalizer's own count.
    #[serde(default)]
    pub estimate: Option<u64>,
    #[serde(default)]
    pub source_job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResult {
    pub id: String,
    pub status: String,
    pub throttled: bool,
    pub total_tasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub throttled: bool,
    pub queue_depth: usize,
    pub running: usize,
    #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub id: String,
    pub status: String,
    pub total_tasks: usize,
    pub concurrency_limit: u32,
    pub summary: OptimizationSummary,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_stop_policy: Option<EarlyStopPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshotView {
    #[serde(flatten)]
    pub status: JobStatusView,
    pub param_space: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub task_id: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_summary_id: Option<String>,
    pub params: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub job_id: String,
    pub status: String,
    pub generated_at: DateTime<Utc>,
    pub summary: OptimizationSummary,
    pub items: Vec<ExportItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SucceededRequest {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub result_summary_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRequest {
    pub error_type: crate::models::TaskErrorType,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DequeueRequest {
    #[serde(default)]
    pub job_id: Option<String>,
}
