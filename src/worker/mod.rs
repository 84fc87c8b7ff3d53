//! The worker-runner contract: how an external (or in-process, for tests)
//! worker drives `dequeue_next` / `mark_task_succeeded` / `mark_task_failed`,
//! plus the result-normalization rules it must apply.

use crate::error::Result;
use crate::models::{OptimizationTask, TaskErrorType};
use crate::orchestrator::Orchestrator;
use chrono::Utc;
use serde_json::Value;

/// What a runner reports back after executing a task.
#[derive(Debug, Clone)]
pub enum RunnerOutcome {
    Success {
        score: Option<f64>,
        result_summary_id: Option<String>,
    },
    Failure {
        kind: String,
        message: String,
    },
}

/// Raised when a runner's raw result can't be normalized into a
/// `(score, resultSummaryId)` pair.
#[derive(Debug, Clone)]
pub struct WorkerError {
    pub kind: String,
    pub message: String,
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for WorkerError {}

/// `null → (None, None)`; number → `(Some(score), None)`; mapping →
/// extract `score`/`resultSummaryId`; 2-element array → `(first, second)`.
/// Anything else is an internal error.
pub fn normalize_runner_result(value: &Value) -> std::result::Result<(Option<f64>, Option<String>), WorkerError> {
    match value {
        Value::Null => Ok((None, None)),
        Value::Number(n) => Ok((n.as_f64(), None)),
        Value::Object(obj) => {
            let score = obj.get("score").and_then(Value::as_f64);
            let result_summary_id = obj
                .get("resultSummaryId")
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok((score, result_summary_id))
        }
        Value::Array(items) if items.len() == 2 => {
            let score = items[0].as_f64();
            let result_summary_id = items[1].as_str().map(str::to_string);
            Ok((score, result_summary_id))
        }
        other => Err(WorkerError {
            kind: "internal".to_string(),
            message: format!("unrecognized runner result shape: {other}"),
        }),
    }
}

/// `param → PARAM_ERROR`, `upstream → UPSTREAM_ERROR`, anything else →
/// `INTERNAL_ERROR`.
pub fn map_error_kind(kind: &str) -> TaskErrorType {
    match kind {
        "param" => TaskErrorType::ParamError,
        "upstream" => TaskErrorType::UpstreamError,
        _ => TaskErrorType::InternalError,
    }
}

/// Drive one iteration of the worker loop in-process: dequeue, run
/// `runner`, report the outcome. Returns `Ok(false)` when nothing was
/// ready to dispatch.
pub fn process_next(
    orchestrator: &Orchestrator,
    owner_id: &str,
    job_id: Option<&str>,
    runner: impl FnOnce(&OptimizationTask) -> RunnerOutcome,
) -> Result<bool> {
    let Some(task) = orchestrator.dequeue_next(owner_id, job_id)? else {
        return Ok(false);
    };

    let config = orchestrator.config();
    let queue_wait = (Utc::now() - task.created_at).num_milliseconds().max(0) as f64 / 1000.0;
    crate::observability::metrics::queue_wait_seconds(config, queue_wait);
    crate::observability::log_start(config, &task.job_id, &task.owner_id, &task.id);

    let started = Utc::now();
    let outcome = runner(&task);
    let elapsed = (Utc::now() - started).num_milliseconds().max(0) as f64 / 1000.0;

    match outcome {
        RunnerOutcome::Success { score, result_summary_id } => {
            orchestrator.mark_task_succeeded(&task.job_id, &task.id, score, result_summary_id)?;
        }
        RunnerOutcome::Failure { kind, message } => {
            let error_type = map_error_kind(&kind);
            orchestrator.mark_task_failed(&task.job_id, &task.id, error_type, message)?;
        }
    }

    crate::observability::metrics::job_exec_seconds(config, &task.job_id, elapsed);
    crate::observability::log_end(config, &task.job_id, &task.owner_id, &task.id, (elapsed * 1000.0) as u64);

    if let Ok(status) = orchestrator.get_job_status(&task.job_id, &task.owner_id) {
        crate::observability::metrics::active_jobs(config, status.diagnostics.running);
    }

    Ok(true)
}
