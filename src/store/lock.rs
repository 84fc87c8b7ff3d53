//! Terminal-lock transition, applied to a job and all of its non-terminal
//! tasks. Pure state mutation — metrics/log emission and persistence
//! write-through are the caller's (orchestrator's) responsibility.

use crate::models::status::Status;
use crate::models::{OptimizationJob, OptimizationTask, StopReason};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Idempotent for the same `locked_status`. Returns the ids of the tasks
/// this call actually transitioned (empty if the job was already locked
/// with this status, in which case nothing was mutated) — the caller must
/// persist each one.
pub fn lock_job(
    job: &mut OptimizationJob,
    tasks: &mut IndexMap<String, OptimizationTask>,
    locked_status: Status,
    stop_reason: StopReason,
    now: DateTime<Utc>,
) -> Vec<String> {
    if job.locked_status == Some(locked_status) {
        return Vec::new();
    }
    job.locked_status = Some(locked_status);
    job.stop_reason = Some(stop_reason);
    job.status = locked_status;
    job.updated_at = now;

    let mut transitioned = Vec::new();
    for task in tasks.values_mut() {
        if !task.status.is_terminal() {
            task.status = locked_status;
            task.progress = Some(1.0);
            task.throttled = false;
            task.error = None;
            task.last_error = None;
            task.next_run_at = now;
            task.updated_at = now;
            transitioned.push(task.id.clone());
        }
    }
    transitioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::ParamSet;
    use crate::models::OptimizationSummary;

    fn job() -> OptimizationJob {
        let now = Utc::now();
        OptimizationJob {
            id: "job1".into(),
            owner_id: "owner1".into(),
            version_id: "v1".into(),
            param_space: serde_json::json!({}),
            concurrency_limit: 1,
            early_stop_policy: None,
            status: Status::Running,
            total_tasks: 1,
            estimate: 1,
            summary: OptimizationSummary::empty(1),
            locked_status: None,
            stop_reason: None,
            source_job_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn locking_is_idempotent() {
        let mut j = job();
        let mut tasks = IndexMap::new();
        tasks.insert(
            "t1".into(),
            OptimizationTask::new_queued(
                "t1".into(),
                "job1".into(),
                "owner1".into(),
                "v1".into(),
                ParamSet::new(),
                false,
                Utc::now(),
            ),
        );
        let reason = StopReason::Canceled { reason: None };
        assert_eq!(lock_job(&mut j, &mut tasks, Status::Canceled, reason.clone(), Utc::now()), vec!["t1".to_string()]);
        assert!(lock_job(&mut j, &mut tasks, Status::Canceled, reason, Utc::now()).is_empty());
        assert_eq!(tasks["t1"].status, Status::Canceled);
    }
}
