use super::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::models::{OptimizationTask, Status, TaskErrorDetail, TaskErrorType};
use crate::store::tasks::activate_slots;
use chrono::Utc;

impl Orchestrator {
    /// Mark `taskId` failed with `error_type`/`message`. No-op if the job
    /// is locked. Retryable errors re-queue with exponential backoff;
    /// non-retryable errors (or exhausted retries) fail the task terminally.
    pub fn mark_task_failed(
        &self,
        job_id: &str,
        task_id: &str,
        error_type: TaskErrorType,
        message: String,
    ) -> Result<OptimizationTask> {
        let now = Utc::now();
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        let task_table = inner
            .tasks
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        let task = task_table
            .get_mut(task_id)
            .ok_or_else(|| OrchestratorError::not_found("task not found"))?;

        if job.is_locked() {
            let current = task.clone();
            drop(guard);
            return Ok(current);
        }

        let detail = TaskErrorDetail {
            code: error_type,
            message: message.clone(),
        };
        task.last_error = Some(detail.clone());
        task.error = Some(detail);

        let retryable = error_type.is_retryable() && task.retries < self.config.max_retries;
        if retryable {
            task.retries += 1;
            let backoff = self.config.retry_base_seconds * (1u64 << (task.retries - 1));
            task.next_run_at = now + chrono::Duration::seconds(backoff as i64);
            task.status = Status::Queued;
            task.throttled = false;
            task.progress = None;
        } else {
            task.status = Status::Failed;
            task.throttled = false;
            task.next_run_at = now;
        }
        task.updated_at = now;
        let finished_task = task.clone();
        let retries = task.retries;

        let job = inner.jobs.get_mut(job_id).expect("job exists");
        let task_table = inner.tasks.get_mut(job_id).expect("task table exists");
        activate_slots(task_table, job.concurrency_limit, now);
        self.refresh_summary(job, task_table, &inner.result_summaries);
        let job_snapshot = job.clone();
        drop(guard);

        self.persist_update_task(&finished_task);
        self.persist_update_job(&job_snapshot);

        crate::observability::log_error(&self.config, job_id, &job_snapshot.owner_id, error_type, &message);
        if retryable {
            crate::observability::metrics::job_retry_total(&self.config, job_id, retries);
        }

        Ok(finished_task)
    }
}
