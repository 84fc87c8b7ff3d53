use super::views::JobStatusView;
use super::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::models::{Status, StopReason};
use crate::store::lock::lock_job;
use chrono::Utc;

impl Orchestrator {
    /// Lock the job into `canceled`. Idempotent — canceling an already
    /// terminal job just returns its current (unchanged) state.
    pub fn cancel_job(&self, job_id: &str, owner_id: &str, reason: Option<String>) -> Result<JobStatusView> {
        let now = Utc::now();
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        self.require_owner(job, owner_id)?;

        let task_table = inner
            .tasks
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;

        let transitioned = lock_job(job, task_table, Status::Canceled, StopReason::Canceled { reason: reason.clone() }, now);

        let job = inner.jobs.get_mut(job_id).expect("job exists");
        let task_table = inner.tasks.get_mut(job_id).expect("task table exists");
        self.refresh_summary(job, task_table, &inner.result_summaries);
        let job_snapshot = job.clone();
        let transitioned_tasks: Vec<_> = transitioned
            .iter()
            .filter_map(|id| task_table.get(id).cloned())
            .collect();
        drop(guard);

        self.persist_update_job(&job_snapshot);
        for task in &transitioned_tasks {
            self.persist_update_task(task);
        }

        if !transitioned.is_empty() {
            let stop_reason = StopReason::Canceled { reason };
            crate::observability::log_stop(
                &self.config,
                &job_snapshot.id,
                &job_snapshot.owner_id,
                job_snapshot.status,
                &stop_reason,
            );
            crate::observability::metrics::job_stop(&self.config, &job_snapshot, &stop_reason);
        }

        Ok(self.status_view(&job_snapshot))
    }
}
