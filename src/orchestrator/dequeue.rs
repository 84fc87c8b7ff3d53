use super::Orchestrator;
use crate::error::Result;
use crate::models::{OptimizationTask, Status};
use crate::store::tasks::{activate_slots, first_ready};
use chrono::Utc;

impl Orchestrator {
    /// Select and transition the next ready task to `running`. Scans
    /// `job_id` if given, else all jobs in insertion order; skips jobs
    /// owned by someone else, locked jobs, and jobs already at capacity.
    pub fn dequeue_next(&self, owner_id: &str, job_id: Option<&str>) -> Result<Option<OptimizationTask>> {
        let now = Utc::now();
        let mut inner = self.store.lock();

        let candidate_ids: Vec<String> = match job_id {
            Some(id) => vec![id.to_string()],
            None => inner.jobs.keys().cloned().collect(),
        };

        for id in candidate_ids {
            let Some(job) = inner.jobs.get(&id) else { continue };
            if job.owner_id != owner_id || job.is_locked() {
                continue;
            }
            let running = inner
                .tasks
                .get(&id)
                .map(|t| t.values().filter(|t| t.status == Status::Running).count() as u32)
                .unwrap_or(0);
            if running >= job.concurrency_limit {
                continue;
            }

            let concurrency_limit = job.concurrency_limit;
            let Some(task_table) = inner.tasks.get_mut(&id) else { continue };
            activate_slots(task_table, concurrency_limit, now);

            let dispatched = first_ready(task_table, now).map(|task| {
                task.status = Status::Running;
                task.progress = Some(0.0);
                task.last_error = None;
                task.updated_at = now;
                task.clone()
            });

            let Some(task) = dispatched else { continue };

            let task_table = inner.tasks.get(&id).expect("task table exists").clone();
            let result_summaries = inner.result_summaries.clone();
            let job = inner.jobs.get_mut(&id).expect("job exists");
            job.status = Status::Running;
            self.refresh_summary(job, &task_table, &result_summaries);
            let job_snapshot = job.clone();
            drop(inner);

            self.persist_update_task(&task);
            self.persist_update_job(&job_snapshot);
            return Ok(Some(task));
        }

        Ok(None)
    }
}
