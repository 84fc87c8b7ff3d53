use super::views::{JobSnapshotView, JobStatusView};
use super::Orchestrator;
use crate::error::{OrchestratorError, Result};

impl Orchestrator {
    /// Owner-checked status view, after a fresh summary refresh.
    pub fn get_job_status(&self, job_id: &str, owner_id: &str) -> Result<JobStatusView> {
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        self.require_owner(job, owner_id)?;

        let task_table = inner.tasks.get(job_id).cloned().unwrap_or_default();
        self.refresh_summary(job, &task_table, &inner.result_summaries);
        Ok(self.status_view(job))
    }

    /// Like [`Orchestrator::get_job_status`] but also includes `paramSpace`
    /// and timestamps — used for resume/duplicate flows.
    pub fn get_job_snapshot(&self, job_id: &str, owner_id: &str) -> Result<JobSnapshotView> {
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        self.require_owner(job, owner_id)?;

        let task_table = inner.tasks.get(job_id).cloned().unwrap_or_default();
        self.refresh_summary(job, &task_table, &inner.result_summaries);

        Ok(JobSnapshotView {
            status: self.status_view(job),
            param_space: job.param_space.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }

    /// Jobs owned by `owner_id`, most-recently-updated first; `limit <= 0`
    /// means unlimited.
    pub fn list_jobs(&self, owner_id: &str, limit: i64) -> Vec<JobSnapshotView> {
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let mut job_ids: Vec<String> = inner
            .jobs
            .iter()
            .filter(|(_, job)| job.owner_id == owner_id)
            .map(|(id, _)| id.clone())
            .collect();

        for id in job_ids.clone() {
            let task_table = inner.tasks.get(&id).cloned().unwrap_or_default();
            if let Some(job) = inner.jobs.get_mut(&id) {
                self.refresh_summary(job, &task_table, &inner.result_summaries);
            }
        }

        job_ids.sort_by(|a, b| {
            let ja = &inner.jobs[a];
            let jb = &inner.jobs[b];
            jb.updated_at.cmp(&ja.updated_at)
        });

        if limit > 0 {
            job_ids.truncate(limit as usize);
        }

        job_ids
            .into_iter()
            .map(|id| {
                let job = &inner.jobs[&id];
                JobSnapshotView {
                    status: self.status_view(job),
                    param_space: job.param_space.clone(),
                    created_at: job.created_at,
                    updated_at: job.updated_at,
                }
            })
            .collect()
    }
}
