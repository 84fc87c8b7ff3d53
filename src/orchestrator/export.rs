use super::views::{ExportBundle, ExportItem};
use super::Orchestrator;
use crate::error::{OrchestratorError, Result};
use chrono::Utc;

impl Orchestrator {
    /// Refresh the summary, then join each Top-N entry's task params and
    /// result-summary stub into a single exportable bundle.
    pub fn export_top_n_bundle(&self, job_id: &str, owner_id: &str) -> Result<ExportBundle> {
        let mut guard = self.store.lock();
        let inner = &mut *guard;

        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job not found"))?;
        self.require_owner(job, owner_id)?;

        let task_table = inner.tasks.get(job_id).cloned().unwrap_or_default();
        self.refresh_summary(job, &task_table, &inner.result_summaries);

        let items = job
            .summary
            .top_n
            .iter()
            .map(|entry| {
                let params = task_table
                    .get(&entry.task_id)
                    .map(|t| serde_json::to_value(&t.params).unwrap_or(serde_json::Value::Null))
                    .unwrap_or(serde_json::Value::Null);
                let stub = entry
                    .result_summary_id
                    .as_ref()
                    .and_then(|id| inner.result_summaries.get(id));
                ExportItem {
                    task_id: entry.task_id.clone(),
                    score: entry.score,
                    result_summary_id: entry.result_summary_id.clone(),
                    params,
                    metrics: stub.map(|s| serde_json::to_value(&s.metrics).unwrap_or(serde_json::Value::Null)),
                    artifacts: stub.map(|s| serde_json::to_value(&s.artifacts).unwrap_or(serde_json::Value::Null)),
                }
            })
            .collect();

        Ok(ExportBundle {
            job_id: job.id.clone(),
            status: job.status.as_str().to_string(),
            generated_at: Utc::now(),
            summary: job.summary.clone(),
            items,
        })
    }
}
