use super::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::models::{EarlyStopPolicy, OptimizationTask, ResultSummaryStub, Status, StopMode, StopReason};
use crate::store::lock::lock_job;
use crate::store::tasks::activate_slots;
use chrono::{DateTime, Utc};

impl Orchestrator {
    /// Mark `taskId` succeeded. No-op (returns current state) if the job is
    /// locked. Lazily creates/updates the result-summary stub, then checks
    /// whether the job's early-stop policy now triggers.
    pub fn mark_task_succeeded(
        &self,
        job_id: &str,
        task_id: &str,
        score: Option<f64>,
        result_summary_id: Option<String>,
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

        task.status = Status::Succeeded;
        task.progress = Some(1.0);
        task.throttled = false;
        task.error = None;
        task.last_error = None;
        task.score = score;
        task.result_summary_id = result_summary_id.clone();
        task.updated_at = now;
        let finished_task = task.clone();

        if let Some(id) = &result_summary_id {
            let owner_id = job.owner_id.clone();
            inner
                .result_summaries
                .entry(id.clone())
                .and_modify(|stub| stub.metrics.score = score)
                .or_insert_with(|| ResultSummaryStub::new(id.clone(), owner_id, score, now));
        }

        let job = inner.jobs.get_mut(job_id).expect("job exists");
        let task_table = inner.tasks.get_mut(job_id).expect("task table exists");
        activate_slots(task_table, job.concurrency_limit, now);
        self.refresh_summary(job, task_table, &inner.result_summaries);

        let stop = check_early_stop(job, job.early_stop_policy.as_ref(), now);
        let mut locked_tasks = Vec::new();
        if let Some(stop_reason) = stop.clone() {
            let transitioned = lock_job(job, task_table, Status::EarlyStopped, stop_reason, now);
            self.refresh_summary(job, task_table, &inner.result_summaries);
            locked_tasks = transitioned
                .iter()
                .filter_map(|id| task_table.get(id).cloned())
                .collect();
        }

        let job_snapshot = job.clone();
        let task_snapshot = task_table.get(task_id).cloned().unwrap_or_else(|| finished_task.clone());
        drop(guard);

        self.persist_update_task(&finished_task);
        self.persist_update_job(&job_snapshot);
        for task in &locked_tasks {
            self.persist_update_task(task);
        }

        if let Some(stop_reason) = &stop {
            crate::observability::log_stop(
                &self.config,
                &job_snapshot.id,
                &job_snapshot.owner_id,
                job_snapshot.status,
                stop_reason,
            );
            crate::observability::metrics::job_stop(&self.config, &job_snapshot, stop_reason);
        }

        Ok(task_snapshot)
    }
}

/// Post-success early-stop check: skip if no policy or already locked.
fn check_early_stop(
    job: &crate::models::OptimizationJob,
    policy: Option<&EarlyStopPolicy>,
    _now: DateTime<Utc>,
) -> Option<StopReason> {
    let policy = policy?;
    if job.is_locked() {
        return None;
    }
    let scores: Vec<f64> = job.summary.top_n.iter().map(|e| e.score).collect();
    if scores.is_empty() {
        return None;
    }
    let best = match policy.mode {
        StopMode::Min => scores.into_iter().fold(f64::INFINITY, f64::min),
        StopMode::Max => scores.into_iter().fold(f64::NEG_INFINITY, f64::max),
    };
    let trigger = match policy.mode {
        StopMode::Min => best <= policy.threshold,
        StopMode::Max => best >= policy.threshold,
    };
    if !trigger {
        return None;
    }
    Some(StopReason::EarlyStopThreshold {
        metric: policy.metric.clone(),
        threshold: policy.threshold,
        score: best,
        mode: policy.mode,
    })
}
