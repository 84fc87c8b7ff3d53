use super::views::{CreateJobRequest, CreateJobResult};
use super::Orchestrator;
use crate::error::{OrchestratorError, Result};
use crate::models::{OptimizationJob, OptimizationSummary, Status};
use crate::paramspace::normalize::normalize_param_space;
use crate::taskgen::generate_tasks;
use chrono::Utc;
use indexmap::IndexMap;
use uuid::Uuid;

impl Orchestrator {
    /// Normalize `request.paramSpace`, generate its tasks, and store the new
    /// job. Emits `throttled_requests` when any task starts throttled.
    pub fn create_optimization_job(&self, request: CreateJobRequest) -> Result<CreateJobResult> {
        if request.concurrency_limit == 0 || request.concurrency_limit > self.config.concurrency_limit_max {
            return Err(OrchestratorError::param_invalid(format!(
                "concurrencyLimit must be between 1 and {}",
                self.config.concurrency_limit_max
            )));
        }

        let (normalized, estimate) =
            normalize_param_space(&request.param_space, self.config.param_space_max)?;

        let now = Utc::now();
        let job_id = Uuid::new_v4().to_string();
        let tasks = generate_tasks(
            &normalized,
            &job_id,
            &request.owner_id,
            &request.version_id,
            request.concurrency_limit,
            now,
        );
        let throttled = tasks.iter().any(|t| t.throttled);
        let total_tasks = tasks.len();

        let mut task_table = IndexMap::new();
        for task in tasks {
            task_table.insert(task.id.clone(), task);
        }

        let mut job = OptimizationJob {
            id: job_id.clone(),
            owner_id: request.owner_id,
            version_id: request.version_id,
            param_space: request.param_space,
            concurrency_limit: request.concurrency_limit,
            early_stop_policy: request.early_stop_policy,
            status: Status::Queued,
            total_tasks,
            estimate,
            summary: OptimizationSummary::empty(total_tasks),
            locked_status: None,
            stop_reason: None,
            source_job_id: request.source_job_id.clone(),
            created_at: now,
            updated_at: now,
        };

        {
            let mut inner = self.store.lock();
            self.refresh_summary(&mut job, &task_table, &inner.result_summaries);
            inner.jobs.insert(job_id.clone(), job.clone());
            inner.tasks.insert(job_id.clone(), task_table.clone());
        }

        self.persist_job(&job, &task_table);

        if throttled {
            crate::observability::metrics::throttled_requests(&self.config, &job.id, &job.owner_id);
        }
        crate::observability::log_enqueue(&self.config, &job.id, &job.owner_id, total_tasks);

        Ok(CreateJobResult {
            id: job_id,
            status: job.status.as_str().to_string(),
            throttled,
            total_tasks,
            source_job_id: request.source_job_id,
        })
    }
}
