//! The orchestrator core: the job/task state machine.
//!
//! Every public method here acquires [`Store::lock`] exactly once and holds
//! it for the whole call, including summary refresh and persistence
//! write-through, per the store's single-critical-section design.

mod cancel;
mod create;
mod debug;
mod dequeue;
mod export;
mod failure;
mod query;
mod success;
pub mod views;

use crate::config::AppConfig;
use crate::error::{OrchestratorError, Result};
use crate::models::{OptimizationJob, OptimizationTask};
use crate::persistence::PersistenceMirror;
use crate::store::Store;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use views::{Diagnostics, JobStatusView};

/// Owns the in-memory [`Store`], the resolved [`AppConfig`], and an
/// optional persistence mirror. Cheap to hold behind an `Arc` and share
/// across the HTTP layer and the CLI.
pub struct Orchestrator {
    store: Store,
    config: AppConfig,
    persistence: RwLock<Option<PersistenceMirror>>,
}

impl Orchestrator {
    /// Build a fresh orchestrator, eagerly configuring persistence when
    /// `config.db_dsn` is set and hydrating from any existing rows.
    pub fn new(config: AppConfig) -> Result<Self> {
        let orchestrator = Self {
            store: Store::new(),
            config,
            persistence: RwLock::new(None),
        };
        if let Some(dsn) = orchestrator.config.db_dsn.clone() {
            orchestrator.configure_persistence(Some(dsn))?;
        }
        Ok(orchestrator)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// (Re)configure the persistence mirror and hydrate the in-memory store
    /// from it without writing back — used at startup and by tests that
    /// exercise the persist/hydrate round trip against a fresh store.
    pub fn configure_persistence(&self, dsn: Option<String>) -> Result<()> {
        let mut slot = self.persistence.write();
        match dsn {
            None => {
                *slot = None;
            }
            Some(dsn) => {
                let mirror = PersistenceMirror::connect(&dsn)
                    .map_err(|e| OrchestratorError::internal(format!("persistence connect failed: {e}")))?;
                let hydrated = mirror.hydrate_all();
                let mut inner = self.store.lock();
                inner.clear();
                for (mut job, tasks) in hydrated {
                    let result_scores = result_scores_from(&tasks);
                    let updated_at = job.updated_at;
                    crate::store::summary::refresh(
                        &mut job,
                        &tasks,
                        &result_scores,
                        self.config.top_n_limit,
                        updated_at,
                    );
                    inner.tasks.insert(job.id.clone(), tasks);
                    inner.jobs.insert(job.id.clone(), job);
                }
                drop(inner);
                *slot = Some(mirror);
            }
        }
        Ok(())
    }

    fn persist_job(&self, job: &OptimizationJob, tasks: &IndexMap<String, OptimizationTask>) {
        if let Some(mirror) = self.persistence.read().as_ref() {
            mirror.persist_job(job, tasks);
        }
    }

    fn persist_update_job(&self, job: &OptimizationJob) {
        if let Some(mirror) = self.persistence.read().as_ref() {
            mirror.update_job(job);
        }
    }

    fn persist_update_task(&self, task: &OptimizationTask) {
        if let Some(mirror) = self.persistence.read().as_ref() {
            mirror.update_task(task);
        }
    }

    fn persist_truncate(&self) {
        if let Some(mirror) = self.persistence.read().as_ref() {
            mirror.truncate();
        }
    }

    /// Refresh `job`'s summary against its own task table and result-summary
    /// cache. Callers already hold the store lock; this never re-locks.
    fn refresh_summary(
        &self,
        job: &mut OptimizationJob,
        tasks: &IndexMap<String, OptimizationTask>,
        result_summaries: &HashMap<String, crate::models::ResultSummaryStub>,
    ) -> bool {
        let result_scores = result_scores_for_job(tasks, result_summaries);
        crate::store::summary::refresh(job, tasks, &result_scores, self.config.top_n_limit, Utc::now())
    }

    fn require_owner<'a>(&self, job: &'a OptimizationJob, owner_id: &str) -> Result<&'a OptimizationJob> {
        if job.owner_id != owner_id {
            return Err(OrchestratorError::forbidden("owner mismatch"));
        }
        Ok(job)
    }

    fn status_view(&self, job: &OptimizationJob) -> JobStatusView {
        let throttled = job.summary.throttled > 0;
        JobStatusView {
            id: job.id.clone(),
            status: job.status.as_str().to_string(),
            total_tasks: job.total_tasks,
            concurrency_limit: job.concurrency_limit,
            summary: job.summary.clone(),
            diagnostics: Diagnostics {
                throttled,
                queue_depth: job.summary.throttled,
                running: job.summary.running,
                is_final: job.is_locked().then_some(true),
                stop_reason: job.stop_reason.clone(),
            },
            early_stop_policy: job.early_stop_policy.clone(),
            source_job_id: job.source_job_id.clone(),
        }
    }
}

/// Build the `resultSummaryId → score` lookup used to override a task's own
/// `score` with the (possibly more current) stub metric.
fn result_scores_for_job(
    tasks: &IndexMap<String, OptimizationTask>,
    result_summaries: &HashMap<String, crate::models::ResultSummaryStub>,
) -> HashMap<String, f64> {
    tasks
        .values()
        .filter_map(|t| {
            let id = t.result_summary_id.as_ref()?;
            let score = result_summaries.get(id)?.metrics.score?;
            Some((id.clone(), score))
        })
        .collect()
}

fn result_scores_from(tasks: &IndexMap<String, OptimizationTask>) -> HashMap<String, f64> {
    tasks
        .values()
        .filter_map(|t| t.result_summary_id.clone().zip(t.score))
        .collect()
}
