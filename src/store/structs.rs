//! The in-memory authoritative state: jobs, their tasks (in insertion
//! order), and derived result-summary stubs.

use crate::models::{OptimizationJob, OptimizationTask, ResultSummaryStub};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Plain data held behind [`Store`]'s single mutex. Every mutating helper
/// in `store::jobs` / `store::tasks` takes `&mut StoreInner` directly —
/// none of them re-acquire a lock, so one `Store::lock()` per public
/// orchestrator call is always exactly one critical section.
#[derive(Debug, Default)]
pub struct StoreInner {
    /// Insertion-ordered job table; iteration order is `jobOrder`.
    pub jobs: IndexMap<String, OptimizationJob>,
    /// Per-job, insertion-ordered task table; iteration order is `taskOrder`.
    pub tasks: HashMap<String, IndexMap<String, OptimizationTask>>,
    pub result_summaries: HashMap<String, ResultSummaryStub>,
}

impl StoreInner {
    pub fn clear(&mut self) {
        self.jobs.clear();
        self.tasks.clear();
        self.result_summaries.clear();
    }

    pub fn job_tasks(&self, job_id: &str) -> impl Iterator<Item = &OptimizationTask> {
        self.tasks.get(job_id).into_iter().flat_map(|t| t.values())
    }
}

/// Process-wide store, owned by an [`crate::orchestrator::Orchestrator`].
#[derive(Debug, Default)]
pub struct Store {
    inner: Mutex<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the single lock guarding the whole store for the duration of
    /// one public orchestrator operation.
    pub fn lock(&self) -> parking_lot::MutexGuard<'_, StoreInner> {
        self.inner.lock()
    }
}
