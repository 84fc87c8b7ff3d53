//! Write-through SQLite mirror. In-memory state is authoritative at
//! runtime; every write here swallows backend errors (logged at `warn`)
//! rather than propagating them to the caller.

use super::schema::{self, JobRow, TaskRow};
use crate::error::Result;
use crate::models::{OptimizationJob, OptimizationTask};
use indexmap::IndexMap;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct PersistenceMirror {
    pool: SqlitePool,
}

impl PersistenceMirror {
    pub fn connect(dsn: &str) -> std::result::Result<Self, sqlx::Error> {
        block_on(async {
            let options = SqliteConnectOptions::from_str(dsn)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
            sqlx::query(schema::CREATE_JOBS_TABLE).execute(&pool).await?;
            sqlx::query(schema::CREATE_TASKS_TABLE).execute(&pool).await?;
            Ok(Self { pool })
        })
    }

    /// Insert a freshly-created job and all of its tasks in one transaction.
    pub fn persist_job(&self, job: &OptimizationJob, tasks: &IndexMap<String, OptimizationTask>) {
        let result = self.try_persist_job(job, tasks);
        warn_on_err("persist_job", result);
    }

    fn try_persist_job(&self, job: &OptimizationJob, tasks: &IndexMap<String, OptimizationTask>) -> Result<()> {
        let job_row = JobRow::from_job(job)?;
        let task_rows: std::result::Result<Vec<TaskRow>, _> = tasks.values().map(TaskRow::from_task).collect();
        let task_rows = task_rows?;
        block_on(async {
            let mut tx = self.pool.begin().await.map_err(sql_err)?;
            insert_job(&mut tx, &job_row).await.map_err(sql_err)?;
            for row in &task_rows {
                insert_task(&mut tx, row).await.map_err(sql_err)?;
            }
            tx.commit().await.map_err(sql_err)?;
            Ok(())
        })
    }

    pub fn update_task(&self, task: &OptimizationTask) {
        let result = self.try_update_task(task);
        warn_on_err("update_task", result);
    }

    fn try_update_task(&self, task: &OptimizationTask) -> Result<()> {
        let row = TaskRow::from_task(task)?;
        block_on(async {
            let mut conn = self.pool.acquire().await.map_err(sql_err)?;
            match upsert_task(&mut conn, &row).await {
                Ok(_) => Ok(()),
                Err(e) => Err(sql_err(e)),
            }
        })
    }

    pub fn update_job(&self, job: &OptimizationJob) {
        let result = self.try_update_job(job);
        warn_on_err("update_job", result);
    }

    fn try_update_job(&self, job: &OptimizationJob) -> Result<()> {
        let row = JobRow::from_job(job)?;
        block_on(async {
            let mut conn = self.pool.acquire().await.map_err(sql_err)?;
            match upsert_job(&mut conn, &row).await {
                Ok(_) => Ok(()),
                Err(e) => Err(sql_err(e)),
            }
        })
    }

    pub fn truncate(&self) {
        let result: Result<()> = block_on(async {
            sqlx::query("DELETE FROM optimization_tasks").execute(&self.pool).await.map_err(sql_err)?;
            sqlx::query("DELETE FROM optimization_jobs").execute(&self.pool).await.map_err(sql_err)?;
            Ok(())
        });
        warn_on_err("truncate", result);
    }

    /// Load every job ordered by `created_at`, and its tasks, for hydration.
    pub fn hydrate_all(&self) -> Vec<(OptimizationJob, IndexMap<String, OptimizationTask>)> {
        let result = self.try_hydrate_all();
        match result {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(code = "PERSISTENCE_ERROR", error = %e, "hydrate_all failed");
                Vec::new()
            }
        }
    }

    fn try_hydrate_all(&self) -> Result<Vec<(OptimizationJob, IndexMap<String, OptimizationTask>)>> {
        block_on(async {
            let job_rows: Vec<JobRow> = sqlx::query_as("SELECT * FROM optimization_jobs ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(sql_err)?;

            let mut jobs = Vec::with_capacity(job_rows.len());
            for job_row in job_rows {
                let job_id = job_row.id.clone();
                let task_rows: Vec<TaskRow> = sqlx::query_as(
                    "SELECT * FROM optimization_tasks WHERE job_id = ? ORDER BY created_at ASC",
                )
                .bind(&job_id)
                .fetch_all(&self.pool)
                .await
                .map_err(sql_err)?;

                let job = job_row.into_job()?;
                let mut task_table = IndexMap::new();
                for row in task_rows {
                    let task = row.into_task()?;
                    task_table.insert(task.id.clone(), task);
                }
                jobs.push((job, task_table));
            }
            Ok(jobs)
        })
    }
}

async fn insert_job(tx: &mut sqlx::SqliteConnection, row: &JobRow) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO optimization_jobs (id, owner, version, param_space, concurrency_limit, early_stop_policy, status, total_tasks, estimate, summary, locked_status, stop_reason, source_job_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.owner)
    .bind(&row.version)
    .bind(&row.param_space)
    .bind(row.concurrency_limit)
    .bind(&row.early_stop_policy)
    .bind(&row.status)
    .bind(row.total_tasks)
    .bind(row.estimate)
    .bind(&row.summary)
    .bind(&row.locked_status)
    .bind(&row.stop_reason)
    .bind(&row.source_job_id)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut *tx)
    .await?;
    Ok(())
}

async fn insert_task(tx: &mut sqlx::SqliteConnection, row: &TaskRow) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO optimization_tasks (id, job_id, owner, version, param_set, status, progress, retries, throttled, next_run_at, score, result_summary_id, error, last_error, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.id)
    .bind(&row.job_id)
    .bind(&row.owner)
    .bind(&row.version)
    .bind(&row.param_set)
    .bind(&row.status)
    .bind(row.progress)
    .bind(row.retries)
    .bind(row.throttled)
    .bind(row.next_run_at)
    .bind(row.score)
    .bind(&row.result_summary_id)
    .bind(&row.error)
    .bind(&row.last_error)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut *tx)
    .await?;
    Ok(())
}

async fn upsert_job(conn: &mut sqlx::pool::PoolConnection<sqlx::Sqlite>, row: &JobRow) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO optimization_jobs (id, owner, version, param_space, concurrency_limit, early_stop_policy, status, total_tasks, estimate, summary, locked_status, stop_reason, source_job_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET owner=excluded.owner, version=excluded.version, param_space=excluded.param_space, \
         concurrency_limit=excluded.concurrency_limit, early_stop_policy=excluded.early_stop_policy, status=excluded.status, \
         total_tasks=excluded.total_tasks, estimate=excluded.estimate, summary=excluded.summary, locked_status=excluded.locked_status, \
         stop_reason=excluded.stop_reason, source_job_id=excluded.source_job_id, updated_at=excluded.updated_at",
    )
    .bind(&row.id)
    .bind(&row.owner)
    .bind(&row.version)
    .bind(&row.param_space)
    .bind(row.concurrency_limit)
    .bind(&row.early_stop_policy)
    .bind(&row.status)
    .bind(row.total_tasks)
    .bind(row.estimate)
    .bind(&row.summary)
    .bind(&row.locked_status)
    .bind(&row.stop_reason)
    .bind(&row.source_job_id)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut **conn)
    .await?;
    Ok(())
}

async fn upsert_task(conn: &mut sqlx::pool::PoolConnection<sqlx::Sqlite>, row: &TaskRow) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO optimization_tasks (id, job_id, owner, version, param_set, status, progress, retries, throttled, next_run_at, score, result_summary_id, error, last_error, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET status=excluded.status, progress=excluded.progress, retries=excluded.retries, \
         throttled=excluded.throttled, next_run_at=excluded.next_run_at, score=excluded.score, \
         result_summary_id=excluded.result_summary_id, error=excluded.error, last_error=excluded.last_error, updated_at=excluded.updated_at",
    )
    .bind(&row.id)
    .bind(&row.job_id)
    .bind(&row.owner)
    .bind(&row.version)
    .bind(&row.param_set)
    .bind(&row.status)
    .bind(row.progress)
    .bind(row.retries)
    .bind(row.throttled)
    .bind(row.next_run_at)
    .bind(row.score)
    .bind(&row.result_summary_id)
    .bind(&row.error)
    .bind(&row.last_error)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut **conn)
    .await?;
    Ok(())
}

fn sql_err(e: sqlx::Error) -> crate::error::OrchestratorError {
    crate::error::OrchestratorError::internal(format!("sqlite error: {e}"))
}

fn warn_on_err(op: &str, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!(code = "PERSISTENCE_ERROR", operation = op, error = %e, "persistence write failed");
    }
}

/// Run `fut` to completion from synchronous code. Inside a running tokio
/// runtime this uses `block_in_place` (requires the multi-thread runtime);
/// outside one, it spins up a throwaway current-thread runtime.
fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => tokio::task::block_in_place(|| handle.block_on(fut)),
        Err(_) => tokio::runtime::Runtime::new()
            .expect("failed to start fallback runtime for persistence I/O")
            .block_on(fut),
    }
}
