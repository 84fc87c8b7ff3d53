//! Global constants for the optimization orchestrator.
//!
//! This module centralizes defaults and hard caps used throughout the
//! param-space normalizer, task generator, and orchestrator core.

/// Default maximum Cartesian-product size accepted at job creation.
pub const DEFAULT_PARAM_SPACE_MAX: u64 = 500;

/// Default maximum `concurrencyLimit` a job may request.
pub const DEFAULT_CONCURRENCY_LIMIT_MAX: u32 = 16;

/// Default Top-N leaderboard cap.
pub const DEFAULT_TOP_N_LIMIT: usize = 5;

/// Default maximum retry count for retryable task failures.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base (seconds) for exponential retry backoff.
pub const DEFAULT_RETRY_BASE_SECONDS: u64 = 2;

/// Default component tag attached to structured log lines.
pub const DEFAULT_WORKER_COMPONENT: &str = "optimization-orchestrator";

/// Default socket address the `serve` CLI subcommand binds to.
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8080";

/// Hard cap on generated tasks regardless of the computed estimate.
pub const MAX_TASK_CAP: usize = 1000;

/// Hard guard on the number of values a single range dimension may expand to.
pub const MAX_RANGE_VALUES: u64 = 1_000_000;

/// Decimal places used to round generated range values and tame float drift.
pub const RANGE_ROUND_DECIMALS: u32 = 12;
