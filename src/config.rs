//! Environment-driven configuration, loaded once at process start.

use crate::constants::*;
use std::env;

/// Orchestrator-wide settings. Cheap to clone; threaded through the
/// orchestrator core, the HTTP layer, and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub param_space_max: u64,
    pub concurrency_limit_max: u32,
    pub top_n_limit: usize,
    pub max_retries: u32,
    pub retry_base_seconds: u64,
    pub db_dsn: Option<String>,
    pub shared_secret: Option<String>,
    pub obs_enabled: bool,
    pub obs_metrics_enabled: bool,
    pub worker_component: String,
    pub http_bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            param_space_max: DEFAULT_PARAM_SPACE_MAX,
            concurrency_limit_max: DEFAULT_CONCURRENCY_LIMIT_MAX,
            top_n_limit: DEFAULT_TOP_N_LIMIT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_seconds: DEFAULT_RETRY_BASE_SECONDS,
            db_dsn: None,
            shared_secret: None,
            obs_enabled: true,
            obs_metrics_enabled: true,
            worker_component: DEFAULT_WORKER_COMPONENT.to_string(),
            http_bind: DEFAULT_HTTP_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            param_space_max: env_u64_min1("OPT_PARAM_SPACE_MAX", defaults.param_space_max),
            concurrency_limit_max: env_u32_min1(
                "OPT_CONCURRENCY_LIMIT_MAX",
                defaults.concurrency_limit_max,
            ),
            top_n_limit: env_usize_min1("OPT_TOP_N_LIMIT", defaults.top_n_limit),
            max_retries: env_u32_min0("OPT_MAX_RETRIES", defaults.max_retries),
            retry_base_seconds: env_u64_min1("OPT_RETRY_BASE_SECONDS", defaults.retry_base_seconds),
            db_dsn: env::var("OPTIMIZATION_DB_DSN")
                .ok()
                .filter(|v| !v.is_empty()),
            shared_secret: env::var("OPTIMIZATION_ORCHESTRATOR_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
            obs_enabled: env_bool("OBS_ENABLED", defaults.obs_enabled),
            obs_metrics_enabled: env_bool("OBS_METRICS_ENABLED", defaults.obs_metrics_enabled),
            worker_component: env::var("WORKER_COMPONENT")
                .unwrap_or(defaults.worker_component),
            http_bind: env::var("OPT_HTTP_BIND").unwrap_or(defaults.http_bind),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => raw.to_lowercase() != "false",
        Err(_) => default,
    }
}

fn env_u64_min1(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(|v| v.max(1))
        .unwrap_or(default)
}

fn env_u32_min1(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .map(|v| v.max(1))
        .unwrap_or(default)
}

fn env_u32_min0(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_usize_min1(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .map(|v| v.max(1))
        .unwrap_or(default)
}
