//! Status enums for jobs and tasks.
//!
//! Closed sets are modeled as tagged enums rather than free-form strings,
//! per the orchestrator's tagged-variant convention.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by jobs and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Queued,
    Running,
    Succeeded,
    Failed,
    EarlyStopped,
    Canceled,
}

impl Status {
    /// Terminal statuses are the ones a job/task never leaves once entered.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Succeeded | Status::Failed | Status::EarlyStopped | Status::Canceled
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Queued => "queued",
            Status::Running => "running",
            Status::Succeeded => "succeeded",
            Status::Failed => "failed",
            Status::EarlyStopped => "early-stopped",
            Status::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a task-level failure, carried in `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskErrorType {
    ParamError,
    UpstreamError,
    InternalError,
}

impl TaskErrorType {
    /// Only upstream/internal failures are retried; param errors are terminal.
    pub const fn is_retryable(self) -> bool {
        matches!(self, TaskErrorType::UpstreamError | TaskErrorType::InternalError)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskErrorType::ParamError => "PARAM_ERROR",
            TaskErrorType::UpstreamError => "UPSTREAM_ERROR",
            TaskErrorType::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for TaskErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(Status::Succeeded.is_terminal());
        assert!(Status::Failed.is_terminal());
        assert!(Status::EarlyStopped.is_terminal());
        assert!(Status::Canceled.is_terminal());
        assert!(!Status::Queued.is_terminal());
        assert!(!Status::Running.is_terminal());
    }

    #[test]
    fn retryable_error_types() {
        assert!(!TaskErrorType::ParamError.is_retryable());
        assert!(TaskErrorType::UpstreamError.is_retryable());
        assert!(TaskErrorType::InternalError.is_retryable());
    }
}
