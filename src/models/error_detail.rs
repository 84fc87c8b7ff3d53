//! Per-task error payloads (`error` / `lastError` fields).

use crate::models::status::TaskErrorType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskErrorDetail {
    pub code: TaskErrorType,
    pub message: String,
}
