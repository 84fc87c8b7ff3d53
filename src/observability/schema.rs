//! The exact structured-log-line shape: one JSON object per stdout line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enqueue,
    Start,
    End,
    Error,
    Stop,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    pub level: &'static str,
    pub component: String,
    pub message: String,
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(rename = "ownerId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl LogEvent {
    pub fn new(level: &'static str, component: String, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            level,
            component,
            message: message.into(),
            job_id: None,
            owner_id: None,
            phase: None,
            duration_ms: None,
            retry: None,
            code: None,
            extra: None,
        }
    }

    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("{{\"level\":\"error\",\"message\":\"log encode failed: {e}\"}}"),
        }
    }
}
