//! Optimization orchestrator — core library.
//!
//! Accepts declarative parameter search spaces, materializes bounded task
//! lists, and drives dispatch/retry/early-stop/cancel as an in-memory state
//! machine with an optional SQLite mirror. See the `orchestrator` module for
//! the public operations and `http` for the HTTP surface built on top of
//! them.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod paramspace;
pub mod persistence;
pub mod store;
pub mod taskgen;
pub mod worker;

pub use config::AppConfig;
pub use error::{ErrorCode, OrchestratorError, Result};
pub use orchestrator::Orchestrator;
