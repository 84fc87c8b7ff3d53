//! `clap`-based binary front-end: `serve`, `debug-reset`, `health`.

pub mod args;
pub mod commands;

pub use args::Cli;
