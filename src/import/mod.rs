//! Import module.
//!
//! Two layers:
//! - Orchestrator: per-row sequence of dependent Paddle calls
//! - Pipeline: parse CSV, validate every row, then execute

pub mod orchestrator;
pub mod pipeline;

pub use orchestrator::run;
pub use pipeline::{import_bytes, import_rows, ImportOptions};
