//! HTTP API module.
//!
//! This module provides the HTTP server, API types, and the progress log
//! broadcast used by the import pipeline.

pub mod logs;
pub mod server;
pub mod types;

pub use server::start_server;
pub use types::*;
