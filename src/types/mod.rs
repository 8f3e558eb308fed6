//! Core types shared across the crate.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Startup configuration for toolsets and observability

mod config;
mod errors;

pub use config::{Config, ObservabilityConfig, ToolsetsConfig, ALL_TOOLSETS, ENV_PREFIX};
pub use errors::{Error, ErrorKind, Result};
