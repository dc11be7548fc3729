//! Infrastructure layer module
//!
//! - Configuration: build file loading and tool settings
//! - Logging: tracing subscriber setup

pub mod config;
pub mod logging;
