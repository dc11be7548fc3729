//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - human-readable or JSON output on stderr
//! - optional daily JSON log file via tracing-appender

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
