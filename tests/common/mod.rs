//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use multirunner::services::PollerConfig;
use tempfile::NamedTempFile;

/// Write `yaml` to a temporary config file.
///
/// The file is removed when the returned handle is dropped.
pub fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write temp config file");
    file
}

/// Poller that never sleeps between rounds.
pub fn instant_poller() -> PollerConfig {
    PollerConfig::with_interval(Duration::ZERO)
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
