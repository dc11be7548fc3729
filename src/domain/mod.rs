//! Domain layer for the build orchestration core
//!
//! This module contains the data model, the error taxonomy, and the port
//! traits the services are written against.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ConfigError, LaunchError, LogError, PollError, RetryError, ServiceError};
