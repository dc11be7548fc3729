//! Domain errors for the build orchestration core.
//!
//! Each concern owns its own error enum so callers can tell a bad
//! configuration apart from a build that failed to start, a broken status
//! query, or an unreadable log stream.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a remote collaborator (build service or log store).
///
/// The core never interprets these beyond "the call did not succeed".
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("{code}: {message}")]
    Api { code: String, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Convenience constructor for API-level rejections.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading or resolving the build configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("`builds` field not found in config file")]
    BuildsFieldNotFound,

    #[error("unexpected type for `builds` field: {0}")]
    UnexpectedBuildsType(&'static str),

    #[error("group name must be a string, found {0}")]
    InvalidGroupName(&'static str),

    #[error("group '{group}' must be a list of builds, found {found}")]
    InvalidGroup { group: String, found: &'static str },

    #[error("invalid build definition at {location}: {reason}")]
    InvalidBuild { location: String, reason: String },

    #[error("--targets option is only available for the map format configuration file")]
    TargetsNotSupported,

    #[error("targets group(s) not found in config file: {}", .0.join(", "))]
    UnknownTargets(Vec<String>),

    #[error("failed to serialize config: {0}")]
    SerializeFailed(String),
}

/// A single build that could not be started.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start build for project {project_name}")]
    Start {
        project_name: String,
        #[source]
        source: ServiceError,
    },

    #[error("start task for project {project_name} aborted: {reason}")]
    Aborted { project_name: String, reason: String },
}

impl LaunchError {
    /// Project the failed launch belonged to.
    pub fn project_name(&self) -> &str {
        match self {
            Self::Start { project_name, .. } | Self::Aborted { project_name, .. } => project_name,
        }
    }
}

/// Errors that end a polling session.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("build status query failed")]
    Query(#[source] ServiceError),

    #[error(
        "gave up waiting after {waited_secs}s; still in progress: {}",
        remaining.join(", ")
    )]
    DeadlineExceeded {
        waited_secs: u64,
        remaining: Vec<String>,
    },
}

/// Errors raised by the `retry` workflow.
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("failed to retry build {build_id}")]
    Retry {
        build_id: String,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Poll(#[from] PollError),
}

/// Errors raised while locating or tailing a build log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("you must supply a logGroupName and logStreamName")]
    EmptyTarget,

    #[error("{0} is not found")]
    BuildNotFound(String),

    #[error("CloudWatch Logs for {0} is Disabled")]
    Disabled(String),

    #[error("CloudWatch Logs settings for {0} are incomplete")]
    MissingSettings(String),

    #[error("failed to look up build {build_id}")]
    Lookup {
        build_id: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to fetch log events")]
    Fetch(#[source] ServiceError),
}
