//! Runtime records for started builds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse status classification used by the poller.
///
/// Only `IN_PROGRESS` and `SUCCEEDED` are special-cased. Every other value,
/// including statuses the service may add later, is a failed terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    InProgress,
    Succeeded,
    /// Terminal non-success state (`FAILED`, `FAULT`, `TIMED_OUT`, `STOPPED`, ...).
    Other(String),
}

impl BuildStatus {
    pub const IN_PROGRESS: &'static str = "IN_PROGRESS";
    pub const SUCCEEDED: &'static str = "SUCCEEDED";

    /// Classify a raw status string as reported by the service.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            Self::IN_PROGRESS => Self::InProgress,
            Self::SUCCEEDED => Self::Succeeded,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => Self::IN_PROGRESS,
            Self::Succeeded => Self::SUCCEEDED,
            Self::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl From<String> for BuildStatus {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<BuildStatus> for String {
    fn from(status: BuildStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a build delivers its CloudWatch logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsLocation {
    pub group_name: Option<String>,
    pub stream_name: Option<String>,
    /// CloudWatch Logs delivery status (`ENABLED` / `DISABLED`).
    pub cloud_watch_status: Option<String>,
}

/// A build record as returned by the build service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub id: String,
    pub status: BuildStatus,
    pub project_name: Option<String>,
    pub logs: Option<LogsLocation>,
}

impl BuildInfo {
    pub fn new(id: impl Into<String>, status: BuildStatus) -> Self {
        Self {
            id: id.into(),
            status,
            project_name: None,
            logs: None,
        }
    }
}

/// A build whose tracked lifetime has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRun {
    pub id: String,
    /// Last observed status; `None` when the service no longer knows the id.
    pub status: Option<BuildStatus>,
}

impl BuildRun {
    pub fn is_failure(&self) -> bool {
        self.status.as_ref().map_or(true, BuildStatus::is_failure)
    }
}

/// Aggregate result of one polling session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    has_failure: bool,
    runs: Vec<BuildRun>,
}

impl RunOutcome {
    /// Record terminated builds. Failure is sticky for the whole session.
    pub fn record(&mut self, finished: impl IntoIterator<Item = BuildRun>) {
        for run in finished {
            self.has_failure |= run.is_failure();
            self.runs.push(run);
        }
    }

    pub fn has_failure(&self) -> bool {
        self.has_failure
    }

    /// Terminated builds in the order they were observed.
    pub fn runs(&self) -> &[BuildRun] {
        &self.runs
    }
}

/// Progress notifications emitted by the launcher and the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Started {
        build_id: String,
        project_name: String,
    },
    StatusObserved {
        build_id: String,
        status: BuildStatus,
    },
    /// A tracked id was absent from the status response.
    Vanished { build_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(BuildStatus::from_raw("IN_PROGRESS"), BuildStatus::InProgress);
        assert_eq!(BuildStatus::from_raw("SUCCEEDED"), BuildStatus::Succeeded);
        for raw in ["FAILED", "FAULT", "TIMED_OUT", "STOPPED", "SOMETHING_NEW", ""] {
            let status = BuildStatus::from_raw(raw);
            assert!(status.is_terminal(), "{raw} should be terminal");
            assert!(status.is_failure(), "{raw} should be a failure");
            assert_eq!(status.as_str(), raw);
        }
    }

    #[test]
    fn test_in_progress_is_not_terminal() {
        assert!(!BuildStatus::InProgress.is_terminal());
        assert!(!BuildStatus::InProgress.is_failure());
        assert!(BuildStatus::Succeeded.is_terminal());
        assert!(!BuildStatus::Succeeded.is_failure());
    }

    #[test]
    fn test_outcome_failure_is_sticky() {
        let mut outcome = RunOutcome::default();
        outcome.record([BuildRun {
            id: "a:1".to_string(),
            status: Some(BuildStatus::from_raw("STOPPED")),
        }]);
        outcome.record([BuildRun {
            id: "b:1".to_string(),
            status: Some(BuildStatus::Succeeded),
        }]);
        assert!(outcome.has_failure());
        assert_eq!(outcome.runs().len(), 2);
    }

    #[test]
    fn test_vanished_run_counts_as_failure() {
        let run = BuildRun {
            id: "gone:1".to_string(),
            status: None,
        };
        assert!(run.is_failure());
    }
}
