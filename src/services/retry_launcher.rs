//! Retry launcher: retry one build and optionally follow it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::errors::RetryError;
use crate::domain::models::{BuildEvent, RunOutcome};
use crate::domain::ports::BuildService;
use crate::services::status_poller::StatusPoller;

/// What happened to a retried build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    /// Id of the fresh build created by the retry.
    pub build_id: String,
    /// `None` when the caller chose not to wait.
    pub outcome: Option<RunOutcome>,
}

impl RetryReport {
    /// `false` when not waited: nothing has been observed to fail yet, which
    /// is not the same as the build having succeeded.
    pub fn has_failure(&self) -> bool {
        self.outcome.as_ref().is_some_and(RunOutcome::has_failure)
    }
}

pub struct RetryLauncher {
    client: Arc<dyn BuildService>,
    poller: StatusPoller,
    events: Option<mpsc::Sender<BuildEvent>>,
}

impl RetryLauncher {
    pub fn new(client: Arc<dyn BuildService>, poller: StatusPoller) -> Self {
        Self {
            client,
            poller,
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::Sender<BuildEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Retry `build_id`; when `wait` is set, poll the new build to completion.
    pub async fn retry_and_optionally_wait(
        &self,
        build_id: &str,
        wait: bool,
    ) -> Result<RetryReport, RetryError> {
        let retried = self
            .client
            .retry_build(build_id)
            .await
            .map_err(|source| RetryError::Retry {
                build_id: build_id.to_string(),
                source,
            })?;

        debug!(build_id = %retried.id, retried_from = %build_id, "build retried");
        if let Some(events) = &self.events {
            let _ = events
                .send(BuildEvent::Started {
                    build_id: retried.id.clone(),
                    project_name: retried.project_name.clone().unwrap_or_default(),
                })
                .await;
        }

        if !wait {
            return Ok(RetryReport {
                build_id: retried.id,
                outcome: None,
            });
        }

        let outcome = self.poller.poll_until_done(vec![retried.id.clone()]).await?;
        Ok(RetryReport {
            build_id: retried.id,
            outcome: Some(outcome),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockBuildService;
    use crate::services::status_poller::PollerConfig;
    use std::time::Duration;

    fn launcher(client: Arc<MockBuildService>) -> RetryLauncher {
        let poller = StatusPoller::new(client.clone(), PollerConfig::with_interval(Duration::ZERO));
        RetryLauncher::new(client, poller)
    }

    #[tokio::test]
    async fn test_no_wait_returns_immediately() {
        let client = Arc::new(MockBuildService::new());
        let report = launcher(client.clone())
            .retry_and_optionally_wait("api:1", false)
            .await
            .unwrap();

        assert_eq!(report.build_id, "api:1");
        assert!(report.outcome.is_none());
        assert!(!report.has_failure());
        assert_eq!(client.retried(), vec!["api:1".to_string()]);
        assert!(client.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_wait_polls_the_new_id() {
        let client = Arc::new(MockBuildService::new().script("api:1", ["IN_PROGRESS", "FAILED"]));
        let report = launcher(client.clone())
            .retry_and_optionally_wait("api:7", true)
            .await
            .unwrap();

        assert_eq!(report.build_id, "api:1");
        assert!(report.has_failure());
        assert_eq!(client.batch_calls().len(), 2);
        assert!(client.batch_calls().iter().all(|call| call == &["api:1".to_string()]));
    }

    #[tokio::test]
    async fn test_wait_success() {
        let client = Arc::new(MockBuildService::new());
        let report = launcher(client)
            .retry_and_optionally_wait("web:3", true)
            .await
            .unwrap();
        assert!(!report.has_failure());
        assert_eq!(report.outcome.map(|o| o.runs().len()), Some(1));
    }

    #[tokio::test]
    async fn test_retry_failure_propagates() {
        let client = Arc::new(MockBuildService::new().fail_retries());
        let err = launcher(client.clone())
            .retry_and_optionally_wait("api:1", true)
            .await
            .unwrap_err();

        assert!(matches!(err, RetryError::Retry { ref build_id, .. } if build_id == "api:1"));
        assert!(client.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_poll_failure_propagates() {
        let client = Arc::new(MockBuildService::new().fail_batch_queries());
        let err = launcher(client)
            .retry_and_optionally_wait("api:1", true)
            .await
            .unwrap_err();
        assert!(matches!(err, RetryError::Poll(_)));
    }
}
