//! Build launcher.
//!
//! Starts every selected build concurrently, one task per build, and waits
//! for all of them before reporting. A failed start never cancels or delays
//! its siblings.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::errors::LaunchError;
use crate::domain::models::{BuildEvent, BuildOverride, StartBuildRequest};
use crate::domain::ports::BuildService;

/// Result of launching a batch of builds.
///
/// Neither list has a meaningful order: tasks complete in any order.
#[derive(Debug, Default)]
pub struct LaunchReport {
    pub build_ids: Vec<String>,
    pub errors: Vec<LaunchError>,
}

impl LaunchReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct BuildLauncher {
    client: Arc<dyn BuildService>,
    events: Option<mpsc::Sender<BuildEvent>>,
}

impl BuildLauncher {
    pub fn new(client: Arc<dyn BuildService>) -> Self {
        Self {
            client,
            events: None,
        }
    }

    /// Send a [`BuildEvent::Started`] for every successful start.
    pub fn with_events(mut self, events: mpsc::Sender<BuildEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Start all builds and collect the new ids and the per-build failures.
    pub async fn launch_all(&self, builds: &[BuildOverride]) -> LaunchReport {
        let mut handles = Vec::with_capacity(builds.len());

        for build in builds {
            let client = self.client.clone();
            let events = self.events.clone();
            let project_name = build.project_name.clone();
            let request = StartBuildRequest::from(build);

            let handle = tokio::spawn(async move {
                let started = client
                    .start_build(&request)
                    .await
                    .map_err(|source| LaunchError::Start {
                        project_name: request.project_name.clone(),
                        source,
                    })?;

                debug!(build_id = %started.id, project = %request.project_name, "build started");
                if let Some(events) = events {
                    let _ = events
                        .send(BuildEvent::Started {
                            build_id: started.id.clone(),
                            project_name: request.project_name.clone(),
                        })
                        .await;
                }
                Ok::<_, LaunchError>(started.id)
            });

            handles.push((project_name, handle));
        }

        // Barrier: every task has finished before the report is built.
        let mut report = LaunchReport::default();
        for (project_name, handle) in handles {
            match handle.await {
                Ok(Ok(build_id)) => report.build_ids.push(build_id),
                Ok(Err(err)) => {
                    warn!(
                        project = %err.project_name(),
                        error = &err as &dyn std::error::Error,
                        "build failed to start"
                    );
                    report.errors.push(err);
                }
                Err(join_err) => report.errors.push(LaunchError::Aborted {
                    project_name,
                    reason: join_err.to_string(),
                }),
            }
        }

        debug!(
            started = report.build_ids.len(),
            failed = report.errors.len(),
            "launch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockBuildService;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let client = Arc::new(MockBuildService::new().fail_start_for("p2"));
        let launcher = BuildLauncher::new(client.clone());

        let report = launcher
            .launch_all(&[BuildOverride::for_project("p1"), BuildOverride::for_project("p2")])
            .await;

        assert_eq!(report.build_ids, vec!["p1:1".to_string()]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].project_name(), "p2");
        assert!(report.errors[0].to_string().contains("p2"));
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_all_builds_are_started() {
        let client = Arc::new(MockBuildService::new());
        let launcher = BuildLauncher::new(client.clone());
        let builds: Vec<BuildOverride> = (0..8)
            .map(|i| BuildOverride::for_project(format!("svc{i}")))
            .collect();

        let report = launcher.launch_all(&builds).await;

        assert!(!report.has_errors());
        let ids: HashSet<String> = report.build_ids.into_iter().collect();
        let expected: HashSet<String> = (0..8).map(|i| format!("svc{i}:1")).collect();
        assert_eq!(ids, expected);
        assert_eq!(client.start_requests().len(), 8);
    }

    #[tokio::test]
    async fn test_same_project_twice_gets_distinct_ids() {
        let client = Arc::new(MockBuildService::new());
        let launcher = BuildLauncher::new(client);

        let report = launcher
            .launch_all(&[BuildOverride::for_project("api"), BuildOverride::for_project("api")])
            .await;

        let ids: HashSet<String> = report.build_ids.into_iter().collect();
        assert_eq!(ids, HashSet::from(["api:1".to_string(), "api:2".to_string()]));
    }

    #[tokio::test]
    async fn test_request_omits_empty_overrides() {
        let client = Arc::new(MockBuildService::new());
        let launcher = BuildLauncher::new(client.clone());
        let build = BuildOverride {
            source_version: Some(String::new()),
            image_override: Some("custom:1".to_string()),
            ..BuildOverride::for_project("api")
        };

        launcher.launch_all(&[build]).await;

        let requests = client.start_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source_version, None);
        assert_eq!(requests[0].image_override.as_deref(), Some("custom:1"));
    }

    #[tokio::test]
    async fn test_started_events_are_emitted() {
        let client = Arc::new(MockBuildService::new());
        let (tx, mut rx) = mpsc::channel(16);
        let launcher = BuildLauncher::new(client).with_events(tx);

        launcher
            .launch_all(&[BuildOverride::for_project("a"), BuildOverride::for_project("b")])
            .await;
        drop(launcher);

        let mut started = HashSet::new();
        while let Some(event) = rx.recv().await {
            if let BuildEvent::Started { build_id, .. } = event {
                started.insert(build_id);
            }
        }
        assert_eq!(started, HashSet::from(["a:1".to_string(), "b:1".to_string()]));
    }

    #[tokio::test]
    async fn test_empty_input_starts_nothing() {
        let client = Arc::new(MockBuildService::new());
        let report = BuildLauncher::new(client.clone()).launch_all(&[]).await;
        assert!(report.build_ids.is_empty());
        assert!(!report.has_errors());
        assert!(client.start_requests().is_empty());
    }
}
