//! Status poller.
//!
//! Follows a set of in-flight build ids until every one of them reaches a
//! terminal state. Each tick sleeps for the polling interval, then issues a
//! single batch status query for the whole tracked set.
//!
//! Per build id the state machine is `IN_PROGRESS -> {SUCCEEDED, other}`;
//! both terminal states drop the id from tracking. Any terminal state other
//! than `SUCCEEDED` marks the session as failed, and that mark is never
//! cleared. Ids the service stops reporting are dropped and counted as
//! failures, since they can no longer succeed.
//!
//! There is no built-in iteration cap. Callers that want one configure
//! [`PollerConfig::deadline`]; once it has elapsed with builds still running
//! the session ends with [`PollError::DeadlineExceeded`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::PollError;
use crate::domain::models::{BuildEvent, BuildRun, BuildStatus, RunOutcome};
use crate::domain::ports::BuildService;

/// Polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Sleep before each status query.
    pub interval: Duration,
    /// Give up once this much time has passed with builds still running.
    pub deadline: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            deadline: None,
        }
    }
}

impl PollerConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }
}

/// Result of a single status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollRound {
    /// Ids still in progress, in tracking order.
    pub in_progress: Vec<String>,
    /// Ids that left tracking in this round.
    pub finished: Vec<BuildRun>,
}

impl PollRound {
    pub fn has_failure(&self) -> bool {
        self.finished.iter().any(BuildRun::is_failure)
    }
}

pub struct StatusPoller {
    client: Arc<dyn BuildService>,
    config: PollerConfig,
    events: Option<mpsc::Sender<BuildEvent>>,
}

impl StatusPoller {
    pub fn new(client: Arc<dyn BuildService>, config: PollerConfig) -> Self {
        Self {
            client,
            config,
            events: None,
        }
    }

    /// Send a [`BuildEvent`] for every observed status.
    pub fn with_events(mut self, events: mpsc::Sender<BuildEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> PollerConfig {
        self.config
    }

    /// Poll until the tracked set is empty.
    ///
    /// An empty `build_ids` returns a successful outcome without any query.
    /// A failed status query aborts the session.
    #[instrument(skip(self, build_ids), fields(builds = build_ids.len()))]
    pub async fn poll_until_done(&self, build_ids: Vec<String>) -> Result<RunOutcome, PollError> {
        let started = Instant::now();
        let mut tracked = dedup(build_ids);
        let mut outcome = RunOutcome::default();

        while !tracked.is_empty() {
            sleep(self.config.interval).await;

            let round = self.poll_once(&tracked).await?;
            outcome.record(round.finished);
            tracked = round.in_progress;

            if tracked.is_empty() {
                break;
            }
            if let Some(deadline) = self.config.deadline {
                let waited = started.elapsed();
                if waited >= deadline {
                    warn!(remaining = tracked.len(), "polling deadline exceeded");
                    return Err(PollError::DeadlineExceeded {
                        waited_secs: waited.as_secs(),
                        remaining: tracked,
                    });
                }
            }
            debug!(remaining = tracked.len(), "builds still in progress");
        }

        info!(failed = outcome.has_failure(), "all builds finished");
        Ok(outcome)
    }

    /// Issue one batch query for `tracked` and classify the response.
    pub async fn poll_once(&self, tracked: &[String]) -> Result<PollRound, PollError> {
        let builds = self
            .client
            .batch_get_builds(tracked)
            .await
            .map_err(PollError::Query)?;

        let mut observed: HashMap<String, BuildStatus> = HashMap::with_capacity(builds.len());
        for build in builds {
            if tracked.contains(&build.id) {
                observed.insert(build.id, build.status);
            } else {
                debug!(build_id = %build.id, "ignoring untracked build in response");
            }
        }

        let mut round = PollRound::default();
        for id in tracked {
            match observed.remove(id) {
                Some(status) => {
                    debug!(build_id = %id, status = %status, "build status");
                    self.emit(BuildEvent::StatusObserved {
                        build_id: id.clone(),
                        status: status.clone(),
                    })
                    .await;
                    if status.is_terminal() {
                        round.finished.push(BuildRun {
                            id: id.clone(),
                            status: Some(status),
                        });
                    } else {
                        round.in_progress.push(id.clone());
                    }
                }
                None => {
                    warn!(build_id = %id, "build missing from status response");
                    self.emit(BuildEvent::Vanished {
                        build_id: id.clone(),
                    })
                    .await;
                    round.finished.push(BuildRun {
                        id: id.clone(),
                        status: None,
                    });
                }
            }
        }

        Ok(round)
    }

    async fn emit(&self, event: BuildEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event).await;
        }
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
