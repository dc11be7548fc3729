//! In-memory build and log services for testing.
//!
//! `MockBuildService` hands out ids of the form `<project>:<n>` and replays a
//! scripted status sequence per build id. `MockLogService` replays a fixed
//! list of pages and records every query it receives.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::ServiceError;
use crate::domain::models::{
    BuildInfo, BuildStatus, LogPage, LogQuery, LogsLocation, StartBuildRequest,
};
use crate::domain::ports::{BuildService, LogService};

#[derive(Default)]
struct BuildState {
    next_number: HashMap<String, u32>,
    scripts: HashMap<String, VecDeque<BuildStatus>>,
    logs: HashMap<String, LogsLocation>,
    started: Vec<StartBuildRequest>,
    retried: Vec<String>,
    batch_calls: Vec<Vec<String>>,
}

impl BuildState {
    fn allocate_id(&mut self, project: &str) -> String {
        let n = self.next_number.entry(project.to_string()).or_insert(0);
        *n += 1;
        format!("{project}:{n}")
    }

    /// Next scripted status; the last entry repeats forever.
    fn observe(&mut self, build_id: &str, default: Option<&BuildStatus>) -> Option<BuildStatus> {
        match self.scripts.get_mut(build_id) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => default.cloned(),
        }
    }
}

/// Scriptable [`BuildService`] fake.
pub struct MockBuildService {
    state: Mutex<BuildState>,
    failing_projects: HashSet<String>,
    fail_retry: bool,
    fail_batch: bool,
    default_status: Option<BuildStatus>,
}

impl Default for MockBuildService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBuildService {
    /// Unscripted builds report `SUCCEEDED`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BuildState::default()),
            failing_projects: HashSet::new(),
            fail_retry: false,
            fail_batch: false,
            default_status: Some(BuildStatus::Succeeded),
        }
    }

    /// StartBuild calls for this project are rejected.
    pub fn fail_start_for(mut self, project: impl Into<String>) -> Self {
        self.failing_projects.insert(project.into());
        self
    }

    /// RetryBuild calls are rejected.
    pub fn fail_retries(mut self) -> Self {
        self.fail_retry = true;
        self
    }

    /// BatchGetBuilds calls are rejected.
    pub fn fail_batch_queries(mut self) -> Self {
        self.fail_batch = true;
        self
    }

    /// Unscripted ids are reported as unknown instead of succeeded.
    pub fn unknown_by_default(mut self) -> Self {
        self.default_status = None;
        self
    }

    /// Statuses returned for `build_id` on successive queries.
    pub fn script<I, S>(self, build_id: impl Into<String>, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let script = statuses
            .into_iter()
            .map(|s| BuildStatus::from_raw(s.as_ref()))
            .collect();
        self.lock().scripts.insert(build_id.into(), script);
        self
    }

    /// Log settings reported for `build_id`.
    pub fn with_logs(self, build_id: impl Into<String>, logs: LogsLocation) -> Self {
        self.lock().logs.insert(build_id.into(), logs);
        self
    }

    /// Every StartBuild request received.
    pub fn start_requests(&self) -> Vec<StartBuildRequest> {
        self.lock().started.clone()
    }

    /// Every build id passed to RetryBuild.
    pub fn retried(&self) -> Vec<String> {
        self.lock().retried.clone()
    }

    /// The id list of every BatchGetBuilds call.
    pub fn batch_calls(&self) -> Vec<Vec<String>> {
        self.lock().batch_calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BuildState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl BuildService for MockBuildService {
    async fn start_build(&self, request: &StartBuildRequest) -> Result<BuildInfo, ServiceError> {
        let mut state = self.lock();
        state.started.push(request.clone());
        if self.failing_projects.contains(&request.project_name) {
            return Err(ServiceError::api(
                "ResourceNotFoundException",
                format!("Project cannot be found: {}", request.project_name),
            ));
        }
        let id = state.allocate_id(&request.project_name);
        Ok(BuildInfo {
            project_name: Some(request.project_name.clone()),
            ..BuildInfo::new(id, BuildStatus::InProgress)
        })
    }

    async fn retry_build(&self, build_id: &str) -> Result<BuildInfo, ServiceError> {
        let mut state = self.lock();
        state.retried.push(build_id.to_string());
        if self.fail_retry {
            return Err(ServiceError::api(
                "InvalidInputException",
                format!("Build {build_id} cannot be retried"),
            ));
        }
        let project = build_id.split(':').next().unwrap_or(build_id).to_string();
        let id = state.allocate_id(&project);
        Ok(BuildInfo {
            project_name: Some(project),
            ..BuildInfo::new(id, BuildStatus::InProgress)
        })
    }

    async fn batch_get_builds(&self, build_ids: &[String]) -> Result<Vec<BuildInfo>, ServiceError> {
        let mut state = self.lock();
        state.batch_calls.push(build_ids.to_vec());
        if self.fail_batch {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }

        let mut builds = Vec::new();
        for id in build_ids {
            let Some(status) = state.observe(id, self.default_status.as_ref()) else {
                continue;
            };
            builds.push(BuildInfo {
                logs: state.logs.get(id).cloned(),
                ..BuildInfo::new(id.clone(), status)
            });
        }
        Ok(builds)
    }
}

/// Replaying [`LogService`] fake.
pub struct MockLogService {
    pages: Mutex<VecDeque<Result<LogPage, ServiceError>>>,
    queries: Mutex<Vec<LogQuery>>,
}

impl MockLogService {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Result<LogPage, ServiceError>>,
    {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LogService for MockLogService {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, ServiceError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        let next = self.pages.lock().ok().and_then(|mut pages| pages.pop_front());
        next.unwrap_or_else(|| {
            // Out of pages: behave like the end of the stream.
            Ok(LogPage {
                events: Vec::new(),
                next_forward_token: query.next_token.clone(),
            })
        })
    }
}
