//! codebuild-multirunner
//!
//! Start builds with parameter overrides for many AWS CodeBuild projects at
//! once, follow them until they finish, retry single builds, and print build
//! logs from CloudWatch Logs.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): build models, error taxonomy, port traits
//! - **Service Layer** (`services`): config resolution, launching, polling,
//!   retrying and log tailing, written against the ports only
//! - **Adapters** (`adapters`): CodeBuild / CloudWatch Logs HTTP clients and
//!   in-memory fakes
//! - **Infrastructure Layer** (`infrastructure`): config file loading,
//!   settings and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use multirunner::adapters::mock::MockBuildService;
//! use multirunner::services::{BuildLauncher, StatusPoller, PollerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(MockBuildService::new());
//!     let report = BuildLauncher::new(client.clone())
//!         .launch_all(&[multirunner::BuildOverride::for_project("api")])
//!         .await;
//!     let outcome = StatusPoller::new(client, PollerConfig::default())
//!         .poll_until_done(report.build_ids)
//!         .await?;
//!     assert!(!outcome.has_failure());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigError, LaunchError, LogError, PollError, RetryError, ServiceError};
pub use domain::models::{
    BuildConfig, BuildEvent, BuildInfo, BuildOverride, BuildRun, BuildStatus, RunOutcome,
    StartBuildRequest, TargetSelection,
};
pub use domain::ports::{BuildService, DiagnosticSink, LogService};
pub use infrastructure::config::{Settings, SettingsLoader};
pub use services::{BuildLauncher, ConfigResolver, LogTailer, RetryLauncher, StatusPoller};
