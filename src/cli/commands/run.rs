//! `run`: start every selected build and optionally follow them.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::cli::context::CommandContext;
use crate::cli::display::{render_summary, spawn_event_printer};
use crate::cli::types::{ExitStatus, RunArgs};
use crate::domain::models::{BuildEvent, BuildOverride, TargetSelection};
use crate::domain::ports::{BuildService, TracingDiagnostics};
use crate::infrastructure::config::load_build_file;
use crate::services::{BuildLauncher, ConfigResolver, PollerConfig, StatusPoller};

pub async fn execute(args: RunArgs, ctx: &CommandContext) -> Result<ExitStatus> {
    let document = load_build_file(ctx.config_path())?;
    let resolver = ConfigResolver::new(Arc::new(TracingDiagnostics));
    let builds = resolver
        .resolve(&document, &TargetSelection::new(args.targets))
        .with_context(|| format!("Invalid config file {}", ctx.config_path().display()))?;

    let client = ctx.build_service()?;
    let poller = ctx.poller_config(args.polling_span, args.max_wait);
    run_builds(&builds, client, poller, !args.no_wait).await
}

/// Launch `builds`, then poll them to completion when `wait` is set.
///
/// Any build that fails to start makes the whole run a [`ExitStatus::Failure`]
/// and nothing is polled.
pub async fn run_builds(
    builds: &[BuildOverride],
    client: Arc<dyn BuildService>,
    poller: PollerConfig,
    wait: bool,
) -> Result<ExitStatus> {
    if builds.is_empty() {
        warn!("no builds selected");
    }

    let (event_tx, event_rx) = mpsc::channel::<BuildEvent>(100);
    let printer = spawn_event_printer(event_rx);

    let report = BuildLauncher::new(client.clone())
        .with_events(event_tx.clone())
        .launch_all(builds)
        .await;

    let result = if report.has_errors() {
        for err in &report.errors {
            error!(project = %err.project_name(), error = err as &dyn std::error::Error);
        }
        Ok(ExitStatus::Failure)
    } else if wait {
        StatusPoller::new(client, poller)
            .with_events(event_tx.clone())
            .poll_until_done(report.build_ids)
            .await
            .map(|outcome| {
                eprintln!("{}", render_summary(&outcome));
                ExitStatus::from_failure(outcome.has_failure())
            })
            .map_err(anyhow::Error::from)
    } else {
        Ok(ExitStatus::Success)
    };

    drop(event_tx);
    let _ = printer.await;
    result
}
