//! `retry`: retry one build and optionally follow it.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::context::CommandContext;
use crate::cli::display::{render_summary, spawn_event_printer};
use crate::cli::types::{ExitStatus, RetryArgs};
use crate::domain::models::BuildEvent;
use crate::domain::ports::BuildService;
use crate::services::{PollerConfig, RetryLauncher, StatusPoller};

pub async fn execute(args: RetryArgs, ctx: &CommandContext) -> Result<ExitStatus> {
    let client = ctx.build_service()?;
    let poller = ctx.poller_config(args.polling_span, args.max_wait);
    retry_build(&args.id, client, poller, !args.no_wait).await
}

pub async fn retry_build(
    build_id: &str,
    client: Arc<dyn BuildService>,
    poller: PollerConfig,
    wait: bool,
) -> Result<ExitStatus> {
    let (event_tx, event_rx) = mpsc::channel::<BuildEvent>(100);
    let printer = spawn_event_printer(event_rx);

    let launcher = RetryLauncher::new(
        client.clone(),
        StatusPoller::new(client, poller).with_events(event_tx.clone()),
    )
    .with_events(event_tx);
    let report = launcher.retry_and_optionally_wait(build_id, wait).await;

    drop(launcher);
    let _ = printer.await;

    let report = report?;
    if let Some(outcome) = &report.outcome {
        eprintln!("{}", render_summary(outcome));
    }
    Ok(ExitStatus::from_failure(report.has_failure()))
}
