//! `log`: print the CloudWatch log of one build to stdout.

use std::sync::Arc;

use anyhow::Result;
use futures::TryStreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::cli::context::CommandContext;
use crate::cli::types::{ExitStatus, LogArgs};
use crate::domain::ports::{BuildService, LogService};
use crate::services::{find_log_target, LogTailer};

pub async fn execute(args: LogArgs, ctx: &CommandContext) -> Result<ExitStatus> {
    let builds = ctx.build_service()?;
    let logs = ctx.log_service()?;
    let mut stdout = tokio::io::stdout();
    print_log(&args.id, builds.as_ref(), logs, &mut stdout).await
}

/// Write every log line of `build_id` to `out`, in order.
pub async fn print_log<W>(
    build_id: &str,
    builds: &dyn BuildService,
    logs: Arc<dyn LogService>,
    out: &mut W,
) -> Result<ExitStatus>
where
    W: AsyncWrite + Unpin,
{
    let target = find_log_target(builds, build_id).await?;
    let mut lines = LogTailer::new(logs).stream_log(target);
    while let Some(line) = lines.try_next().await? {
        out.write_all(line.as_bytes()).await?;
    }
    out.flush().await?;
    Ok(ExitStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockBuildService, MockLogService};
    use crate::domain::errors::LogError;
    use crate::domain::models::{LogEvent, LogPage, LogsLocation};

    fn enabled() -> LogsLocation {
        LogsLocation {
            group_name: Some("/aws/codebuild/api".to_string()),
            stream_name: Some("abc".to_string()),
            cloud_watch_status: Some("ENABLED".to_string()),
        }
    }

    #[tokio::test]
    async fn test_prints_all_lines() {
        let builds = MockBuildService::new().with_logs("api:1", enabled());
        let logs = Arc::new(MockLogService::new([Ok(LogPage {
            events: vec![
                LogEvent {
                    timestamp: Some(1),
                    message: "[Container] phase BUILD\n".to_string(),
                },
                LogEvent {
                    timestamp: Some(2),
                    message: "done\n".to_string(),
                },
            ],
            next_forward_token: Some("f/1".to_string()),
        })]));

        let mut out = Vec::new();
        let status = print_log("api:1", &builds, logs, &mut out).await.unwrap();

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(String::from_utf8(out).unwrap(), "[Container] phase BUILD\ndone\n");
    }

    #[tokio::test]
    async fn test_disabled_logs_is_an_error() {
        let builds = MockBuildService::new().with_logs(
            "api:1",
            LogsLocation {
                cloud_watch_status: Some("DISABLED".to_string()),
                ..enabled()
            },
        );
        let logs = Arc::new(MockLogService::new([]));

        let mut out = Vec::new();
        let err = print_log("api:1", &builds, logs.clone(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<LogError>(), Some(LogError::Disabled(_))));
        assert!(out.is_empty());
        assert!(logs.queries().is_empty());
    }
}
