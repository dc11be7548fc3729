//! Log tailer.
//!
//! Reads a CloudWatch log stream from the head by following continuation
//! tokens. The stream ends when the service hands back the token it was just
//! given; that reflexive token is the only end-of-stream signal.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::domain::errors::LogError;
use crate::domain::models::{LogQuery, LogTarget};
use crate::domain::ports::{BuildService, LogService};

/// Cursor state between fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    /// Nothing fetched yet; the first request carries no token.
    Head,
    /// Resume from a token the service returned.
    Token(String),
    Exhausted,
}

impl Cursor {
    fn token(&self) -> Option<String> {
        match self {
            Self::Token(token) => Some(token.clone()),
            Self::Head | Self::Exhausted => None,
        }
    }
}

pub struct LogTailer {
    logs: Arc<dyn LogService>,
}

impl LogTailer {
    pub fn new(logs: Arc<dyn LogService>) -> Self {
        Self { logs }
    }

    /// Lazily stream every log line of `target`, in the order received.
    ///
    /// Each page's lines are yielded before the next page is requested. A
    /// failed fetch ends the stream with that error.
    pub fn stream_log(&self, target: LogTarget) -> BoxStream<'static, Result<String, LogError>> {
        if !target.is_complete() {
            return stream::once(async { Err(LogError::EmptyTarget) }).boxed();
        }

        let logs = self.logs.clone();
        stream::try_unfold(Cursor::Head, move |cursor| {
            let logs = logs.clone();
            let target = target.clone();
            async move {
                if cursor == Cursor::Exhausted {
                    return Ok(None);
                }

                let sent = cursor.token();
                let query = LogQuery {
                    target,
                    next_token: sent.clone(),
                    start_from_head: true,
                };
                let page = logs.get_log_events(&query).await.map_err(LogError::Fetch)?;
                debug!(events = page.events.len(), "fetched log page");

                let next = match page.next_forward_token {
                    Some(token) if sent.as_deref() != Some(token.as_str()) => Cursor::Token(token),
                    _ => Cursor::Exhausted,
                };
                let lines: Vec<String> = page.events.into_iter().map(|e| e.message).collect();
                Ok(Some((lines, next)))
            }
        })
        .map_ok(|lines| stream::iter(lines.into_iter().map(Ok::<String, LogError>)))
        .try_flatten()
        .boxed()
    }
}

/// Find where a build delivers its CloudWatch logs.
pub async fn find_log_target(
    builds: &dyn BuildService,
    build_id: &str,
) -> Result<LogTarget, LogError> {
    let found = builds
        .batch_get_builds(&[build_id.to_string()])
        .await
        .map_err(|source| LogError::Lookup {
            build_id: build_id.to_string(),
            source,
        })?;

    let build = found
        .into_iter()
        .find(|b| b.id == build_id)
        .ok_or_else(|| LogError::BuildNotFound(build_id.to_string()))?;
    let logs = build
        .logs
        .ok_or_else(|| LogError::MissingSettings(build_id.to_string()))?;

    if logs.cloud_watch_status.as_deref() == Some("DISABLED") {
        return Err(LogError::Disabled(build_id.to_string()));
    }

    match (logs.group_name, logs.stream_name) {
        (Some(group), Some(stream)) if !group.is_empty() && !stream.is_empty() => {
            Ok(LogTarget::new(group, stream))
        }
        _ => Err(LogError::MissingSettings(build_id.to_string())),
    }
}
