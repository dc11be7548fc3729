//! Remote log stream types.

/// A CloudWatch log stream to tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub group: String,
    pub stream: String,
}

impl LogTarget {
    pub fn new(group: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            stream: stream.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.group.is_empty() && !self.stream.is_empty()
    }
}

/// One GetLogEvents request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub target: LogTarget,
    /// Continuation token; `None` on the first request of a tail.
    pub next_token: Option<String>,
    pub start_from_head: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: Option<i64>,
    pub message: String,
}

/// One page of log events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPage {
    pub events: Vec<LogEvent>,
    /// Token for the next page. Equal to the submitted token at end of stream.
    pub next_forward_token: Option<String>,
}
