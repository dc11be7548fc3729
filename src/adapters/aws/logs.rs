//! CloudWatch Logs client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::transport::{AwsClientConfig, JsonTransport};
use crate::domain::errors::ServiceError;
use crate::domain::models::{LogEvent, LogPage, LogQuery};
use crate::domain::ports::LogService;

const TARGET_PREFIX: &str = "Logs_20140328";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetLogEventsRequest<'a> {
    log_group_name: &'a str,
    log_stream_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
    start_from_head: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLogEventsResponse {
    #[serde(default)]
    events: Vec<WireEvent>,
    next_forward_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    timestamp: Option<i64>,
    #[serde(default)]
    message: String,
}

/// [`LogService`] backed by the CloudWatch Logs API.
#[derive(Debug, Clone)]
pub struct CloudWatchLogsClient {
    transport: JsonTransport,
}

impl CloudWatchLogsClient {
    pub fn new(config: AwsClientConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            transport: JsonTransport::new(config, TARGET_PREFIX)?,
        })
    }
}

#[async_trait]
impl LogService for CloudWatchLogsClient {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, ServiceError> {
        let request = GetLogEventsRequest {
            log_group_name: &query.target.group,
            log_stream_name: &query.target.stream,
            next_token: query.next_token.as_deref(),
            start_from_head: query.start_from_head,
        };
        let response: GetLogEventsResponse = self.transport.call("GetLogEvents", &request).await?;
        Ok(LogPage {
            events: response
                .events
                .into_iter()
                .map(|e| LogEvent {
                    timestamp: e.timestamp,
                    message: e.message,
                })
                .collect(),
            next_forward_token: response.next_forward_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::LogTarget;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &Server) -> CloudWatchLogsClient {
        let config = AwsClientConfig::new(&server.url(), "us-east-1", Duration::from_secs(5));
        CloudWatchLogsClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_get_log_events_first_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", "Logs_20140328.GetLogEvents")
            .match_body(Matcher::Json(json!({
                "logGroupName": "/aws/codebuild/api",
                "logStreamName": "abc",
                "startFromHead": true
            })))
            .with_status(200)
            .with_body(
                json!({
                    "events": [
                        {"timestamp": 1, "message": "hello\n", "ingestionTime": 2},
                        {"timestamp": 3, "message": "world\n"}
                    ],
                    "nextForwardToken": "f/1",
                    "nextBackwardToken": "b/1"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let page = client(&server)
            .get_log_events(&LogQuery {
                target: LogTarget::new("/aws/codebuild/api", "abc"),
                next_token: None,
                start_from_head: true,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.events.len(), 2);
        assert_eq!(page.events[0].message, "hello\n");
        assert_eq!(page.next_forward_token.as_deref(), Some("f/1"));
    }

    #[tokio::test]
    async fn test_get_log_events_sends_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"nextToken": "f/1"})))
            .with_status(200)
            .with_body(json!({"events": [], "nextForwardToken": "f/1"}).to_string())
            .create_async()
            .await;

        let page = client(&server)
            .get_log_events(&LogQuery {
                target: LogTarget::new("g", "s"),
                next_token: Some("f/1".to_string()),
                start_from_head: true,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(page.events.is_empty());
    }
}
