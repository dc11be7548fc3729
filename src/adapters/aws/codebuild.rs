//! CodeBuild client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transport::{AwsClientConfig, JsonTransport};
use crate::domain::errors::ServiceError;
use crate::domain::models::{BuildInfo, BuildStatus, LogsLocation, StartBuildRequest};
use crate::domain::ports::BuildService;

const TARGET_PREFIX: &str = "CodeBuild_20161006";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildEnvelope {
    build: Option<WireBuild>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetBuildsResponse {
    #[serde(default)]
    builds: Vec<WireBuild>,
    #[serde(default)]
    builds_not_found: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetryBuildRequest<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchGetBuildsRequest<'a> {
    ids: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBuild {
    #[serde(default)]
    id: String,
    build_status: Option<String>,
    project_name: Option<String>,
    logs: Option<WireLogs>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLogs {
    group_name: Option<String>,
    stream_name: Option<String>,
    cloud_watch_logs: Option<WireCloudWatchLogs>,
}

#[derive(Debug, Deserialize)]
struct WireCloudWatchLogs {
    status: Option<String>,
}

impl WireBuild {
    fn into_info(self) -> Result<BuildInfo, ServiceError> {
        if self.id.is_empty() {
            return Err(ServiceError::MalformedResponse(
                "build record without an id".to_string(),
            ));
        }
        // An absent status is neither IN_PROGRESS nor SUCCEEDED: a failure.
        let status = BuildStatus::from_raw(self.build_status.as_deref().unwrap_or_default());
        Ok(BuildInfo {
            id: self.id,
            status,
            project_name: self.project_name,
            logs: self.logs.map(|logs| LogsLocation {
                group_name: logs.group_name,
                stream_name: logs.stream_name,
                cloud_watch_status: logs.cloud_watch_logs.and_then(|c| c.status),
            }),
        })
    }
}

/// [`BuildService`] backed by the CodeBuild API.
#[derive(Debug, Clone)]
pub struct CodeBuildClient {
    transport: JsonTransport,
}

impl CodeBuildClient {
    pub fn new(config: AwsClientConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            transport: JsonTransport::new(config, TARGET_PREFIX)?,
        })
    }

    fn single(envelope: BuildEnvelope, operation: &str) -> Result<BuildInfo, ServiceError> {
        envelope
            .build
            .ok_or_else(|| ServiceError::MalformedResponse(format!("{operation}: missing build")))?
            .into_info()
    }
}

#[async_trait]
impl BuildService for CodeBuildClient {
    async fn start_build(&self, request: &StartBuildRequest) -> Result<BuildInfo, ServiceError> {
        let envelope = self.transport.call("StartBuild", request).await?;
        Self::single(envelope, "StartBuild")
    }

    async fn retry_build(&self, build_id: &str) -> Result<BuildInfo, ServiceError> {
        let envelope = self
            .transport
            .call("RetryBuild", &RetryBuildRequest { id: build_id })
            .await?;
        Self::single(envelope, "RetryBuild")
    }

    async fn batch_get_builds(&self, build_ids: &[String]) -> Result<Vec<BuildInfo>, ServiceError> {
        let response: BatchGetBuildsResponse = self
            .transport
            .call("BatchGetBuilds", &BatchGetBuildsRequest { ids: build_ids })
            .await?;
        if !response.builds_not_found.is_empty() {
            debug!(not_found = ?response.builds_not_found, "service reported unknown builds");
        }
        response.builds.into_iter().map(WireBuild::into_info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &Server) -> CodeBuildClient {
        let config = AwsClientConfig::new(&server.url(), "us-east-1", Duration::from_secs(5));
        CodeBuildClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_start_build_sends_compact_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", "CodeBuild_20161006.StartBuild")
            .match_header("content-type", "application/x-amz-json-1.1")
            .match_body(Matcher::Json(json!({"projectName": "api"})))
            .with_status(200)
            .with_body(
                json!({"build": {"id": "api:42", "buildStatus": "IN_PROGRESS", "projectName": "api"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let request = StartBuildRequest {
            project_name: "api".to_string(),
            ..Default::default()
        };
        let build = client(&server).start_build(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(build.id, "api:42");
        assert_eq!(build.status, BuildStatus::InProgress);
        assert_eq!(build.project_name.as_deref(), Some("api"));
    }

    #[test]
    fn test_build_without_status_is_failed() {
        let wire: WireBuild = serde_json::from_str(r#"{"id":"api:1"}"#).unwrap();
        let info = wire.into_info().unwrap();
        assert_eq!(info.status, BuildStatus::Other(String::new()));
        assert!(info.status.is_terminal());
        assert!(info.status.is_failure());
    }

    #[tokio::test]
    async fn test_retry_build() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", "CodeBuild_20161006.RetryBuild")
            .match_body(Matcher::Json(json!({"id": "api:1"})))
            .with_status(200)
            .with_body(json!({"build": {"id": "api:2"}}).to_string())
            .create_async()
            .await;

        let build = client(&server).retry_build("api:1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(build.id, "api:2");
    }

    #[tokio::test]
    async fn test_batch_get_builds_maps_logs() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .match_header("x-amz-target", "CodeBuild_20161006.BatchGetBuilds")
            .match_body(Matcher::Json(json!({"ids": ["a:1", "b:1", "c:1"]})))
            .with_status(200)
            .with_body(
                json!({
                    "builds": [
                        {
                            "id": "a:1",
                            "buildStatus": "SUCCEEDED",
                            "logs": {
                                "groupName": "/aws/codebuild/a",
                                "streamName": "1",
                                "cloudWatchLogs": {"status": "ENABLED"}
                            }
                        },
                        {"id": "b:1", "buildStatus": "TIMED_OUT"}
                    ],
                    "buildsNotFound": ["c:1"]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ids = vec!["a:1".to_string(), "b:1".to_string(), "c:1".to_string()];
        let builds = client(&server).batch_get_builds(&ids).await.unwrap();

        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0].status, BuildStatus::Succeeded);
        let logs = builds[0].logs.clone().unwrap();
        assert_eq!(logs.group_name.as_deref(), Some("/aws/codebuild/a"));
        assert_eq!(logs.cloud_watch_status.as_deref(), Some("ENABLED"));
        assert_eq!(builds[1].status, BuildStatus::Other("TIMED_OUT".to_string()));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(
                json!({"__type": "ResourceNotFoundException", "message": "Project cannot be found"})
                    .to_string(),
            )
            .create_async()
            .await;

        let request = StartBuildRequest {
            project_name: "ghost".to_string(),
            ..Default::default()
        };
        let err = client(&server).start_build(&request).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::Api { ref code, .. } if code == "ResourceNotFoundException")
        );
    }

    #[tokio::test]
    async fn test_missing_id_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(json!({"build": {"buildStatus": "IN_PROGRESS"}}).to_string())
            .create_async()
            .await;

        let err = client(&server).retry_build("x:1").await.unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
    }
}
