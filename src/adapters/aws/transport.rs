//! Shared JSON 1.1 transport.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::errors::ServiceError;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Connection settings for one AWS service client.
#[derive(Debug, Clone)]
pub struct AwsClientConfig {
    /// Base URL requests are posted to.
    pub endpoint: String,
    pub region: String,
    pub timeout: Duration,
}

impl AwsClientConfig {
    /// Requests are not signed, so `endpoint` must accept them as sent: a
    /// local emulator or a signing proxy.
    pub fn new(endpoint: &str, region: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            region: region.to_string(),
            timeout,
        }
    }
}

/// Error body returned by the service on a non-2xx response.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// `POST` transport speaking one service's JSON 1.1 dialect.
#[derive(Debug, Clone)]
pub struct JsonTransport {
    http: ReqwestClient,
    config: AwsClientConfig,
    target_prefix: &'static str,
}

impl JsonTransport {
    /// `target_prefix` is the service half of `X-Amz-Target`, e.g.
    /// `CodeBuild_20161006`.
    pub fn new(config: AwsClientConfig, target_prefix: &'static str) -> Result<Self, ServiceError> {
        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config,
            target_prefix,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Invoke `operation` with `body` and decode the response.
    #[instrument(skip(self, body), fields(endpoint = %self.config.endpoint))]
    pub async fn call<I, O>(&self, operation: &str, body: &I) -> Result<O, ServiceError>
    where
        I: Serialize + ?Sized + Sync,
        O: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.config.endpoint.as_str())
            .header("X-Amz-Target", format!("{}.{operation}", self.target_prefix))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        debug!(%status, bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ServiceError::MalformedResponse(format!("{operation}: {e}")))
    }
}

/// Map an error response to [`ServiceError::Api`].
///
/// `__type` may carry a namespace (`com.amazonaws...#Code`); only the code is
/// kept.
fn api_error(status: StatusCode, text: &str) -> ServiceError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let code = body
        .kind
        .as_deref()
        .map(|kind| kind.rsplit('#').next().unwrap_or(kind).to_string())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    let message = body.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string()
    });
    ServiceError::api(code, message)
}
