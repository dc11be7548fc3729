//! Per-invocation state shared by the command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::adapters::aws::{AwsClientConfig, CloudWatchLogsClient, CodeBuildClient};
use crate::domain::ports::{BuildService, LogService};
use crate::infrastructure::config::Settings;
use crate::services::PollerConfig;

pub struct CommandContext {
    settings: Settings,
    config_path: PathBuf,
}

impl CommandContext {
    pub fn new(settings: Settings, config_path: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            config_path: config_path.into(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn build_service(&self) -> Result<Arc<dyn BuildService>> {
        let endpoint = self.settings.codebuild.require_endpoint("codebuild")?;
        let config =
            AwsClientConfig::new(endpoint, &self.settings.region, self.settings.request_timeout());
        let client = CodeBuildClient::new(config).context("Failed to create CodeBuild client")?;
        Ok(Arc::new(client))
    }

    pub fn log_service(&self) -> Result<Arc<dyn LogService>> {
        let endpoint = self.settings.logs.require_endpoint("logs")?;
        let config =
            AwsClientConfig::new(endpoint, &self.settings.region, self.settings.request_timeout());
        let client =
            CloudWatchLogsClient::new(config).context("Failed to create CloudWatch Logs client")?;
        Ok(Arc::new(client))
    }

    /// Polling configuration with command-line flags taking precedence.
    pub fn poller_config(&self, polling_span: Option<u64>, max_wait: Option<u64>) -> PollerConfig {
        PollerConfig {
            interval: polling_span.map_or_else(|| self.settings.polling_span(), Duration::from_secs),
            deadline: max_wait
                .map(Duration::from_secs)
                .or_else(|| self.settings.max_wait()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ServiceSettings;

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            polling_span_secs: 30,
            max_wait_secs: Some(900),
            ..Settings::default()
        };
        let ctx = CommandContext::new(settings, "config.yaml");

        let from_settings = ctx.poller_config(None, None);
        assert_eq!(from_settings.interval, Duration::from_secs(30));
        assert_eq!(from_settings.deadline, Some(Duration::from_secs(900)));

        let from_flags = ctx.poller_config(Some(5), Some(60));
        assert_eq!(from_flags.interval, Duration::from_secs(5));
        assert_eq!(from_flags.deadline, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_clients_need_an_endpoint() {
        let ctx = CommandContext::new(Settings::default(), "config.yaml");

        let err = ctx.build_service().err().expect("no endpoint configured");
        assert!(err.to_string().contains("codebuild.endpoint"), "{err}");
        let err = ctx.log_service().err().expect("no endpoint configured");
        assert!(err.to_string().contains("logs.endpoint"), "{err}");
    }

    #[test]
    fn test_clients_built_from_configured_endpoints() {
        let settings = Settings {
            codebuild: ServiceSettings {
                endpoint: Some("http://localhost:4566".to_string()),
            },
            logs: ServiceSettings {
                endpoint: Some("http://localhost:4566".to_string()),
            },
            ..Settings::default()
        };
        let ctx = CommandContext::new(settings, "config.yaml");

        assert!(ctx.build_service().is_ok());
        assert!(ctx.log_service().is_ok());
    }
}
