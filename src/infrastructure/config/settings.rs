use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::logging::LogConfig;

/// Project-local settings file, merged when present.
pub const LOCAL_SETTINGS_FILE: &str = ".multirunner.yaml";

/// Prefix for environment overrides (`MULTIRUNNER_LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "MULTIRUNNER_";

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to load settings")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid polling_span_secs: {0}. Must be at least 1")]
    InvalidPollingSpan(u64),

    #[error("Invalid max_wait_secs: {0}. Must be at least 1")]
    InvalidMaxWait(u64),

    #[error("Invalid request_timeout_secs: {0}. Must be at least 1")]
    InvalidRequestTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Region cannot be empty")]
    EmptyRegion,

    #[error("Invalid {service} endpoint '{endpoint}': must start with http:// or https://")]
    InvalidEndpoint { service: &'static str, endpoint: String },

    #[error(
        "no {service} endpoint configured: requests are sent unsigned, so set {service}.endpoint \
         (or MULTIRUNNER_{}__ENDPOINT) to a local emulator or a SigV4 signing proxy",
        .service.to_uppercase()
    )]
    EndpointRequired { service: &'static str },
}

/// Endpoint for one remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Base URL. Required by any command that talks to the service.
    pub endpoint: Option<String>,
}

impl ServiceSettings {
    pub fn require_endpoint(&self, service: &'static str) -> Result<&str, SettingsError> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or(SettingsError::EndpointRequired { service })
    }
}

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between status polls.
    pub polling_span_secs: u64,
    /// Give up waiting after this many seconds. Unbounded when unset.
    pub max_wait_secs: Option<u64>,
    pub region: String,
    pub request_timeout_secs: u64,
    pub codebuild: ServiceSettings,
    pub logs: ServiceSettings,
    pub logging: LogConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            polling_span_secs: 60,
            max_wait_secs: None,
            region: "us-east-1".to_string(),
            request_timeout_secs: 30,
            codebuild: ServiceSettings::default(),
            logs: ServiceSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Settings {
    pub fn polling_span(&self) -> Duration {
        Duration::from_secs(self.polling_span_secs)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.multirunner.yaml` in the working directory, if present
    /// 3. `settings_file`, which must exist when given
    /// 4. `AWS_REGION`
    /// 5. `MULTIRUNNER_*` environment variables, `__` separating nested keys
    pub fn load(settings_file: Option<&Path>) -> Result<Settings, SettingsError> {
        if let Some(path) = settings_file {
            if !path.is_file() {
                return Err(SettingsError::FileNotFound(path.to_path_buf()));
            }
        }

        let settings: Settings = Self::figment(settings_file)
            .extract()
            .map_err(Box::new)?;
        Self::validate(&settings)?;
        Ok(settings)
    }

    /// The merged provider chain, before extraction.
    pub fn figment(settings_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(LOCAL_SETTINGS_FILE));
        if let Some(path) = settings_file {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::raw().only(&["AWS_REGION"]).map(|_| "region".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate settings after loading
    pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
        if settings.polling_span_secs == 0 {
            return Err(SettingsError::InvalidPollingSpan(settings.polling_span_secs));
        }
        if settings.max_wait_secs == Some(0) {
            return Err(SettingsError::InvalidMaxWait(0));
        }
        if settings.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidRequestTimeout(0));
        }
        if settings.region.trim().is_empty() {
            return Err(SettingsError::EmptyRegion);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&settings.logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::InvalidLogLevel(settings.logging.level.clone()));
        }

        for (service, endpoint) in [
            ("codebuild", &settings.codebuild.endpoint),
            ("logs", &settings.logs.endpoint),
        ] {
            if let Some(endpoint) = endpoint {
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                    return Err(SettingsError::InvalidEndpoint {
                        service,
                        endpoint: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
