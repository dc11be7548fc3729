//! Build override records.
//!
//! One [`BuildOverride`] describes the parameter overrides applied to a
//! pre-registered CodeBuild project for a single invocation. Keys are the
//! camelCase names used by the StartBuild API so the YAML file reads like the
//! API reference.

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

/// Parameter overrides for one build invocation.
///
/// Everything except `project_name` is optional. Unknown keys are rejected so
/// a misspelled override fails loudly instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildOverride {
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts_override: Option<ArtifactsOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildspec_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_status_config_override: Option<BuildStatusConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_override: Option<CacheOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_type_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_session_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_type_override: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_variables_override: Vec<EnvironmentVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_clone_depth_override: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_submodules_config_override: Option<GitSubmodulesConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_credentials_type_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_ssl_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_config_override: Option<LogsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged_mode_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_timeout_in_minutes_override: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_credential_override: Option<RegistryCredential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_build_status_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_artifacts_override: Vec<ArtifactsOverride>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_sources_override: Vec<SourceOverride>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_sources_version_override: Vec<SourceVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_role_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_auth_override: Option<SourceAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes_override: Option<i32>,
}

impl BuildOverride {
    /// Minimal override that only names the project.
    pub fn for_project(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    /// Check the invariants the YAML decoder cannot express.
    pub fn validate(&self, location: &str) -> Result<(), ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::InvalidBuild {
                location: location.to_string(),
                reason: "projectName must not be empty".to_string(),
            });
        }

        for (index, variable) in self.environment_variables_override.iter().enumerate() {
            if variable.name.trim().is_empty() {
                return Err(ConfigError::InvalidBuild {
                    location: format!("{location}.environmentVariablesOverride[{index}]"),
                    reason: "name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Drops empty values so they are left out of a StartBuild payload.
///
/// Returns `None` when nothing meaningful remains, which lets callers omit the
/// whole nested record.
pub trait Compact: Sized {
    fn compact(&self) -> Option<Self>;
}

pub(crate) fn text(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_owned)
}

pub(crate) fn flag(value: Option<bool>) -> Option<bool> {
    value.filter(|set| *set)
}

pub(crate) fn count(value: Option<i32>) -> Option<i32> {
    value.filter(|n| *n != 0)
}

pub(crate) fn nested<T: Compact>(value: &Option<T>) -> Option<T> {
    value.as_ref().and_then(Compact::compact)
}

pub(crate) fn items<T: Compact>(values: &[T]) -> Option<Vec<T>> {
    let kept: Vec<T> = values.iter().filter_map(Compact::compact).collect();
    (!kept.is_empty()).then_some(kept)
}

/// Primary or secondary artifact override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_owner_access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_artifact_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
}

impl Compact for ArtifactsOverride {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            artifact_identifier: text(&self.artifact_identifier),
            bucket_owner_access: text(&self.bucket_owner_access),
            encryption_disabled: flag(self.encryption_disabled),
            location: text(&self.location),
            name: text(&self.name),
            namespace_type: text(&self.namespace_type),
            override_artifact_name: flag(self.override_artifact_name),
            packaging: text(&self.packaging),
            path: text(&self.path),
            kind: text(&self.kind),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Commit status reporting settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildStatusConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

impl Compact for BuildStatusConfig {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            context: text(&self.context),
            target_url: text(&self.target_url),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CacheOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
}

impl Compact for CacheOverride {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            location: text(&self.location),
            modes: self.modes.iter().filter(|m| !m.is_empty()).cloned().collect(),
            kind: text(&self.kind),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Environment variable passed to the build.
///
/// The value is always sent once the variable is named: an empty string is a
/// legitimate value for a variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
}

impl Compact for EnvironmentVariable {
    fn compact(&self) -> Option<Self> {
        if self.name.is_empty() {
            return None;
        }
        Some(Self {
            name: self.name.clone(),
            value: self.value.clone(),
            kind: text(&self.kind),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitSubmodulesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_submodules: Option<bool>,
}

impl Compact for GitSubmodulesConfig {
    fn compact(&self) -> Option<Self> {
        flag(self.fetch_submodules).map(|fetch| Self {
            fetch_submodules: Some(fetch),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CloudWatchLogsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
}

impl Compact for CloudWatchLogsConfig {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            group_name: text(&self.group_name),
            status: text(&self.status),
            stream_name: text(&self.stream_name),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct S3LogsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_owner_access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Compact for S3LogsConfig {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            bucket_owner_access: text(&self.bucket_owner_access),
            encryption_disabled: flag(self.encryption_disabled),
            location: text(&self.location),
            status: text(&self.status),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Log delivery override (CloudWatch Logs and/or S3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_watch_logs: Option<CloudWatchLogsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_logs: Option<S3LogsConfig>,
}

impl Compact for LogsConfig {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            cloud_watch_logs: nested(&self.cloud_watch_logs),
            s3_logs: nested(&self.s3_logs),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_provider: Option<String>,
}

impl Compact for RegistryCredential {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            credential: text(&self.credential),
            credential_provider: text(&self.credential_provider),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Source authorization settings, shared by the primary source auth override
/// and the `auth` block of secondary sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
}

impl Compact for SourceAuth {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            resource: text(&self.resource),
            kind: text(&self.kind),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Secondary source definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<SourceAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildspec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_status_config: Option<BuildStatusConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_clone_depth: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_submodules_config: Option<GitSubmodulesConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_build_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
}

impl Compact for SourceOverride {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            auth: nested(&self.auth),
            buildspec: text(&self.buildspec),
            build_status_config: nested(&self.build_status_config),
            git_clone_depth: count(self.git_clone_depth),
            git_submodules_config: nested(&self.git_submodules_config),
            insecure_ssl: flag(self.insecure_ssl),
            location: text(&self.location),
            report_build_status: flag(self.report_build_status),
            source_identifier: text(&self.source_identifier),
            kind: text(&self.kind),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}

/// Version pin for a secondary source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
}

impl Compact for SourceVersion {
    fn compact(&self) -> Option<Self> {
        let compacted = Self {
            source_identifier: text(&self.source_identifier),
            source_version: text(&self.source_version),
        };
        (compacted != Self::default()).then_some(compacted)
    }
}
