//! StartBuild request payload.
//!
//! The payload is a field-by-field projection of a [`BuildOverride`]. Any
//! value that is unset or empty (blank string, `false`, `0`, empty list,
//! all-empty nested record) is omitted: sending an explicit zero override
//! changes what the service does compared to leaving the project default.

use serde::Serialize;

use super::build_override::{
    count, flag, items, nested, text, ArtifactsOverride, BuildOverride, BuildStatusConfig,
    CacheOverride, EnvironmentVariable, GitSubmodulesConfig, LogsConfig, RegistryCredential,
    SourceAuth, SourceOverride, SourceVersion,
};

/// Body of a StartBuild call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBuildRequest {
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_override: Option<ArtifactsOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildspec_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_status_config_override: Option<BuildStatusConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_override: Option<CacheOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_type_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_session_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_key_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_type_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables_override: Option<Vec<EnvironmentVariable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_clone_depth_override: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_submodules_config_override: Option<GitSubmodulesConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pull_credentials_type_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure_ssl_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_config_override: Option<LogsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileged_mode_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_timeout_in_minutes_override: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_credential_override: Option<RegistryCredential>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_build_status_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_artifacts_override: Option<Vec<ArtifactsOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_sources_override: Option<Vec<SourceOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_sources_version_override: Option<Vec<SourceVersion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_role_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_auth_override: Option<SourceAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_location_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes_override: Option<i32>,
}

impl From<&BuildOverride> for StartBuildRequest {
    fn from(build: &BuildOverride) -> Self {
        Self {
            project_name: build.project_name.trim().to_string(),
            artifacts_override: nested(&build.artifacts_override),
            buildspec_override: text(&build.buildspec_override),
            build_status_config_override: nested(&build.build_status_config_override),
            cache_override: nested(&build.cache_override),
            certificate_override: text(&build.certificate_override),
            compute_type_override: text(&build.compute_type_override),
            debug_session_enabled: flag(build.debug_session_enabled),
            encryption_key_override: text(&build.encryption_key_override),
            environment_type_override: text(&build.environment_type_override),
            environment_variables_override: items(&build.environment_variables_override),
            git_clone_depth_override: count(build.git_clone_depth_override),
            git_submodules_config_override: nested(&build.git_submodules_config_override),
            idempotency_token: text(&build.idempotency_token),
            image_override: text(&build.image_override),
            image_pull_credentials_type_override: text(
                &build.image_pull_credentials_type_override,
            ),
            insecure_ssl_override: flag(build.insecure_ssl_override),
            logs_config_override: nested(&build.logs_config_override),
            privileged_mode_override: flag(build.privileged_mode_override),
            queued_timeout_in_minutes_override: count(build.queued_timeout_in_minutes_override),
            registry_credential_override: nested(&build.registry_credential_override),
            report_build_status_override: flag(build.report_build_status_override),
            secondary_artifacts_override: items(&build.secondary_artifacts_override),
            secondary_sources_override: items(&build.secondary_sources_override),
            secondary_sources_version_override: items(&build.secondary_sources_version_override),
            service_role_override: text(&build.service_role_override),
            source_auth_override: nested(&build.source_auth_override),
            source_location_override: text(&build.source_location_override),
            source_type_override: text(&build.source_type_override),
            source_version: text(&build.source_version),
            timeout_in_minutes_override: count(build.timeout_in_minutes_override),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_only_payload() {
        let request = StartBuildRequest::from(&BuildOverride::for_project("api"));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "projectName": "api" }));
    }

    #[test]
    fn test_zero_values_are_omitted() {
        let build = BuildOverride {
            project_name: "api".to_string(),
            source_version: Some(String::new()),
            privileged_mode_override: Some(false),
            timeout_in_minutes_override: Some(0),
            git_submodules_config_override: Some(GitSubmodulesConfig {
                fetch_submodules: Some(false),
            }),
            cache_override: Some(CacheOverride::default()),
            ..Default::default()
        };
        let body = serde_json::to_value(StartBuildRequest::from(&build)).unwrap();
        assert_eq!(body, json!({ "projectName": "api" }));
    }

    #[test]
    fn test_set_values_are_projected() {
        let build = BuildOverride {
            project_name: "api".to_string(),
            source_version: Some("feature/x".to_string()),
            privileged_mode_override: Some(true),
            timeout_in_minutes_override: Some(30),
            image_override: Some("aws/codebuild/standard:7.0".to_string()),
            environment_variables_override: vec![
                EnvironmentVariable {
                    name: "STAGE".to_string(),
                    value: "dev".to_string(),
                    kind: None,
                },
                EnvironmentVariable::default(),
            ],
            secondary_sources_version_override: vec![SourceVersion {
                source_identifier: Some("lib".to_string()),
                source_version: Some("v2".to_string()),
            }],
            ..Default::default()
        };
        let body = serde_json::to_value(StartBuildRequest::from(&build)).unwrap();
        assert_eq!(
            body,
            json!({
                "projectName": "api",
                "sourceVersion": "feature/x",
                "privilegedModeOverride": true,
                "timeoutInMinutesOverride": 30,
                "imageOverride": "aws/codebuild/standard:7.0",
                "environmentVariablesOverride": [
                    { "name": "STAGE", "value": "dev" }
                ],
                "secondarySourcesVersionOverride": [
                    { "sourceIdentifier": "lib", "sourceVersion": "v2" }
                ]
            })
        );
    }

    #[test]
    fn test_nested_type_key_is_renamed() {
        let build = BuildOverride {
            project_name: "api".to_string(),
            artifacts_override: Some(ArtifactsOverride {
                kind: Some("NO_ARTIFACTS".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let body = serde_json::to_value(StartBuildRequest::from(&build)).unwrap();
        assert_eq!(body["artifactsOverride"], json!({ "type": "NO_ARTIFACTS" }));
    }
}
