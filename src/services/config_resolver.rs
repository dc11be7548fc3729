//! Configuration resolver.
//!
//! Turns the parsed YAML document into a [`BuildConfig`], detecting the flat
//! or grouped shape from the `builds` node, and applies target selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;

use crate::domain::errors::ConfigError;
use crate::domain::models::{BuildConfig, BuildOverride, ConfigDocument, TargetSelection};
use crate::domain::ports::DiagnosticSink;

/// Warning emitted when a file still uses the flat list shape.
pub const FLAT_FORMAT_DEPRECATION: &str =
    "List format for 'builds' is deprecated. Please migrate to map format.";

pub struct ConfigResolver {
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ConfigResolver {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { diagnostics }
    }

    /// Parse and select in one step.
    pub fn resolve(
        &self,
        document: &Value,
        targets: &TargetSelection,
    ) -> Result<Vec<BuildOverride>, ConfigError> {
        let config = self.parse(document)?;
        select_builds(&config, targets)
    }

    /// Detect the `builds` shape and decode every build override.
    pub fn parse(&self, document: &Value) -> Result<BuildConfig, ConfigError> {
        let builds = document
            .as_mapping()
            .and_then(|root| root.get("builds"))
            .ok_or(ConfigError::BuildsFieldNotFound)?;

        match builds {
            Value::Mapping(groups) => {
                let mut parsed = BTreeMap::new();
                for (key, value) in groups {
                    let group = key
                        .as_str()
                        .ok_or(ConfigError::InvalidGroupName(node_kind(key)))?
                        .to_string();
                    if !value.is_sequence() {
                        return Err(ConfigError::InvalidGroup {
                            group,
                            found: node_kind(value),
                        });
                    }
                    let list = decode_builds(value, &format!("builds.{group}"))?;
                    parsed.insert(group, list);
                }
                debug!(groups = parsed.len(), "parsed grouped build config");
                Ok(BuildConfig::GroupedMap(parsed))
            }
            Value::Sequence(_) => {
                self.diagnostics.warn(FLAT_FORMAT_DEPRECATION);
                let list = decode_builds(builds, "builds")?;
                debug!(builds = list.len(), "parsed flat build config");
                Ok(BuildConfig::FlatList(list))
            }
            other => Err(ConfigError::UnexpectedBuildsType(node_kind(other))),
        }
    }
}

/// Pick the builds to run for the requested targets.
///
/// With no targets every group is returned. With targets, every name must
/// exist or nothing is returned; the selected groups are concatenated in the
/// order the targets were given.
pub fn select_builds(
    config: &BuildConfig,
    targets: &TargetSelection,
) -> Result<Vec<BuildOverride>, ConfigError> {
    match config {
        BuildConfig::FlatList(builds) => {
            if !targets.is_empty() {
                return Err(ConfigError::TargetsNotSupported);
            }
            Ok(builds.clone())
        }
        BuildConfig::GroupedMap(groups) => {
            if targets.is_empty() {
                return Ok(groups.values().flatten().cloned().collect());
            }

            let missing: Vec<String> = targets
                .names()
                .iter()
                .filter(|name| !groups.contains_key(name.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::UnknownTargets(missing));
            }

            Ok(targets
                .names()
                .iter()
                .filter_map(|name| groups.get(name))
                .flatten()
                .cloned()
                .collect())
        }
    }
}

/// Render a config back to YAML with the same shape it was read in.
pub fn dump_config(config: &BuildConfig) -> Result<String, ConfigError> {
    let document = ConfigDocument {
        builds: config.clone(),
    };
    serde_yaml::to_string(&document).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
}

fn decode_builds(node: &Value, location: &str) -> Result<Vec<BuildOverride>, ConfigError> {
    let Value::Sequence(items) = node else {
        return Err(ConfigError::InvalidBuild {
            location: location.to_string(),
            reason: format!("expected a list, found {}", node_kind(node)),
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let item_location = format!("{location}[{index}]");
            let build: BuildOverride =
                serde_yaml::from_value(item.clone()).map_err(|e| ConfigError::InvalidBuild {
                    location: item_location.clone(),
                    reason: e.to_string(),
                })?;
            build.validate(&item_location)?;
            Ok(build)
        })
        .collect()
}

fn node_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
