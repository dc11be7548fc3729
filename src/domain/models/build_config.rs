//! Loaded build configuration and target selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::build_override::BuildOverride;

/// The `builds` section of a configuration file.
///
/// The shape is detected from the YAML node type, never declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildConfig {
    /// Legacy shape: `builds` is a sequence.
    FlatList(Vec<BuildOverride>),
    /// Current shape: `builds` maps group names to sequences.
    GroupedMap(BTreeMap<String, Vec<BuildOverride>>),
}

impl BuildConfig {
    /// Whether the legacy flat list shape is in use.
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::FlatList(_))
    }

    /// Total number of builds across all groups.
    pub fn len(&self) -> usize {
        match self {
            Self::FlatList(builds) => builds.len(),
            Self::GroupedMap(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Top-level document written by `dump`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub builds: BuildConfig,
}

/// Requested group names, in the order they were given.
///
/// An empty selection means "every group". Duplicates are dropped so each
/// group contributes its builds once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    names: Vec<String>,
}

impl TargetSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// Selection that matches every group.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_selection_dedupes_in_order() {
        let targets = TargetSelection::new(["g2", "g1", "g2", " ", "g3"]);
        assert_eq!(targets.names(), ["g2", "g1", "g3"]);
    }

    #[test]
    fn test_build_config_len() {
        let mut groups = BTreeMap::new();
        groups.insert("a".to_string(), vec![BuildOverride::for_project("x")]);
        groups.insert(
            "b".to_string(),
            vec![BuildOverride::for_project("y"), BuildOverride::for_project("z")],
        );
        let config = BuildConfig::GroupedMap(groups);
        assert_eq!(config.len(), 3);
        assert!(!config.is_flat());
    }
}
