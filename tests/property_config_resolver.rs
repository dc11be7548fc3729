use std::sync::Arc;

use multirunner::domain::models::{BuildConfig, BuildOverride, TargetSelection};
use multirunner::domain::ports::CollectingDiagnostics;
use multirunner::services::{dump_config, select_builds, ConfigResolver};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn grouped(groups: &BTreeMap<String, usize>) -> BuildConfig {
    BuildConfig::GroupedMap(
        groups
            .iter()
            .map(|(name, count)| {
                let builds = (0..*count)
                    .map(|i| BuildOverride::for_project(format!("{name}-{i}")))
                    .collect();
                (name.clone(), builds)
            })
            .collect(),
    )
}

fn group_map() -> impl Strategy<Value = BTreeMap<String, usize>> {
    prop::collection::btree_map("[a-z]{1,6}", 0usize..4, 1..6)
}

proptest! {
    /// Property: selected builds come grouped in target order
    ///
    /// Every selected build belongs to one of the targets, and the groups
    /// appear in the order the targets were given.
    #[test]
    fn prop_selection_follows_target_order(
        groups in group_map(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let names: Vec<String> = groups.keys().cloned().collect();
        let targets: Vec<String> = picks.iter().map(|i| names[i.index(names.len())].clone()).collect();
        let selection = TargetSelection::new(targets.clone());

        let selected = select_builds(&grouped(&groups), &selection).unwrap();

        let expected: Vec<String> = selection
            .names()
            .iter()
            .flat_map(|name| (0..groups[name]).map(move |i| format!("{name}-{i}")))
            .collect();
        let actual: Vec<String> = selected.into_iter().map(|b| b.project_name).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: an empty selection returns every build exactly once
    #[test]
    fn prop_empty_selection_returns_everything(groups in group_map()) {
        let selected = select_builds(&grouped(&groups), &TargetSelection::all()).unwrap();
        prop_assert_eq!(selected.len(), groups.values().sum::<usize>());
    }

    /// Property: dump output parses back to the same config
    #[test]
    fn prop_dump_round_trips(groups in group_map()) {
        let config = grouped(&groups);
        let dumped = dump_config(&config).unwrap();
        let document: serde_yaml::Value = serde_yaml::from_str(&dumped).unwrap();

        let resolver = ConfigResolver::new(Arc::new(CollectingDiagnostics::new()));
        prop_assert_eq!(resolver.parse(&document).unwrap(), config);
    }
}
