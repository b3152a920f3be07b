//! Integration tests for the option registry

use pilot_meta::groups::builtin_groups;
use pilot_meta::{
    Error, GroupScope, ModelOptionResolver, OptionDescriptor, OptionGroup, OptionRegistry,
    RegistryError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn group(name: &str, scope: GroupScope, options: &[&str]) -> OptionGroup {
    let mut group = OptionGroup::new(name, scope);
    for option in options {
        group.push(OptionDescriptor::new(*option, "test option").with_default(json!(1)));
    }
    group
}

#[test]
fn test_merge_disjoint_groups_sums_sizes() {
    let registry = OptionRegistry::merge([
        group("general", GroupScope::General, &["a", "b"]),
        group("training", GroupScope::Training, &["c", "d", "e"]),
    ])
    .unwrap();

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.group_of("d"), Some("training"));
    assert_eq!(registry.groups(), vec!["general", "training"]);
}

#[test]
fn test_shared_key_is_duplicate() {
    let err = OptionRegistry::merge([
        group("general", GroupScope::General, &["a", "shared"]),
        group("data", GroupScope::Data, &["shared"]),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        Error::Registry(RegistryError::DuplicateOption {
            option: "shared".into(),
            group: "data".into(),
            existing: "general".into(),
        })
    );
}

#[test]
fn test_missing_default_is_rejected() {
    let group = OptionGroup::new("training", GroupScope::Training)
        .with(OptionDescriptor::new("learning_rate", "Learning rate"));

    let err = OptionRegistry::validate(&group).unwrap_err();

    assert_eq!(
        err,
        Error::Registry(RegistryError::MissingDefault {
            option: "learning_rate".into(),
            group: "training".into(),
        })
    );
}

#[test]
fn test_null_default_is_accepted() {
    let group = OptionGroup::new("evaluation", GroupScope::Evaluation)
        .with(OptionDescriptor::new("evaluation_model_path", "Model").with_null_default().path());

    assert!(OptionRegistry::validate(&group).is_ok());
}

#[test]
fn test_validate_is_repeatable() {
    let groups = builtin_groups();
    for _ in 0..2 {
        for group in &groups {
            OptionRegistry::validate(group).unwrap();
        }
    }
    let first = OptionRegistry::merge(groups.clone()).unwrap();
    let second = OptionRegistry::merge(groups).unwrap();
    assert_eq!(first.names(), second.names());
}

#[test]
fn test_builtins_with_every_model() {
    let resolver = ModelOptionResolver::with_builtins();

    for model in resolver.models() {
        let mut registry = OptionRegistry::merge(builtin_groups()).unwrap();
        let model_group = resolver.resolve(model).unwrap();
        let expected = registry.len() + model_group.len();

        registry.register(model_group).unwrap();

        assert_eq!(registry.len(), expected);
        assert!(registry.has_scope(&GroupScope::Model(model.to_string())));
    }
}

#[test]
fn test_options_in_scope() {
    let registry = OptionRegistry::merge(builtin_groups()).unwrap();

    let names: Vec<&str> = registry
        .options_in(&GroupScope::Conversion)
        .into_iter()
        .map(|o| o.name.as_str())
        .collect();

    assert_eq!(
        names,
        vec!["converter_model_path", "converter_opset", "converter_output_file"]
    );
}

#[test]
fn test_output_relative_builtins() {
    let registry = OptionRegistry::merge(builtin_groups()).unwrap();

    let mut names: Vec<&str> = registry
        .iter()
        .filter(|o| o.is_output_relative)
        .map(|o| o.name.as_str())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "converter_output_file",
            "model_checkpoint_out_weight_file",
            "tensorboard_log_dir_name",
        ]
    );
}

proptest! {
    #[test]
    fn prop_disjoint_merge_size(sizes in prop::collection::vec(0usize..6, 1..5)) {
        let groups: Vec<OptionGroup> = sizes
            .iter()
            .enumerate()
            .map(|(g, &n)| {
                let names: Vec<String> = (0..n).map(|i| format!("g{g}_opt{i}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                group(&format!("group{g}"), GroupScope::General, &refs)
            })
            .collect();

        let registry = OptionRegistry::merge(groups).unwrap();

        prop_assert_eq!(registry.len(), sizes.iter().sum::<usize>());
    }
}
