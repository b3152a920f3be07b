//! Integration tests for model resolution and action selection

use pilot_meta::constants::ACTIVE_MODEL_NAMES;
use pilot_meta::{
    Action, ActionSelector, Error, GroupScope, ModelOptionResolver, OptionDescriptor, OptionGroup,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_every_allowed_model_resolves() {
    let resolver = ModelOptionResolver::with_builtins();

    for model in ACTIVE_MODEL_NAMES {
        let group = resolver.resolve(model).unwrap();
        assert!(!group.is_empty(), "model {model} has no options");
    }
}

#[test]
fn test_custom_model_registration() {
    let resolver = ModelOptionResolver::new().with_model("gan", || {
        OptionGroup::for_model("gan")
            .with(OptionDescriptor::new("noise_dim", "Noise size").with_default(json!(64)))
    });

    let group = resolver.resolve("gan").unwrap();

    assert_eq!(group.scope(), &GroupScope::Model("gan".into()));
    assert_eq!(group.names(), vec!["noise_dim"]);
    assert!(matches!(
        resolver.resolve("vae"),
        Err(Error::Resolution { model }) if model == "vae"
    ));
}

#[test]
fn test_vae_defaults() {
    let group = ModelOptionResolver::with_builtins().resolve("vae").unwrap();

    let default = |name: &str| group.get(name).and_then(|o| o.default.clone());

    assert_eq!(default("latent_dim"), Some(json!(10)));
    assert_eq!(default("intermediate_dims"), Some(json!([100, 50, 20, 15])));
    assert_eq!(default("wandb_tags"), Some(json!([])));
    assert_eq!(default("wandb_entity"), Some(json!(null)));
}

#[test]
fn test_selector_round() {
    let mut selector = ActionSelector::new();

    assert_eq!(selector.select("generate", false).unwrap(), Action::Generate);
    assert!(selector.select("train", false).is_err());
    assert_eq!(selector.select("train", true).unwrap(), Action::Train);
    assert_eq!(selector.current(), Some(Action::Train));
}
