use crate::{GroupScope, OptionDescriptor, OptionGroup};

pub fn group() -> OptionGroup {
    OptionGroup::new("evaluation", GroupScope::Evaluation).with(
        OptionDescriptor::new("evaluation_model_path", "Path to the model to evaluate")
            .with_null_default()
            .path(),
    )
}
