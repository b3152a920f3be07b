//! Options every run carries.

use crate::constants::{CONFIG_FILE, EXPERIMENT_NAME, PROJECT_NAME, RUN_NUMBER};
use crate::{GroupScope, OptionDescriptor, OptionGroup, Validator};

pub fn group() -> OptionGroup {
    OptionGroup::new("general", GroupScope::General)
        .with(
            OptionDescriptor::new(EXPERIMENT_NAME, "Name of the experiment")
                .with_default(PROJECT_NAME)
                .with_validator(Validator::String),
        )
        .with(
            OptionDescriptor::new(RUN_NUMBER, "Name of the run, suffixed with a timestamp")
                .with_null_default()
                .with_validator(Validator::String)
                .per_run(),
        )
        .with(
            OptionDescriptor::new(CONFIG_FILE, "Configuration file to load before overrides")
                .with_null_default()
                .with_validator(Validator::String)
                .per_run(),
        )
}
