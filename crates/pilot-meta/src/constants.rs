//! Project-wide names and allow-lists.

/// Default experiment name.
pub const PROJECT_NAME: &str = "ML-Pilot";

/// Models a run may select.
pub const ACTIVE_MODEL_NAMES: &[&str] = &["test", "vae"];

/// Reserved snapshot key holding the active model name.
pub const MODEL_NAME_KEY: &str = "_model_name";

/// General option naming the experiment.
pub const EXPERIMENT_NAME: &str = "experiment_name";

/// General option naming the run.
pub const RUN_NUMBER: &str = "run_number";

/// General option naming a configuration file to preload.
pub const CONFIG_FILE: &str = "config_file";
