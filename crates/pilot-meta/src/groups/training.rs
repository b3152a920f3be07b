//! Training loop and callback options.
//!
//! Callback settings are grouped by prefix: `reduce_lr_*`,
//! `early_stopping_*`, `model_checkpoint_*` and `tensorboard_*`. Each
//! family is switched on by the bare flag of the same name.

use crate::{GroupScope, OptionDescriptor, OptionGroup, Validator};

fn flag(name: &str, help: &str, default: bool) -> OptionDescriptor {
    OptionDescriptor::new(name, help)
        .with_default(default)
        .with_validator(Validator::Bool)
}

fn verbosity(name: &str) -> OptionDescriptor {
    OptionDescriptor::new(name, "Callback verbosity")
        .with_default(1)
        .with_validator(Validator::int_range(0, 2))
}

pub fn group() -> OptionGroup {
    OptionGroup::new("training", GroupScope::Training)
        .with(
            OptionDescriptor::new("learning_rate", "Learning rate")
                .with_default(1e-4)
                .with_validator(Validator::float_min(0.0)),
        )
        .with(
            OptionDescriptor::new("epochs", "Number of epochs")
                .with_default(1)
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("batch_size", "Batch size")
                .with_default(1)
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("model_path", "Model to continue training from")
                .with_null_default()
                .path()
                .allow_missing(),
        )
        .extend(reduce_lr())
        .extend(early_stopping())
        .extend(model_checkpoint())
        .extend(tensorboard())
}

fn reduce_lr() -> OptionGroup {
    OptionGroup::new("reduce_lr", GroupScope::Training)
        .with(flag("reduce_lr", "Reduce the learning rate on plateau", false))
        .with(verbosity("reduce_lr_verbosity"))
        .with(
            OptionDescriptor::new("reduce_lr_patience", "Epochs without improvement before reducing")
                .with_default(10)
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("reduce_lr_cooldown", "Epochs to wait after a reduction")
                .with_default(10)
                .with_validator(Validator::int_min(0)),
        )
}

fn early_stopping() -> OptionGroup {
    OptionGroup::new("early_stopping", GroupScope::Training)
        .with(flag("early_stopping", "Stop when the monitored loss stops improving", false))
        .with(verbosity("early_stopping_verbosity"))
        .with(
            OptionDescriptor::new("early_stopping_patience", "Epochs without improvement before stopping")
                .with_default(30)
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("early_stopping_min_delta", "Minimum change counted as improvement")
                .with_default(1e-6)
                .with_validator(Validator::float_min(0.0)),
        )
        .with(flag("early_stopping_restore", "Restore the best weights on stop", true))
}

fn model_checkpoint() -> OptionGroup {
    OptionGroup::new("model_checkpoint", GroupScope::Training)
        .with(flag("model_checkpoint", "Save checkpoints while training", false))
        .with(
            OptionDescriptor::new("model_checkpoint_out_weight_file", "Checkpoint file name")
                .with_default("model_with_weights.tf")
                .with_validator(Validator::String)
                .output_relative(),
        )
        .with(verbosity("model_checkpoint_verbosity"))
        .with(flag("model_checkpoint_save_weights_only", "Save weights only", true))
        .with(flag("model_checkpoint_save_best_only", "Keep only the best checkpoint", true))
}

fn tensorboard() -> OptionGroup {
    OptionGroup::new("tensorboard", GroupScope::Training)
        .with(flag("tensorboard", "Write tensorboard logs", false))
        .with(
            OptionDescriptor::new("tensorboard_log_dir_name", "Tensorboard log directory name")
                .with_default("tensorboard")
                .with_validator(Validator::String)
                .output_relative(),
        )
        .with(
            OptionDescriptor::new("tensorboard_histogram_freq", "Histogram frequency in epochs")
                .with_default(1)
                .with_validator(Validator::int_min(1)),
        )
        .with(flag("tensorboard_write_graph", "Write the model graph", true))
        .with(flag("tensorboard_write_images", "Write weight images", false))
        .with(
            OptionDescriptor::new("tensorboard_update_freq", "When to write losses and metrics")
                .with_default("epoch")
                .with_validator(Validator::choice(["batch", "epoch"])),
        )
}
