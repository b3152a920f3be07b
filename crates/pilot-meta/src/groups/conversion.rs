//! Model export options.

use crate::{GroupScope, OptionDescriptor, OptionGroup, Validator};

pub fn group() -> OptionGroup {
    OptionGroup::new("conversion", GroupScope::Conversion)
        .with(
            OptionDescriptor::new("converter_model_path", "Path to the model to convert")
                .with_null_default()
                .path(),
        )
        .with(
            OptionDescriptor::new("converter_output_file", "Converted model file name")
                .with_default("model.onnx")
                .with_validator(Validator::String)
                .output_relative(),
        )
        .with(
            OptionDescriptor::new("converter_opset", "ONNX opset version")
                .with_default(18)
                .with_validator(Validator::int_min(1)),
        )
}
