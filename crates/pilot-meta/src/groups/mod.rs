//! Built-in phase option groups
//!
//! One module per pipeline phase. Each exposes a `group()` constructor.

pub mod conversion;
pub mod data;
pub mod evaluation;
pub mod general;
pub mod training;

use crate::OptionGroup;

/// Every phase group, in the order they are registered.
pub fn builtin_groups() -> Vec<OptionGroup> {
    vec![
        general::group(),
        training::group(),
        data::group(),
        evaluation::group(),
        conversion::group(),
    ]
}
