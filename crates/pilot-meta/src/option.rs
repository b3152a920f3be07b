//! Option descriptors and their validators

use crate::{Error, Result};

/// Live and default option values.
///
/// `null` stands for "unset" and passes every validator.
pub type OptionValue = serde_json::Value;

/// Per-option value check.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Accept anything
    Any,
    String,
    Bool,
    /// Integer with optional inclusive bounds
    Int { min: Option<i64>, max: Option<i64> },
    /// Any number with optional inclusive bounds
    Float { min: Option<f64>, max: Option<f64> },
    /// One of a fixed set of strings
    Choice(Vec<String>),
    /// A path string, or a list of them
    Path,
    /// A list whose elements all pass the inner validator
    List(Box<Validator>),
}

impl Validator {
    pub fn int_min(min: i64) -> Self {
        Self::Int {
            min: Some(min),
            max: None,
        }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        Self::Int {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn float_min(min: f64) -> Self {
        Self::Float {
            min: Some(min),
            max: None,
        }
    }

    pub fn float_range(min: f64, max: f64) -> Self {
        Self::Float {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(choices.into_iter().map(Into::into).collect())
    }

    pub fn list_of(inner: Validator) -> Self {
        Self::List(Box::new(inner))
    }

    /// Check a value, describing the problem on failure.
    pub fn check(&self, value: &OptionValue) -> std::result::Result<(), String> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Self::Any => Ok(()),
            Self::String => expect(value.is_string(), "a string", value),
            Self::Bool => expect(value.is_boolean(), "a boolean", value),
            Self::Int { min, max } => {
                let Some(n) = value.as_i64() else {
                    return Err(format!("expected an integer, got {value}"));
                };
                if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
                    return Err(format!("{n} is outside {}", describe_range(min, max)));
                }
                Ok(())
            }
            Self::Float { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Err(format!("expected a number, got {value}"));
                };
                if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
                    return Err(format!("{n} is outside {}", describe_range(min, max)));
                }
                Ok(())
            }
            Self::Choice(choices) => match value.as_str() {
                Some(s) if choices.iter().any(|c| c == s) => Ok(()),
                _ => Err(format!("{value} is not one of {choices:?}")),
            },
            Self::Path => match value {
                OptionValue::String(_) => Ok(()),
                OptionValue::Array(items) if items.iter().all(|i| i.is_string()) => Ok(()),
                _ => Err(format!("expected a path or a list of paths, got {value}")),
            },
            Self::List(inner) => {
                let Some(items) = value.as_array() else {
                    return Err(format!("expected a list, got {value}"));
                };
                items.iter().try_for_each(|item| inner.check(item))
            }
        }
    }
}

fn expect(ok: bool, what: &str, value: &OptionValue) -> std::result::Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {what}, got {value}"))
    }
}

fn describe_range<T: std::fmt::Display>(min: &Option<T>, max: &Option<T>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
        (Some(lo), None) => format!("[{lo}, ..)"),
        (None, Some(hi)) => format!("(.., {hi}]"),
        (None, None) => "(.., ..)".to_string(),
    }
}

/// Schema entry for one configurable value.
///
/// Built with a small builder; a descriptor without a default is
/// representable so that registration can reject it.
///
/// ```
/// use pilot_meta::{OptionDescriptor, Validator};
/// use serde_json::json;
///
/// let lr = OptionDescriptor::new("learning_rate", "Learning rate")
///     .with_default(json!(1e-4))
///     .with_validator(Validator::float_min(0.0));
/// assert!(lr.has_default());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    pub name: String,
    /// `None` means no default was declared; `Some(Null)` is an unset default.
    pub default: Option<OptionValue>,
    pub help: String,
    pub validator: Validator,
    /// Value is joined under the run's output area.
    pub is_output_relative: bool,
    /// Value is stored relative to the working area.
    pub is_path: bool,
    /// Absolute path values may name files that do not exist yet.
    pub allow_missing: bool,
    /// Value is recomputed every run and never loaded from a file.
    pub per_run: bool,
}

impl OptionDescriptor {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            help: help.into(),
            validator: Validator::Any,
            is_output_relative: false,
            is_path: false,
            allow_missing: false,
            per_run: false,
        }
    }

    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_null_default(mut self) -> Self {
        self.default = Some(OptionValue::Null);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Mark as a working-area path option.
    pub fn path(mut self) -> Self {
        self.is_path = true;
        self.validator = Validator::Path;
        self
    }

    /// Exempt absolute path values from the existence check.
    pub fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }

    /// Mark as living under the output area.
    pub fn output_relative(mut self) -> Self {
        self.is_output_relative = true;
        self
    }

    pub fn per_run(mut self) -> Self {
        self.per_run = true;
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether a persisted value for this option must be ignored on load.
    pub fn is_recomputed_per_run(&self) -> bool {
        self.per_run || self.is_output_relative
    }

    /// Run the validator against `value`.
    pub fn check(&self, value: &OptionValue) -> Result<()> {
        self.validator
            .check(value)
            .map_err(|reason| Error::InvalidValue {
                option: self.name.clone(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Validator::String, json!("x"), true)]
    #[case(Validator::String, json!(1), false)]
    #[case(Validator::Bool, json!(false), true)]
    #[case(Validator::Bool, json!("false"), false)]
    #[case(Validator::int_min(1), json!(1), true)]
    #[case(Validator::int_min(1), json!(0), false)]
    #[case(Validator::int_min(1), json!(1.5), false)]
    #[case(Validator::int_range(1, 9), json!(10), false)]
    #[case(Validator::float_range(0.0, 1.0), json!(0.2), true)]
    #[case(Validator::float_range(0.0, 1.0), json!(1), true)]
    #[case(Validator::float_range(0.0, 1.0), json!(1.5), false)]
    #[case(Validator::choice(["batch", "epoch"]), json!("epoch"), true)]
    #[case(Validator::choice(["batch", "epoch"]), json!("step"), false)]
    #[case(Validator::Path, json!(["a", "b"]), true)]
    #[case(Validator::Path, json!([1]), false)]
    #[case(Validator::list_of(Validator::int_min(0)), json!([4, 4]), true)]
    #[case(Validator::list_of(Validator::int_min(0)), json!([4, -1]), false)]
    #[case(Validator::list_of(Validator::Any), json!(3), false)]
    #[case(Validator::int_min(1), json!(null), true)]
    fn validator_checks(#[case] validator: Validator, #[case] value: OptionValue, #[case] ok: bool) {
        assert_eq!(validator.check(&value).is_ok(), ok, "{validator:?} on {value}");
    }

    #[test]
    fn descriptor_check_names_the_option() {
        let desc = OptionDescriptor::new("epochs", "Number of epochs")
            .with_default(json!(1))
            .with_validator(Validator::int_min(1));

        let err = desc.check(&json!(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { option, .. } if option == "epochs"));
    }

    #[test]
    fn output_relative_options_are_recomputed() {
        let desc = OptionDescriptor::new("tensorboard_log_dir_name", "Tensorboard log dir")
            .with_default(json!("tensorboard"))
            .output_relative();
        assert!(desc.is_recomputed_per_run());
        assert!(!desc.per_run);
    }
}
