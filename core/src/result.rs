//! Parse output.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// The value recorded for an option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A bare flag (`true`, or whatever its transform produced), or the
    /// value of a collapsing option.
    Value(Value),
    /// Sub-argument values keyed by sub-argument name.
    Args(BTreeMap<String, Value>),
}

impl OptionValue {
    /// Returns the scalar value, if this is not a sub-argument map.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            OptionValue::Value(value) => Some(value),
            OptionValue::Args(_) => None,
        }
    }

    /// Returns the sub-argument map, if any.
    pub fn as_args(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            OptionValue::Args(args) => Some(args),
            OptionValue::Value(_) => None,
        }
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        OptionValue::Value(value)
    }
}

/// Structured result of a successful parse.
///
/// # Examples
///
/// ```
/// use argline_core::*;
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .with_arg(ArgumentSpec::required("target"))
///     .with_option(OptionSpec::new("all").with_short('a'));
///
/// let result = schema.parse("-a build -- --release").unwrap();
/// assert_eq!(result.arg("target"), Some(&json!("build")));
/// assert!(result.flag("all"));
/// assert_eq!(result.rest.as_deref(), Some("--release"));
/// assert_eq!(result.raw, "-a build -- --release");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    /// Positional argument values by name.
    pub args: BTreeMap<String, Value>,
    /// Option values by option name.
    pub options: BTreeMap<String, OptionValue>,
    /// Text after the first bare `--`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    /// The input string, unchanged.
    pub raw: String,
}

impl ParseResult {
    pub(crate) fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            ..Default::default()
        }
    }

    /// Value of a positional argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Value of an option.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Returns `true` when the option holds the boolean `true`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.option(name),
            Some(OptionValue::Value(Value::Bool(true)))
        )
    }
}
