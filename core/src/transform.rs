//! Value transforms.
//!
//! A transform turns the raw text of a token (or the boolean `true` of a
//! bare flag) into the value stored in the [`ParseResult`](crate::ParseResult).
//! Transforms come in two forms:
//!
//! - [`Transform`]: a caller-supplied closure.
//! - [`ValueKind`]: a declarative built-in conversion, usable from schema
//!   files.
//!
//! Returning `Ok(None)` means "no value": the parser leaves the token in
//! place and moves on to the next candidate slot.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransformError;
use crate::schema::{ArgumentSpec, OptionSpec};

/// The argument or option a value is being converted for.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A positional argument, or a sub-argument of an option.
    Argument(&'a ArgumentSpec),
    /// An option without sub-arguments.
    Option(&'a OptionSpec),
}

impl<'a> Target<'a> {
    /// Name of the argument or option.
    pub fn name(&self) -> &'a str {
        match *self {
            Target::Argument(arg) => &arg.name,
            Target::Option(opt) => &opt.name,
        }
    }
}

type TransformFn = dyn Fn(&Value, Target<'_>, Option<&OptionSpec>) -> Result<Option<Value>, TransformError>
    + Send
    + Sync;

/// A caller-supplied conversion function.
///
/// The function receives the raw value (a JSON string for argument text,
/// `true` for a bare flag), the target it is converting for, and, for
/// sub-arguments, the option that owns the target.
///
/// # Examples
///
/// ```
/// use argline_core::{ArgumentSpec, Schema, Transform, TransformError, parse};
/// use serde_json::{Value, json};
///
/// let port = Transform::text(|text| {
///     text.parse::<u16>()
///         .map(|p| Some(Value::from(p)))
///         .map_err(TransformError::custom)
/// });
/// let schema = Schema::new().with_arg(ArgumentSpec::required("port").with_transform(port));
///
/// let result = parse("8080", &schema).unwrap();
/// assert_eq!(result.args["port"], json!(8080));
/// assert!(parse("99999", &schema).is_err());
/// ```
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    /// Wraps a closure with the full transform signature.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, Target<'_>, Option<&OptionSpec>) -> Result<Option<Value>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a closure that only looks at argument text.
    ///
    /// Non-string inputs, i.e. the `true` of a bare flag, pass through
    /// unchanged.
    pub fn text<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<Value>, TransformError> + Send + Sync + 'static,
    {
        Self::new(move |value, _, _| match value {
            Value::String(text) => f(text.as_str()),
            other => Ok(Some(other.clone())),
        })
    }

    /// Applies the transform.
    pub fn apply(
        &self,
        value: &Value,
        target: Target<'_>,
        option: Option<&OptionSpec>,
    ) -> Result<Option<Value>, TransformError> {
        (self.0)(value, target, option)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Built-in conversions for argument text.
///
/// Only string inputs are converted; anything else (the `true` of a bare
/// flag) is returned unchanged.
///
/// # Examples
///
/// ```
/// use argline_core::ValueKind;
/// use serde_json::{Value, json};
///
/// let kind = ValueKind::Integer;
/// assert_eq!(kind.convert(&json!("42")).unwrap(), Some(json!(42)));
/// assert!(kind.convert(&json!("4.2")).is_err());
///
/// let kind = ValueKind::Choice(vec!["json".into(), "yaml".into()]);
/// assert_eq!(kind.convert(&json!("yaml")).unwrap(), Some(json!("yaml")));
/// assert_eq!(kind.convert(&Value::Bool(true)).unwrap(), Some(Value::Bool(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Keep the text as-is (the default).
    #[default]
    Any,
    /// Keep the text as-is.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Finite floating point number.
    Number,
    /// `true/false/yes/no/on/off/1/0`, case-insensitive.
    Bool,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
}

impl ValueKind {
    /// Converts `value` according to this kind.
    pub fn convert(&self, value: &Value) -> Result<Option<Value>, TransformError> {
        let Value::String(text) = value else {
            return Ok(Some(value.clone()));
        };

        let converted = match self {
            ValueKind::Any | ValueKind::String => value.clone(),
            ValueKind::Integer => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| TransformError::InvalidInteger(text.clone()))?,
            ValueKind::Number => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| TransformError::InvalidNumber(text.clone()))?,
            ValueKind::Bool => Value::Bool(parse_bool(text)?),
            ValueKind::Choice(choices) => {
                if !choices.iter().any(|c| c == text) {
                    return Err(TransformError::InvalidChoice {
                        value: text.clone(),
                        choices: choices.clone(),
                    });
                }
                value.clone()
            }
        };

        Ok(Some(converted))
    }
}

fn parse_bool(text: &str) -> Result<bool, TransformError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(TransformError::InvalidBool(text.to_string())),
    }
}

/// A transform borrowed from a schema, ready to apply.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Converter<'a> {
    Custom(&'a Transform),
    Kind(&'a ValueKind),
}

impl Converter<'_> {
    pub(crate) fn apply(
        self,
        value: &Value,
        target: Target<'_>,
        option: Option<&OptionSpec>,
    ) -> Result<Option<Value>, TransformError> {
        match self {
            Converter::Custom(transform) => transform.apply(value, target, option),
            Converter::Kind(kind) => kind.convert(value),
        }
    }
}

/// Picks the first present converter of a precedence chain.
pub(crate) fn first_present<'a>(
    chain: impl IntoIterator<Item = Option<Converter<'a>>>,
) -> Option<Converter<'a>> {
    chain.into_iter().flatten().next()
}

/// Applies a resolved converter, or passes the value through when the whole
/// chain was empty.
pub(crate) fn apply_resolved(
    converter: Option<Converter<'_>>,
    value: &Value,
    target: Target<'_>,
    option: Option<&OptionSpec>,
) -> Result<Option<Value>, TransformError> {
    match converter {
        Some(converter) => converter.apply(value, target, option),
        None => Ok(Some(value.clone())),
    }
}
