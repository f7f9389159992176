//! Schema type definitions.
//!
//! A [`Schema`] declares what a parse call expects: an ordered list of
//! positional [`ArgumentSpec`]s, a list of [`OptionSpec`]s, and an optional
//! global [`Transform`]. Schemas are read-only during parsing and can be
//! shared across threads and calls.
//!
//! All types deserialize with [`serde`], so schemas can be loaded from JSON
//! or YAML. Closure transforms are not serializable and are skipped; use a
//! [`ValueKind`] to get conversions into a schema file.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::result::ParseResult;
use crate::transform::{Converter, Transform, ValueKind};

/// A positional argument, or a sub-argument of an option.
///
/// # Examples
///
/// ```
/// use argline_core::{ArgumentSpec, ValueKind};
///
/// let src = ArgumentSpec::required("source");
/// assert!(src.required);
///
/// let count = ArgumentSpec::optional("count").with_kind(ValueKind::Integer);
/// assert!(!count.required);
/// assert_eq!(count.kind, Some(ValueKind::Integer));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Key under which the value is stored.
    pub name: String,
    /// Fail the parse when no value is found.
    #[serde(default)]
    pub required: bool,
    /// Built-in conversion, used when no closure transform is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    /// Closure transform; takes precedence over `kind`.
    #[serde(skip)]
    pub transform: Option<Transform>,
}

impl ArgumentSpec {
    /// Creates a required argument.
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            ..Default::default()
        }
    }

    /// Creates an optional argument.
    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the built-in conversion.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the closure transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub(crate) fn converter(&self) -> Option<Converter<'_>> {
        own_converter(self.transform.as_ref(), self.kind.as_ref())
    }
}

/// A named option, reachable as `--name` and optionally as `-s`.
///
/// An option without sub-arguments is a boolean flag. An option with
/// sub-arguments consumes the `arg` tokens that immediately follow it.
///
/// # Examples
///
/// ```
/// use argline_core::{ArgumentSpec, OptionSpec};
///
/// let verbose = OptionSpec::new("verbose").with_short('v');
/// assert!(verbose.args.is_empty());
///
/// // Single sub-argument sharing the option's name: the value is stored
/// // directly instead of in a nested map.
/// let output = OptionSpec::with_value("output").with_short('o');
/// assert!(output.collapses());
///
/// let size = OptionSpec::new("size")
///     .with_arg(ArgumentSpec::required("width"))
///     .with_arg(ArgumentSpec::required("height"));
/// assert!(!size.collapses());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Long name, matched against `--name`.
    pub name: String,
    /// Short letter, matched against each letter of a `-abc` bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Sub-arguments consumed after the flag, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentSpec>,
    /// Fail the parse when the option never appears.
    #[serde(default)]
    pub required: bool,
    /// Built-in conversion, used when no closure transform is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    /// Closure transform; takes precedence over `kind`.
    #[serde(skip)]
    pub transform: Option<Transform>,
}

impl OptionSpec {
    /// Creates an optional boolean flag.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Creates an option taking one value stored directly under `name`.
    pub fn with_value(name: &str) -> Self {
        Self::new(name).with_arg(ArgumentSpec::required(name))
    }

    /// Sets the short letter.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Appends a sub-argument.
    pub fn with_arg(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Marks the option as required.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the built-in conversion.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the closure transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns `true` when the option's value is stored as a scalar rather
    /// than a map: it has exactly one sub-argument, named like the option.
    pub fn collapses(&self) -> bool {
        matches!(self.args.as_slice(), [only] if only.name == self.name)
    }

    pub(crate) fn converter(&self) -> Option<Converter<'_>> {
        own_converter(self.transform.as_ref(), self.kind.as_ref())
    }
}

fn own_converter<'a>(
    transform: Option<&'a Transform>,
    kind: Option<&'a ValueKind>,
) -> Option<Converter<'a>> {
    transform
        .map(Converter::Custom)
        .or_else(|| kind.map(Converter::Kind))
}

/// Complete parser configuration.
///
/// # Examples
///
/// ```
/// use argline_core::*;
///
/// let schema = Schema::new()
///     .with_arg(ArgumentSpec::required("file"))
///     .with_option(OptionSpec::new("force").with_short('f'))
///     .with_option(OptionSpec::with_value("mode").with_short('m'));
///
/// assert!(schema.find_option("force").is_some());
/// assert_eq!(schema.find_short('m').unwrap().name, "mode");
/// assert!(schema.find_short('x').is_none());
///
/// let result = schema.parse("-f notes.txt --mode fast").unwrap();
/// assert!(result.flag("force"));
/// assert_eq!(result.args["file"], "notes.txt");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Positional arguments, matched in order.
    #[serde(default)]
    pub args: Vec<ArgumentSpec>,
    /// Options, looked up by long name or short letter.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Fallback transform for every argument and option without its own.
    /// Identity when unset.
    #[serde(skip)]
    pub transform: Option<Transform>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the global fallback transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Finds an option by long name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Finds an option by short letter.
    pub fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.short == Some(short))
    }

    /// Parses `raw` against this schema. See [`parse`](crate::parse).
    pub fn parse(&self, raw: &str) -> Result<ParseResult> {
        crate::parser::parse(raw, self)
    }

    pub(crate) fn converter(&self) -> Option<Converter<'_>> {
        self.transform.as_ref().map(Converter::Custom)
    }
}
