//! Schema validation.
//!
//! Catches schema mistakes that would otherwise surface as confusing parse
//! behavior: options no flag can reach, short letters the tokenizer never
//! produces, and duplicate names that would make two specs write the same
//! result key.
//!
//! Parsing does not require a validated schema.
//!
//! # Examples
//!
//! ```
//! use argline_core::*;
//!
//! let schema = Schema::new()
//!     .with_arg(ArgumentSpec::required("file"))
//!     .with_option(OptionSpec::new("dry-run").with_short('n'));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: `-1` tokenizes as an argument, never as a short flag
//! let bad = Schema::new().with_option(OptionSpec::new("one").with_short('1'));
//! assert_eq!(validate_schema(&bad), vec![SchemaError::InvalidShort('1')]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgumentSpec, OptionSpec, Schema};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A positional argument has an empty or whitespace-only name.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
    /// An option has an empty name.
    #[error("option name cannot be empty")]
    EmptyOptionName,
    /// An option name is not `[a-zA-Z][-a-zA-Z]*`, so no `--name` flag
    /// can reach it.
    #[error("option name cannot be written as a long flag: {0}")]
    InvalidOptionName(String),
    /// A short name is not an ASCII letter.
    #[error("short flag must be an ASCII letter: {0}")]
    InvalidShort(char),
    /// Two positional arguments share a name.
    #[error("duplicate argument: {0}")]
    DuplicateArgument(String),
    /// Two options share a name.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Two options share a short letter.
    #[error("duplicate short flag: -{0}")]
    DuplicateShort(char),
    /// Two sub-arguments of one option share a name.
    #[error("duplicate argument `{argument}` in option `{option}`")]
    DuplicateOptionArgument { option: String, argument: String },
}

/// Validates a schema.
///
/// Returns the first problem found, or an empty list.
///
/// # Examples
///
/// ```
/// use argline_core::*;
///
/// let schema = Schema::new()
///     .with_option(OptionSpec::new("all").with_short('a'))
///     .with_option(OptionSpec::new("append").with_short('a'));
/// assert_eq!(validate_schema(&schema), vec![SchemaError::DuplicateShort('a')]);
/// ```
pub fn validate_schema(schema: &Schema) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    errors.extend(validate_args(&schema.args));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_options(&schema.options));
    errors
}

fn validate_args(args: &[ArgumentSpec]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for arg in args {
        let name = arg.name.trim();
        if name.is_empty() {
            errors.push(SchemaError::EmptyArgumentName);
            return errors;
        }
        if !seen.insert(name) {
            errors.push(SchemaError::DuplicateArgument(name.to_string()));
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[OptionSpec]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut shorts = HashSet::new();

    for option in options {
        if option.name.is_empty() {
            errors.push(SchemaError::EmptyOptionName);
            return errors;
        }

        if !is_long_flag_name(&option.name) {
            errors.push(SchemaError::InvalidOptionName(option.name.clone()));
            return errors;
        }

        if !names.insert(option.name.as_str()) {
            errors.push(SchemaError::DuplicateOption(option.name.clone()));
            return errors;
        }

        if let Some(short) = option.short {
            if !short.is_ascii_alphabetic() {
                errors.push(SchemaError::InvalidShort(short));
                return errors;
            }
            if !shorts.insert(short) {
                errors.push(SchemaError::DuplicateShort(short));
                return errors;
            }
        }

        let mut seen_args = HashSet::new();
        for arg in &option.args {
            if arg.name.trim().is_empty() {
                errors.push(SchemaError::EmptyArgumentName);
                return errors;
            }
            if !seen_args.insert(arg.name.as_str()) {
                errors.push(SchemaError::DuplicateOptionArgument {
                    option: option.name.clone(),
                    argument: arg.name.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

/// Mirrors the tokenizer's long-flag rule: a letter, then letters or hyphens.
fn is_long_flag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphabetic() || c == '-')
}
