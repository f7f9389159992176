//! Error types for parsing and value conversion.
//!
//! Every variant of [`ParseError`] is terminal for the call that produced it:
//! the parser never returns a partial [`ParseResult`](crate::ParseResult).

use thiserror::Error;

/// Errors that abort a [`parse`](crate::parse) call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A `-x` or `--name` flag has no matching option.
    ///
    /// The payload is the flag as written, dashes included.
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),

    /// A required sub-argument of an option was not followed by a value.
    #[error("missing required argument `{argument}` for option `{option}`")]
    MissingRequiredOptionArgument {
        /// Name of the option being consumed.
        option: String,
        /// Name of the sub-argument that had no value.
        argument: String,
    },

    /// A required option never appeared in the input.
    #[error("missing required option `{0}`")]
    MissingRequiredOption(String),

    /// A required positional argument never received a value.
    #[error("missing required argument `{0}`")]
    MissingRequiredArgument(String),

    /// The same option occurred more than once in one input.
    #[error("option `{0}` given more than once")]
    DuplicateOption(String),

    /// A transform rejected its input.
    #[error("invalid value for `{target}`: {source}")]
    Transform {
        /// Name of the argument or option the value was meant for.
        target: String,
        /// The transform's own error.
        #[source]
        source: TransformError,
    },
}

/// Errors raised by transforms, built-in or user-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Text is not a valid signed 64-bit integer.
    #[error("`{0}` is not an integer")]
    InvalidInteger(String),

    /// Text is not a valid floating point number.
    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    /// Text is not a recognized boolean spelling.
    #[error("`{0}` is not a boolean")]
    InvalidBool(String),

    /// Text is not one of the allowed choices.
    #[error("`{value}` is not one of: {}", .choices.join(", "))]
    InvalidChoice {
        value: String,
        choices: Vec<String>,
    },

    /// Free-form failure from a caller-supplied transform.
    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    /// Creates a [`TransformError::Custom`] from any displayable message.
    ///
    /// # Examples
    ///
    /// ```
    /// use argline_core::TransformError;
    ///
    /// let err = TransformError::custom("port out of range");
    /// assert_eq!(err.to_string(), "port out of range");
    /// ```
    pub fn custom(message: impl std::fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
