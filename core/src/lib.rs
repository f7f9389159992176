//! Tokenizer and schema-driven parser for shell-like argument strings.
//!
//! This crate turns a single raw string such as `-v --out 'my dir' src -- x`
//! into a structured [`ParseResult`] without invoking a shell:
//!
//! - [`tokenize`] — splits the string into [`Token`]s (`flags`, `flag`,
//!   `rest`, `arg`), resolving quotes and backslash escapes.
//! - [`parse`] — consumes the tokens against a [`Schema`] of positional
//!   [`ArgumentSpec`]s and [`OptionSpec`]s, converting values through
//!   [`Transform`]s and [`ValueKind`]s and enforcing required fields.
//!
//! Validation ([`validate_schema`]) catches schema mistakes such as
//! duplicate names and options no flag can reach.
//!
//! # Example
//!
//! ```
//! use argline_core::*;
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .with_arg(ArgumentSpec::required("script"))
//!     .with_option(OptionSpec::new("verbose").with_short('v'))
//!     .with_option(
//!         OptionSpec::with_value("port")
//!             .with_short('p')
//!             .with_kind(ValueKind::Integer),
//!     );
//!
//! let result = parse(r#"-v -p 8080 "my app.js" -- --inspect"#, &schema).unwrap();
//! assert!(result.flag("verbose"));
//! assert_eq!(result.option("port").unwrap().as_value(), Some(&json!(8080)));
//! assert_eq!(result.arg("script"), Some(&json!("my app.js")));
//! assert_eq!(result.rest.as_deref(), Some("--inspect"));
//! assert!(validate_schema(&schema).is_empty());
//! ```

mod error;
mod lexer;
mod parser;
mod result;
mod schema;
mod transform;
mod validate;

pub use error::{ParseError, Result, TransformError};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse;
pub use result::{OptionValue, ParseResult};
pub use schema::{ArgumentSpec, OptionSpec, Schema};
pub use transform::{Target, Transform, ValueKind};
pub use validate::{SchemaError, validate_schema};
