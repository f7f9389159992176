//! Schema-driven token consumer.
//!
//! The parser walks the token stream once, left to right, with two cursors:
//! one into the tokens and one into the schema's positional arguments. Both
//! live in a [`ParseState`] built for a single call and dropped at the end of
//! it, so concurrent calls over the same [`Schema`] never share state.
//!
//! Dispatch by token kind:
//!
//! - `flags`: each letter is looked up as a short option and consumed.
//! - `flag`: the name is looked up as a long option and consumed.
//! - `arg`: offered to the positional slot under the cursor. The slot is
//!   used up whether or not its transform produced a value; the token is
//!   only consumed when it did. Tokens with no slot left are dropped.
//! - `rest`: stored verbatim.
//!
//! Consuming an option either transforms `true` (no sub-arguments) or offers
//! the following `arg` tokens to each sub-argument in turn.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{ParseError, Result, TransformError};
use crate::lexer::{Token, TokenKind, tokenize};
use crate::result::{OptionValue, ParseResult};
use crate::schema::{ArgumentSpec, OptionSpec, Schema};
use crate::transform::{Target, apply_resolved, first_present};

/// Parses `raw` against `schema`.
///
/// Tokenizes the whole input first, then consumes the tokens and finally
/// checks required options and arguments. Any error aborts the call; no
/// partial result is returned.
///
/// # Errors
///
/// - [`ParseError::UnknownFlag`] for a flag that matches no option.
/// - [`ParseError::MissingRequiredOptionArgument`] when a required
///   sub-argument is not followed by an `arg` token.
/// - [`ParseError::DuplicateOption`] when an option is given twice.
/// - [`ParseError::MissingRequiredOption`] and
///   [`ParseError::MissingRequiredArgument`] from the final check.
/// - [`ParseError::Transform`] when a transform fails.
///
/// # Examples
///
/// ```
/// use argline_core::*;
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .with_option(OptionSpec::with_value("name"))
///     .with_option(OptionSpec::new("a").with_short('a'))
///     .with_option(OptionSpec::new("b").with_short('b'));
///
/// let result = parse("-ab --name Alice", &schema).unwrap();
/// assert!(result.flag("a") && result.flag("b"));
/// assert_eq!(result.option("name").unwrap().as_value(), Some(&json!("Alice")));
///
/// let err = parse("--bogus", &schema).unwrap_err();
/// assert_eq!(err, ParseError::UnknownFlag("--bogus".into()));
/// ```
pub fn parse(raw: &str, schema: &Schema) -> Result<ParseResult> {
    let tokens = tokenize(raw);
    debug!(tokens = tokens.len(), "tokenized input");
    ParseState::new(raw, schema, &tokens).run()
}

/// Cursor state for one parse call.
struct ParseState<'a> {
    schema: &'a Schema,
    tokens: &'a [Token],
    token_cursor: usize,
    arg_cursor: usize,
    result: ParseResult,
}

impl<'a> ParseState<'a> {
    fn new(raw: &str, schema: &'a Schema, tokens: &'a [Token]) -> Self {
        Self {
            schema,
            tokens,
            token_cursor: 0,
            arg_cursor: 0,
            result: ParseResult::new(raw),
        }
    }

    fn run(mut self) -> Result<ParseResult> {
        let tokens = self.tokens;
        let schema = self.schema;

        while let Some(token) = tokens.get(self.token_cursor) {
            match token.kind {
                TokenKind::Flags => {
                    self.token_cursor += 1;
                    for short in token.value.chars() {
                        let option = schema
                            .find_short(short)
                            .ok_or_else(|| ParseError::UnknownFlag(format!("-{short}")))?;
                        self.record_option(option)?;
                    }
                }
                TokenKind::Flag => {
                    self.token_cursor += 1;
                    let option = schema
                        .find_option(&token.value)
                        .ok_or_else(|| ParseError::UnknownFlag(format!("--{}", token.value)))?;
                    self.record_option(option)?;
                }
                TokenKind::Arg => self.offer_positional(token)?,
                TokenKind::Rest => {
                    self.result.rest = Some(token.value.clone());
                    self.token_cursor += 1;
                }
            }
        }

        self.check_required()?;
        Ok(self.result)
    }

    fn offer_positional(&mut self, token: &Token) -> Result<()> {
        let schema = self.schema;
        let Some(arg) = schema.args.get(self.arg_cursor) else {
            debug!(value = %token.value, "no positional slot left, dropping argument");
            self.token_cursor += 1;
            return Ok(());
        };

        let converter = first_present([arg.converter(), schema.converter()]);
        let value = apply_resolved(
            converter,
            &Value::String(token.value.clone()),
            Target::Argument(arg),
            None,
        )
        .map_err(|source| transform_failed(&arg.name, source))?;

        match present(value) {
            Some(value) => {
                self.result.args.insert(arg.name.clone(), value);
                self.token_cursor += 1;
            }
            None => debug!(arg = %arg.name, "no value, offering token to next slot"),
        }
        self.arg_cursor += 1;
        Ok(())
    }

    fn record_option(&mut self, option: &'a OptionSpec) -> Result<()> {
        if self.result.options.contains_key(&option.name) {
            return Err(ParseError::DuplicateOption(option.name.clone()));
        }
        match self.consume_option(option)? {
            Some(value) => {
                self.result.options.insert(option.name.clone(), value);
            }
            None => debug!(option = %option.name, "flag transform produced no value"),
        }
        Ok(())
    }

    fn consume_option(&mut self, option: &'a OptionSpec) -> Result<Option<OptionValue>> {
        let tokens = self.tokens;

        if option.args.is_empty() {
            let converter = first_present([option.converter(), self.schema.converter()]);
            let value = apply_resolved(converter, &Value::Bool(true), Target::Option(option), None)
                .map_err(|source| transform_failed(&option.name, source))?;
            return Ok(present(value).map(OptionValue::Value));
        }

        let mut values = BTreeMap::new();
        for arg in &option.args {
            let Some(token) = tokens.get(self.token_cursor).filter(|t| t.is_arg()) else {
                if arg.required {
                    return Err(ParseError::MissingRequiredOptionArgument {
                        option: option.name.clone(),
                        argument: arg.name.clone(),
                    });
                }
                continue;
            };

            let Some(value) = self.convert_option_arg(option, arg, token)? else {
                continue;
            };
            self.token_cursor += 1;

            if option.collapses() {
                return Ok(Some(OptionValue::Value(value)));
            }
            values.insert(arg.name.clone(), value);
        }

        Ok(Some(OptionValue::Args(values)))
    }

    fn convert_option_arg(
        &self,
        option: &OptionSpec,
        arg: &ArgumentSpec,
        token: &Token,
    ) -> Result<Option<Value>> {
        let converter = first_present([
            arg.converter(),
            option.converter(),
            self.schema.converter(),
        ]);
        let value = apply_resolved(
            converter,
            &Value::String(token.value.clone()),
            Target::Argument(arg),
            Some(option),
        )
        .map_err(|source| transform_failed(&arg.name, source))?;
        Ok(present(value))
    }

    fn check_required(&self) -> Result<()> {
        if let Some(option) = self
            .schema
            .options
            .iter()
            .find(|o| o.required && !self.result.options.contains_key(&o.name))
        {
            return Err(ParseError::MissingRequiredOption(option.name.clone()));
        }

        if let Some(arg) = self
            .schema
            .args
            .iter()
            .find(|a| a.required && !self.result.args.contains_key(&a.name))
        {
            return Err(ParseError::MissingRequiredArgument(arg.name.clone()));
        }

        Ok(())
    }
}

/// JSON `null` counts as "no value", like a transform returning `None`.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn transform_failed(target: &str, source: TransformError) -> ParseError {
    ParseError::Transform {
        target: target.to_string(),
        source,
    }
}
