//! Rule-driven tokenizer for raw argument strings.
//!
//! The tokenizer walks the input left to right. At every position it tries
//! a fixed, ordered table of anchored rules and takes the first one that
//! matches:
//!
//! 1. `flags`: `-abc`, a bundle of short flags
//! 2. `flag`: `--name`, a long flag
//! 3. `rest`: a bare `--`, capturing everything after it verbatim
//! 4. `arg`: a run of non-whitespace, quoted runs, and escapes
//! 5. `whitespace`: discarded
//!
//! `-` followed by another `-` never satisfies rule 1, so `--name` falls
//! through to rule 2, and `--` only reaches rule 3 when no letter follows.
//!
//! # Examples
//!
//! ```
//! use argline_core::{TokenKind, tokenize};
//!
//! let tokens = tokenize(r#"-v --name "Jane Doe" -- tail"#);
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenKind::Flags, TokenKind::Flag, TokenKind::Arg, TokenKind::Rest]
//! );
//! assert_eq!(tokens[2].value, "Jane Doe");
//! assert_eq!(tokens[3].value, "tail");
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// One or more bundled short flags (`-abc`); the value holds the letters.
    Flags,
    /// A long flag (`--name`); the value holds the name without dashes.
    Flag,
    /// Everything after a bare `--`, verbatim.
    Rest,
    /// A plain argument, with quotes and escapes already resolved.
    Arg,
}

/// A classified fragment of the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte range of the whole match in the raw input.
    pub span: Range<usize>,
}

impl Token {
    /// Returns `true` for [`TokenKind::Arg`] tokens.
    pub fn is_arg(&self) -> bool {
        self.kind == TokenKind::Arg
    }
}

enum Emit {
    Token(TokenKind),
    Discard,
}

struct Rule {
    name: &'static str,
    pattern: Regex,
    emit: Emit,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, emit: Emit) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("static regex must compile"),
            emit,
        }
    }
}

/// Lexical rules in priority order. Every pattern is anchored with `^` and
/// is matched against the unscanned suffix of the input. Capture group 1,
/// when present, is the token value.
static RULES: LazyLock<[Rule; 5]> = LazyLock::new(|| {
    [
        Rule::new("flags", r"^-([a-zA-Z]+)", Emit::Token(TokenKind::Flags)),
        Rule::new(
            "flag",
            r"^--([a-zA-Z][-a-zA-Z]*)",
            Emit::Token(TokenKind::Flag),
        ),
        Rule::new("rest", r"(?s)^--(?:\s+|$)(.*)", Emit::Token(TokenKind::Rest)),
        Rule::new(
            "arg",
            r#"(?s)^(?:\\.|'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|\S)+"#,
            Emit::Token(TokenKind::Arg),
        ),
        Rule::new("whitespace", r"^\s+", Emit::Discard),
    ]
});

/// Splits `raw` into an ordered token stream.
///
/// Never fails: the `arg` and `whitespace` rules between them accept every
/// character.
///
/// # Examples
///
/// ```
/// use argline_core::{TokenKind, tokenize};
///
/// let tokens = tokenize(r#"'it\'s "fine"'"#);
/// assert_eq!(tokens.len(), 1);
/// assert_eq!(tokens[0].kind, TokenKind::Arg);
/// assert_eq!(tokens[0].value, r#"it's "fine""#);
/// ```
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < raw.len() {
        let remaining = &raw[pos..];
        let (rule, caps) = RULES
            .iter()
            .find_map(|rule| rule.pattern.captures(remaining).map(|caps| (rule, caps)))
            .unwrap_or_else(|| unreachable!("arg and whitespace rules match every character"));

        let matched = caps.get(0).map_or(0, |m| m.end());
        let span = pos..pos + matched;
        pos += matched;

        let Emit::Token(kind) = rule.emit else {
            continue;
        };

        let value = match kind {
            TokenKind::Arg => unquote(&remaining[..matched]),
            _ => caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        };

        trace!(rule = rule.name, ?span, value = %value, "token");
        tokens.push(Token { kind, value, span });
    }

    tokens
}

/// Resolves quoting and escaping in the text of an `arg` match.
///
/// Each quoted run not preceded by an escaping backslash is replaced with its
/// inner content, then every remaining `\x` becomes `x`. A quote without a
/// closing partner is kept as a literal character, as is a trailing lone
/// backslash.
fn unquote(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                out.push(chars[i + 1]);
                i += 2;
            }
            quote @ ('\'' | '"') => match closing_quote(&chars, i + 1, quote) {
                Some(end) => {
                    push_unescaped(&mut out, &chars[i + 1..end]);
                    i = end + 1;
                }
                None => {
                    out.push(quote);
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Finds the index of the quote that closes a run opened just before `start`.
fn closing_quote(chars: &[char], start: usize, quote: char) -> Option<usize> {
    let mut j = start;
    while j < chars.len() {
        match chars[j] {
            '\\' if j + 1 < chars.len() => j += 2,
            '\\' => return None,
            c if c == quote => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn push_unescaped(out: &mut String, inner: &[char]) {
    let mut iter = inner.iter();
    while let Some(&c) = iter.next() {
        if c == '\\' {
            if let Some(&escaped) = iter.next() {
                out.push(escaped);
                continue;
            }
        }
        out.push(c);
    }
}
