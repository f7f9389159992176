//! Parsing a chat-style command line.
//!
//! Demonstrates building a schema in code, attaching a closure transform,
//! and reading typed values back out of the result.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argline-core --example parse_line
//! ```

use argline_core::{
    ArgumentSpec, OptionSpec, Schema, Transform, TransformError, ValueKind, parse,
};
use serde_json::Value;

fn main() {
    // Durations like "10m" or "2h", converted to seconds.
    let duration = Transform::text(|text| {
        let Some(unit) = text.chars().last() else {
            return Ok(None);
        };
        let digits = &text[..text.len() - unit.len_utf8()];
        let scale = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return Err(TransformError::custom(format!("bad duration `{text}`"))),
        };
        digits
            .parse::<u64>()
            .map(|n| Some(Value::from(n * scale)))
            .map_err(TransformError::custom)
    });

    let schema = Schema::new()
        .with_arg(ArgumentSpec::required("user"))
        .with_arg(ArgumentSpec::optional("reason"))
        .with_option(OptionSpec::new("silent").with_short('s'))
        .with_option(
            OptionSpec::with_value("duration")
                .with_short('d')
                .with_transform(duration),
        )
        .with_option(
            OptionSpec::new("notify")
                .with_arg(ArgumentSpec::required("channel"))
                .with_arg(ArgumentSpec::optional("delay").with_kind(ValueKind::Integer)),
        );

    let raw = r#"-s -d 10m alice "spamming links" --notify mod-log 5 -- see ticket #42"#;

    match parse(raw, &schema) {
        Ok(result) => {
            println!("user:     {:?}", result.arg("user"));
            println!("reason:   {:?}", result.arg("reason"));
            println!("silent:   {}", result.flag("silent"));
            println!("duration: {:?}", result.option("duration"));
            println!("notify:   {:?}", result.option("notify"));
            println!("rest:     {:?}", result.rest);
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("\n{json}"),
                Err(err) => eprintln!("serialization failed: {err}"),
            }
        }
        Err(err) => eprintln!("parse failed: {err}"),
    }
}
