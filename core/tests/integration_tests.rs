//! Integration tests for the argline-core crate.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use argline_core::{
    ArgumentSpec, OptionSpec, OptionValue, ParseError, Schema, TokenKind, Transform,
    TransformError, ValueKind, parse, tokenize, validate_schema,
};
use serde_json::{Value, json};

/// A `cp`-like schema with flags, a collapsing option, a multi-argument
/// option, and two positionals.
fn copy_schema() -> Schema {
    Schema::new()
        .with_arg(ArgumentSpec::required("source"))
        .with_arg(ArgumentSpec::required("dest"))
        .with_option(OptionSpec::new("recursive").with_short('r'))
        .with_option(OptionSpec::new("force").with_short('f'))
        .with_option(
            OptionSpec::with_value("mode")
                .with_short('m')
                .with_kind(ValueKind::Choice(vec!["copy".into(), "link".into()])),
        )
        .with_option(
            OptionSpec::new("chown")
                .with_arg(ArgumentSpec::required("user"))
                .with_arg(ArgumentSpec::optional("group")),
        )
}

#[test]
fn test_full_command_line() {
    let raw = r#"-rf --mode link --chown root wheel "old name.txt" new\ name.txt -- --not-parsed"#;
    let result = parse(raw, &copy_schema()).unwrap();

    assert!(result.flag("recursive"));
    assert!(result.flag("force"));
    assert_eq!(result.options["mode"], OptionValue::Value(json!("link")));
    assert_eq!(
        result.options["chown"],
        OptionValue::Args(BTreeMap::from([
            ("user".to_string(), json!("root")),
            ("group".to_string(), json!("wheel")),
        ]))
    );
    assert_eq!(result.args["source"], json!("old name.txt"));
    assert_eq!(result.args["dest"], json!("new name.txt"));
    assert_eq!(result.rest.as_deref(), Some("--not-parsed"));
    assert_eq!(result.raw, raw);
}

#[test]
fn test_invalid_choice_names_target() {
    let err = parse("-m move a b", &copy_schema()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Transform {
            ref target,
            source: TransformError::InvalidChoice { .. },
        } if target == "mode"
    ));
    assert_eq!(
        err.to_string(),
        "invalid value for `mode`: `move` is not one of: copy, link"
    );
}

#[test]
fn test_missing_positional_reported_after_options() {
    let err = parse("-r only-one", &copy_schema()).unwrap_err();
    assert_eq!(err, ParseError::MissingRequiredArgument("dest".into()));
}

#[test]
fn test_serialized_result_shape() {
    let result = parse("-f a b --chown me", &copy_schema()).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({
            "args": {"source": "a", "dest": "b"},
            "options": {"force": true, "chown": {"user": "me"}},
            "raw": "-f a b --chown me",
        })
    );
}

#[test]
fn test_quote_and_escape_handling() {
    let tokens = tokenize(r#"'it\'s "fine"'"#);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Arg);
    assert_eq!(tokens[0].value, r#"it's "fine""#);
}

#[test]
fn test_whitespace_split_matches_tokenizer_for_plain_words() {
    let raw = "alpha beta\tgamma\n delta";
    let values: Vec<String> = tokenize(raw).into_iter().map(|t| t.value).collect();
    let expected: Vec<&str> = raw.split_whitespace().collect();
    assert_eq!(values, expected);
}

#[test]
fn test_global_transform_applies_everywhere() {
    let upper = Transform::text(|text| Ok(Some(Value::String(text.to_uppercase()))));
    let schema = Schema::new()
        .with_transform(upper)
        .with_arg(ArgumentSpec::optional("word"))
        .with_option(OptionSpec::with_value("name").with_short('n'))
        .with_option(OptionSpec::new("x").with_short('x'));

    let result = parse("-x -n bob hello", &schema).unwrap();
    assert_eq!(result.args["word"], json!("HELLO"));
    assert_eq!(result.options["name"], OptionValue::Value(json!("BOB")));
    assert!(result.flag("x"));
}

#[test]
fn test_flag_transform_can_replace_true() {
    let schema = Schema::new().with_option(
        OptionSpec::new("level")
            .with_short('l')
            .with_transform(Transform::new(|_, _, _| Ok(Some(json!(3))))),
    );
    let result = parse("-l", &schema).unwrap();
    assert_eq!(result.options["level"], OptionValue::Value(json!(3)));
}

#[test]
fn test_concurrent_parses_share_schema() {
    let schema = Arc::new(copy_schema());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let raw = format!("-r src{i} dst{i}");
                parse(&raw, &schema).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        assert_eq!(result.args["source"], json!(format!("src{i}")));
        assert_eq!(result.args["dest"], json!(format!("dst{i}")));
    }
}

#[test]
fn test_schema_from_json_parses() {
    let schema: Schema = serde_json::from_str(
        r#"{
            "args": [{"name": "count", "required": true, "kind": "integer"}],
            "options": [
                {"name": "ratio", "short": "r", "args": [{"name": "ratio", "kind": "number"}]},
                {"name": "format", "args": [{"name": "format", "kind": {"choice": ["json", "yaml"]}}]}
            ]
        }"#,
    )
    .unwrap();
    assert!(validate_schema(&schema).is_empty());

    let result = parse("-r 1.5 --format yaml 12", &schema).unwrap();
    assert_eq!(result.args["count"], json!(12));
    assert_eq!(result.options["ratio"], OptionValue::Value(json!(1.5)));
    assert_eq!(result.options["format"], OptionValue::Value(json!("yaml")));
}
