use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn argline(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argline"))
        .args(args)
        .output()
        .expect("failed to run argline")
}

/// Schema with a positional, a flag, and a value-taking option.
fn write_schema(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let contents = if name.ends_with(".yaml") {
        r#"args:
  - name: file
    required: true
options:
  - name: verbose
    short: v
  - name: count
    short: c
    kind: integer
    args:
      - name: count
"#
        .to_string()
    } else {
        serde_json::json!({
            "args": [{"name": "file", "required": true}],
            "options": [
                {"name": "verbose", "short": "v"},
                {"name": "count", "short": "c", "kind": "integer", "args": [{"name": "count"}]}
            ]
        })
        .to_string()
    };
    fs::write(&path, contents).expect("failed to write schema");
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "argline failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn parse_prints_json_result() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json");

    let output = argline(&[
        "parse",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "-v -c 3 'notes.txt' -- tail",
    ]);

    assert_eq!(
        stdout_json(&output),
        serde_json::json!({
            "args": {"file": "notes.txt"},
            "options": {"verbose": true, "count": 3},
            "rest": "tail",
            "raw": "-v -c 3 'notes.txt' -- tail",
        })
    );
}

#[test]
fn parse_reads_yaml_schema_and_stdin() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.yaml");

    let mut child = Command::new(env!("CARGO_BIN_EXE_argline"))
        .args(["parse", "--schema", schema.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn argline");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"--verbose \"my file\"\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let value = stdout_json(&output);
    assert_eq!(value["args"]["file"], "my file");
    assert_eq!(value["options"]["verbose"], true);
    assert_eq!(value["raw"], "--verbose \"my file\"");
}

#[test]
fn parse_failure_exits_nonzero_with_message() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json");

    let output = argline(&["parse", "--schema", schema.to_str().unwrap(), "--", "--bogus x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown flag `--bogus`"), "stderr: {stderr}");
}

#[test]
fn parse_reports_missing_required_argument() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json");

    let output = argline(&["parse", "--schema", schema.to_str().unwrap(), "--", "-v"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing required argument `file`"),
        "stderr: {stderr}"
    );
}

#[test]
fn parse_rejects_invalid_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"options": [{"name": "a", "short": "x"}, {"name": "b", "short": "x"}]}"#,
    )
    .unwrap();

    let output = argline(&["parse", "--schema", path.to_str().unwrap(), "x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate short flag: -x"), "stderr: {stderr}");
}

#[test]
fn tokenize_prints_tokens() {
    let output = argline(&["tokenize", "--", "-ab --name 'x y'"]);

    let value = stdout_json(&output);
    assert_eq!(
        value,
        serde_json::json!([
            {"kind": "flags", "value": "ab", "span": {"start": 0, "end": 3}},
            {"kind": "flag", "value": "name", "span": {"start": 4, "end": 10}},
            {"kind": "arg", "value": "x y", "span": {"start": 11, "end": 16}},
        ])
    );
}

#[test]
fn tokenize_yaml_output() {
    let output = argline(&["tokenize", "--format", "yaml", "hello"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kind: arg"), "stdout: {stdout}");
    assert!(stdout.contains("value: hello"), "stdout: {stdout}");
}

#[test]
fn validate_accepts_good_and_flags_bad_files() {
    let dir = TempDir::new().unwrap();
    let good = write_schema(&dir, "good.json");
    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "options:\n  - name: 2fa\n").unwrap();

    let output = argline(&["validate", good.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Validated 1 schema file(s)."));

    let output = argline(&["validate", good.to_str().unwrap(), bad.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("option name cannot be written as a long flag: 2fa"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("1 of 2 schema file(s) failed validation"));
}
