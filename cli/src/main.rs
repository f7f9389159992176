use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod schema_file;

use schema_file::{load_and_validate_schema, load_schema};

/// Output encodings for results and token streams.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argline")]
#[command(about = "Parse shell-like argument strings against a schema", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an argument string against a schema file.
    Parse(ParseArgs),
    /// Print the token stream for an argument string.
    Tokenize(TokenizeArgs),
    /// Validate one or more schema files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Argument string to parse. Read from stdin when omitted.
    #[arg(allow_hyphen_values = true)]
    input: Option<String>,
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Argument string to tokenize. Read from stdin when omitted.
    #[arg(allow_hyphen_values = true)]
    input: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Tokenize(args) => run_tokenize(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("argline_core={level},argline={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let schema = load_and_validate_schema(&args.schema)?;
    let raw = read_input(args.input)?;
    debug!(raw = %raw, "parsing input");

    let result = argline_core::parse(&raw, &schema).map_err(|err| err.to_string())?;
    println!("{}", render(&result, args.format)?);
    Ok(())
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let raw = read_input(args.input)?;
    let tokens = argline_core::tokenize(&raw);
    println!("{}", render(&tokens, args.format)?);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failed_files = 0;
    for path in &args.inputs {
        let failures = match load_schema(path) {
            Ok(schema) => argline_core::validate_schema(&schema)
                .into_iter()
                .map(|err| format!("{}: {err}", path.display()))
                .collect(),
            Err(err) => vec![err],
        };
        if !failures.is_empty() {
            failed_files += 1;
        }
        for failure in &failures {
            eprintln!("  {failure}");
        }
    }

    if failed_files > 0 {
        return Err(format!(
            "{failed_files} of {} schema file(s) failed validation",
            args.inputs.len()
        ));
    }

    println!("Validated {} schema file(s).", args.inputs.len());
    Ok(())
}

/// Uses the positional input when given, otherwise all of stdin minus one
/// trailing line break.
fn read_input(input: Option<String>) -> Result<String, String> {
    if let Some(input) = input {
        return Ok(input);
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    let trimmed = buf
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(&buf);
    Ok(trimmed.to_string())
}

fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
