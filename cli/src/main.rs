use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_signature_core::{
    Handlers, Param, Registry, SignatureMap, Values, handler_ids, load_document,
    validate_signatures,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI output format with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "command-signature", version = PACKAGE_VERSION)]
#[command(about = "Check signature files and dispatch command-line tokens against them")]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lint and compile a signature file, printing the flattened params.
    Check(CheckArgs),
    /// Populate params from tokens and print the value map without dispatching.
    Parse(TokenArgs),
    /// Populate params from tokens and dispatch the matched handler.
    Run(TokenArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Signature file (.json, .yaml or .yml).
    file: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct TokenArgs {
    /// Signature file (.json, .yaml or .yml).
    file: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Raw command-line tokens, given after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

/// Result of `parse`: the projected values and the param `run` would pick.
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    matched: Option<&'a str>,
    values: Values,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Parse(args) => run_parse(args),
        Command::Run(args) => run_run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let (signatures, _) = load_signatures(&args.file)?;

    let problems = validate_signatures(&signatures);
    for problem in &problems {
        eprintln!("{}: {problem}", args.file.display());
    }

    let registry = Registry::compile(&signatures);
    println!("{}", format_params(registry.params(), args.format)?);

    if !problems.is_empty() {
        return Err(format!(
            "{} problem(s) found in '{}'",
            problems.len(),
            args.file.display()
        ));
    }
    Ok(())
}

fn run_parse(args: TokenArgs) -> Result<(), String> {
    let (signatures, _) = load_signatures(&args.file)?;
    let mut registry = Registry::compile(&signatures);
    registry.set_all(&args.tokens).map_err(|e| e.to_string())?;

    let report = ParseReport {
        matched: registry.matched().map(Param::name),
        values: registry.to_values(),
    };
    let raw = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        OutputFormat::Yaml => serde_yaml::to_string(&report)
            .map_err(|e| format!("YAML serialization failed: {e}"))?,
        OutputFormat::Table => report_to_table(&report),
    };
    println!("{}", raw.trim_end());
    Ok(())
}

fn run_run(args: TokenArgs) -> Result<(), String> {
    let (signatures, handler_count) = load_signatures(&args.file)?;
    debug!(handlers = handler_count, "bound echo handlers");

    let mut registry = Registry::compile(&signatures);
    let Some(result) = registry.exec(&args.tokens).map_err(|e| e.to_string())? else {
        return Ok(());
    };

    let raw = match args.format {
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(&result)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        OutputFormat::Yaml => serde_yaml::to_string(&result)
            .map_err(|e| format!("YAML serialization failed: {e}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}

/// Loads a signature file, binding every `fn` id it names to an echo handler
/// that reports the id and the values it was called with.
fn load_signatures(path: &Path) -> Result<(SignatureMap, usize), String> {
    let document = load_document(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;

    let mut handlers = Handlers::new();
    for id in handler_ids(&document) {
        let reported = id.clone();
        handlers.insert(id, move |values| json!({ "handler": reported, "values": values }));
    }

    let signatures = SignatureMap::from_json(&document, &handlers)
        .map_err(|err| format!("Invalid signature file '{}': {err}", path.display()))?;
    Ok((signatures, handlers.len()))
}

fn format_params(params: &[Param], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(params)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(params).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(params_to_table(params)),
    }
}

fn params_to_table(params: &[Param]) -> String {
    let rows: Vec<[String; 5]> = params
        .iter()
        .map(|param| {
            [
                param.name().to_string(),
                param
                    .param_type()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                param
                    .default_value()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string()),
                param.alias().unwrap_or("-").to_string(),
                match (param.handler().is_some(), param.is_main()) {
                    (true, true) => "fn,main".to_string(),
                    (true, false) => "fn".to_string(),
                    (false, true) => "main".to_string(),
                    (false, false) => "-".to_string(),
                },
            ]
        })
        .collect();

    let headers = ["NAME", "TYPE", "DEFAULT", "ALIAS", "FLAGS"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&format!("{} param(s)", rows.len()));
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn report_to_table(report: &ParseReport<'_>) -> String {
    let mut out = format!("matched: {}\n", report.matched.unwrap_or("-"));
    for (key, value) in report.values.iter() {
        out.push_str(&format!("{key} = {value}\n"));
    }
    out
}
