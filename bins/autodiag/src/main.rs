//! autodiag - Vehicle symptom diagnosis
//!
//! Ranks the diagnostic database against a free-text description of what the
//! vehicle is doing.

use autodiag_cli::output::Status;
use autodiag_cli::render::render;
use autodiag_core::config::{open_database, Config};
use autodiag_core::error::{exit_codes, Error};
use autodiag_search::{diagnose, DiagnosisOutcome, RecordStore, SearchError};
use autodiag_telemetry::{metrics, names, Event, TelemetryConfig, Timer};
use clap::{CommandFactory, Parser};
use std::io;
use std::path::{Path, PathBuf};

mod interactive;

const EXAMPLES: &str = "\
💡 Examples:
  autodiag \"voyant moteur allumé\"
  autodiag \"freins qui grincent\" --top 5
  autodiag --interactive";

/// Rank vehicle diagnostics against a symptom description
#[derive(Parser)]
#[command(name = "autodiag")]
#[command(about = "Rank vehicle diagnostics against a symptom description")]
#[command(version)]
struct Cli {
    /// Description of the problem
    query: Option<String>,

    /// Prompt for descriptions until 'quit'
    #[arg(short, long)]
    interactive: bool,

    /// Path to the JSON diagnostic database
    #[arg(short, long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Number of matches to show
    #[arg(short, long, value_name = "N")]
    top: Option<usize>,

    /// Append the raw outcome as JSON
    #[arg(long)]
    debug: bool,

    /// Print only the outcome as JSON
    #[arg(long, conflicts_with = "debug")]
    json: bool,

    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    if cli.query.is_none() && !cli.interactive {
        return print_usage();
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    let logging = &config.schema.logging;
    let telemetry = TelemetryConfig {
        log_level: if cli.verbose { "debug".to_string() } else { logging.level.clone() },
        show_target: logging.show_target,
        json: logging.json,
    };
    if let Err(e) = autodiag_telemetry::init_with_config(telemetry) {
        Status::warning(&format!("Logging disabled: {e}"));
    }

    let opened = open_database(
        Path::new("."),
        cli.database.as_deref(),
        &config.schema.database,
    );
    let (path, store) = match opened {
        Ok(opened) => opened,
        Err(e) => return fail(&e),
    };
    if store.is_empty() {
        let err = Error::from(SearchError::EmptyStore)
            .with_context(format!("While loading {}", path.display()));
        return fail(&err);
    }
    metrics().gauge(names::RECORDS_LOADED, store.len() as u64);

    let top_n = cli.top.unwrap_or(config.schema.general.top_n);
    let code = if cli.interactive {
        let stdin = io::stdin();
        match interactive::run(&store, top_n, stdin.lock(), io::stdout()) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                Status::error(&format!("{e:#}"));
                exit_codes::FAILURE
            }
        }
    } else if let Some(query) = &cli.query {
        run_query(cli, &store, query, top_n)
    } else {
        exit_codes::SUCCESS
    };

    tracing::debug!(metrics = %metrics().export_json(), "Session summary");
    code
}

fn run_query(cli: &Cli, store: &RecordStore, query: &str, top_n: usize) -> i32 {
    let outcome = match run_diagnosis(query, store, top_n) {
        Ok(outcome) => outcome,
        Err(e) => return fail(&Error::from(e)),
    };

    let json = match serde_json::to_string_pretty(&outcome) {
        Ok(json) => json,
        Err(e) => {
            Status::error(&format!("Failed to serialize outcome: {e}"));
            return exit_codes::FAILURE;
        }
    };

    if cli.json {
        println!("{json}");
    } else {
        println!("{}", render(&outcome));
        if cli.debug {
            println!("\n🔧 DEBUG - Technical details:");
            println!("{json}");
        }
    }

    exit_codes::SUCCESS
}

/// Diagnose one query and record it in the session metrics.
pub(crate) fn run_diagnosis(
    query: &str,
    store: &RecordStore,
    top_n: usize,
) -> autodiag_search::Result<DiagnosisOutcome> {
    let timer = Timer::start(names::DIAGNOSE_MS);
    let outcome = diagnose(query, store, top_n)?;
    timer.stop();

    let registry = metrics();
    registry.increment(names::DIAGNOSES);
    if outcome.is_empty() {
        registry.increment(names::NO_MATCH);
    }
    if outcome.clarification.is_some() {
        registry.increment(names::AMBIGUOUS);
    }

    Event::new(
        "diagnosis",
        serde_json::json!({
            "total_matches": outcome.total_matches,
            "confidence": outcome.confidence,
            "best": outcome.best().map(|m| m.id.as_str()),
            "ambiguous": outcome.clarification.is_some(),
        }),
    )
    .log();

    Ok(outcome)
}

fn print_usage() -> i32 {
    if let Err(e) = Cli::command().print_help() {
        Status::error(&format!("Failed to print help: {e}"));
        return exit_codes::FAILURE;
    }
    println!("\n{EXAMPLES}");
    exit_codes::SUCCESS
}

fn fail(err: &Error) -> i32 {
    tracing::debug!(report = ?err.to_report(), "Command failed");
    Status::report(err);
    err.exit_code()
}
