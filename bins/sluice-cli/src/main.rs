//! sluice-cli — validate transactions against a UTXO snapshot.
//!
//! Reads a transaction and a snapshot of unspent outputs from JSON files,
//! runs the validator with Ed25519 signature verification, and reports the
//! result. Also prints the canonical signable payload for external signers.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sluice_core::crypto::Ed25519Verifier;
use sluice_core::payload::{payload_digest, signable_payload};
use sluice_core::{MemoryUtxoPool, Transaction, TransactionValidator, ValidationResult};
use tracing::{error, info};

/// Exit status for a transaction that failed validation.
const EXIT_INVALID: i32 = 1;
/// Exit status for unreadable input or a failed collaborator.
const EXIT_FAILURE: i32 = 2;

/// Sluice transaction validator.
#[derive(Parser)]
#[command(name = "sluice-cli")]
#[command(version, about = "Validate UTXO transactions against a snapshot")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Log output format ("text" or "json").
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a transaction against a UTXO snapshot.
    Validate(ValidateArgs),
    /// Print the canonical signable payload of a transaction.
    Payload(PayloadArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Transaction JSON file.
    #[arg(long)]
    tx: PathBuf,

    /// UTXO snapshot JSON file (array of UTXO records).
    #[arg(long)]
    utxos: PathBuf,

    /// Print the full result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PayloadArgs {
    /// Transaction JSON file.
    #[arg(long)]
    tx: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let outcome = match cli.command {
        Commands::Validate(args) => validate(args),
        Commands::Payload(args) => payload(args).map(|()| 0),
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Validate and print the result. Returns the process exit status.
fn validate(args: ValidateArgs) -> Result<i32> {
    let result = run_validate(&args.tx, &args.utxos)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(if result.valid { 0 } else { EXIT_INVALID })
}

fn run_validate(tx_path: &Path, utxos_path: &Path) -> Result<ValidationResult> {
    let tx = load_transaction(tx_path)?;
    let pool = MemoryUtxoPool::load(utxos_path)
        .with_context(|| format!("Failed to load UTXO snapshot: {}", utxos_path.display()))?;
    info!(txid = %tx.id, utxos = pool.len(), "validating transaction");

    let validator = TransactionValidator::new(pool, Ed25519Verifier);
    validator
        .validate(&tx)
        .context("Validation aborted by collaborator failure")
}

fn payload(args: PayloadArgs) -> Result<()> {
    let tx = load_transaction(&args.tx)?;
    print!("{}", render_payload(&tx));
    Ok(())
}

/// Hex-encoded payload and digest lines, as printed by `payload`.
fn render_payload(tx: &Transaction) -> String {
    format!(
        "payload: {}\ndigest:  {}\n",
        hex::encode(signable_payload(tx)),
        hex::encode(payload_digest(tx))
    )
}

fn load_transaction(path: &Path) -> Result<Transaction> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transaction: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse transaction: {}", path.display()))
}

fn print_result(result: &ValidationResult) {
    if result.valid {
        println!("VALID");
        return;
    }
    println!("INVALID ({} error(s))", result.errors.len());
    for err in &result.errors {
        println!("  {}: {}", err.kind(), err);
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Logs go to stderr so results on stdout
/// stay machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
