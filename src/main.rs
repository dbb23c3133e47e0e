//! table-review - Main Entry Point
//!
//! Loads a JSON table (`[["pkg","from","to"], ...]`), runs the interactive
//! review with semantic version validation, and prints the kept changes as
//! JSON once the user confirms them.

use std::env;
use std::fs;
use std::io;
use std::process;

use inquire::{Confirm, InquireError};
use table_review::cli::config::EditorConfig;
use table_review::{edit_table, logging, EditResult, SemverValidator, SessionOutcome, Table};
use tracing::info;

/// Environment variable naming an optional JSON configuration file
const CONFIG_ENV: &str = "TABLE_REVIEW_CONFIG";

#[tokio::main]
async fn main() {
    logging::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: table-review <table.json>");
        process::exit(1);
    };

    let table = match load_table(&path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    match run_review(table, config).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("\nERROR: table review failed: {}", e);
            eprintln!("Please check your terminal compatibility and try again.");
            process::exit(1);
        }
    }
}

fn load_table(path: &str) -> Result<Table, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {}", path, e))?;
    Table::from_json(&content).map_err(|e| format!("Cannot load '{}': {}", path, e))
}

fn load_config() -> Result<EditorConfig, String> {
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => EditorConfig::from_file(&path)
            .map_err(|e| format!("Cannot load configuration '{}': {}", path, e)),
        _ => Ok(EditorConfig::default()),
    }
}

async fn run_review(table: Table, config: EditorConfig) -> io::Result<()> {
    let validator = SemverValidator::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    match edit_table(table, config, Some(Box::new(validator))).await? {
        SessionOutcome::Completed(result) => emit_result(&result),
        SessionOutcome::Aborted => {
            info!("review aborted by user");
            Ok(())
        }
    }
}

/// Show the kept changes and print them as JSON once confirmed
fn emit_result(result: &EditResult) -> io::Result<()> {
    if result.is_empty() {
        println!("No changes kept.");
        return Ok(());
    }

    for line in result.summary_lines() {
        println!("{}", line);
    }

    let confirmed = match Confirm::new("Emit these changes?").with_default(true).prompt() {
        Ok(answer) => answer,
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => false,
        Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e)),
    };

    if confirmed {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        println!("{}", json);
    }

    Ok(())
}
