//! formdoc command-line tool

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use formdoc::cli::{self, CliArgs, Command};
use formdoc::model::{DocumentData, SetValueOption};
use formdoc::EngineConfig;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}

fn main() -> Result<()> {
    formdoc::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    tracing::debug!(command = ?args.command, mode = ?config.mode, "starting");

    match args.command {
        Command::Expand { input } => {
            let document: DocumentData = read_json(&input)?;
            print_json(&cli::expand_document(document, &config), args.pretty)
        }
        Command::Zip { input } => {
            let document: DocumentData = read_json(&input)?;
            print_json(&cli::zip_document(document, &config), args.pretty)
        }
        Command::Values { input, target } => {
            let document: DocumentData = read_json(&input)?;
            let values = cli::control_values(document, config, target.into_option());
            print_json(&values, args.pretty)
        }
        Command::SetValues { input, values } => {
            let document: DocumentData = read_json(&input)?;
            let options: Vec<SetValueOption> = read_json(&values)?;
            let report = cli::set_values(document, config, options);
            if !report.changed {
                tracing::info!("no control value changed");
            }
            print_json(&report, args.pretty)
        }
    }
}
