// Declare modules
pub mod cli;
pub mod config;
pub mod exclusions;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::exclusions::update_exclusions;
use self::formatter::OutputGenerator;
use self::models::OutputMode;
use self::scanner::Scanner;
use self::settings::SettingsStore;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let config = resolve_config(args, current_dir)?;

    if config.selected.is_empty() {
        log::warn!("No projects selected; all exclusions will be cleared.");
    }

    // 3. Compute Exclusions
    let mapping = update_exclusions(&config.selected, &config.unselected);

    // 4. Persist or Report
    match config.mode {
        OutputMode::Write => {
            let store = SettingsStore::new(&config.workspace_root);
            let previous = store.current_exclusions()?;
            log::info!(
                "Replacing {} previous exclusion pattern(s) in {}",
                previous.len(),
                store.path().display()
            );

            if config.reset {
                store.reset_exclusions()?;
            } else {
                store.persist(&mapping)?;
            }
            println!("{}", OutputGenerator::format_summary(&mapping, store.path()));
        }
        OutputMode::DryRun => {
            println!("{}", OutputGenerator::generate_mapping(&mapping)?);
        }
        OutputMode::Preview => {
            let scanner = Scanner::new(config.workspace_root.clone(), &mapping)?;
            let entries = scanner.scan();

            if entries.is_empty() {
                log::warn!("Nothing in the workspace would be hidden.");
                return Ok(());
            }
            println!("{}", OutputGenerator::generate_tree(&entries));
        }
    }

    Ok(())
}
