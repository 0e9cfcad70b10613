//! Tabula CLI Application
//!
//! Command-line interface for tabulating SQLite tables and reporting test
//! runs.

mod args;
mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use tabula_core::{ColorChoice, Console, DatabaseBuilder};
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        force_color,
        command,
    } = Args::parse();

    let color = ColorChoice::from_flags(no_color, force_color)?;

    match command {
        Query(args) => open(database_file, color)?.handle_query(args),
        Count(args) => open(database_file, color)?.handle_count(args),
        Aggregate(args) => open(database_file, color)?.handle_aggregate(args),
        Test(args) => {
            info!("Reporting test run");
            if !cli::report_tests(args, color)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn open(database_file: Option<PathBuf>, color: ColorChoice) -> Result<Cli> {
    let db = DatabaseBuilder::new()
        .with_database_path(database_file)
        .build()
        .context("Failed to open database")?;

    info!("Tabula started");

    Ok(Cli::new(db, Console::stdout(color)))
}
