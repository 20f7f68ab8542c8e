//! `timetable` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open local storage.
//! - Run one command and print its notification.

mod commands;
mod config;

use anyhow::{Context, Result};
use config::{Config, DATA_DIR_ENV};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use timetable_core::db::open_db;
use timetable_core::{default_log_level, init_logging, SqliteBackend, TimetableStore};

fn main() -> ExitCode {
    match run() {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String> {
    let matches = commands::command().get_matches();
    let config = Config::resolve(
        matches.get_one::<PathBuf>("data-dir").map(PathBuf::as_path),
        std::env::var(DATA_DIR_ENV).ok(),
        matches
            .get_one::<String>("log-level")
            .map_or(default_log_level(), String::as_str),
    )?;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    // Logging is best-effort; the command still runs without it.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir().to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(config.db_path()).context("Failed to open timetable storage")?;
    let backend = SqliteBackend::try_new(&conn).context("Failed to bind timetable storage")?;
    let mut store = TimetableStore::open(backend);

    let message = commands::dispatch(&mut store, &matches)?;
    if let Some((name, _)) = matches.subcommand() {
        info!("event=cli_command module=cli status=ok command={name}");
    }
    Ok(message)
}
