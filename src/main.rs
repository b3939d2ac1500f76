mod app;
mod cli;
mod clock;
mod config;
mod db;
mod error;
mod event;
mod i18n;
mod models;
mod report;
mod snapshot;
mod ui;
mod validation;

use std::fs::OpenOptions;

use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

use app::App;
use cli::Cli;
use clock::SystemClock;
use db::Database;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let db = match &cli.db {
        Some(path) => Database::open_path(path)?,
        None => Database::open()?,
    };

    match cli.command {
        Some(command) => cli::run(command, &db, &SystemClock),
        None => {
            info!("Starting terminal interface");
            let app = App::new(db, SystemClock)?;
            let terminal = ratatui::init();
            let result = app.run(terminal);
            ratatui::restore();
            result
        }
    }
}

/// Log to a file in the data directory; the terminal belongs to the TUI
fn init_logging(verbose: bool) -> color_eyre::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config::get_log_path()?)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
