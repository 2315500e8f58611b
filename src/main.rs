mod audio;
mod cli;
mod config;
mod controller;
mod db;
mod location;
mod models;
mod monitor;
mod prayer_times;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::error;
use std::fs::OpenOptions;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use audio::{AdhaanPlayer, SilentPlayer};
use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use controller::Controller;
use location::HttpGeocoder;

const WATCH_RESTART_DELAY: Duration = Duration::from_secs(5);

/// One-shot commands stay quiet unless something goes wrong; the long-running
/// modes log their activity. The TUI owns the terminal, so it logs to a file.
fn init_logging(command: Option<&Commands>) -> Result<()> {
    let default_level = match command {
        None | Some(Commands::Watch) => "info",
        Some(_) => "warn",
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));

    if command.is_none() {
        let log_path = AppConfig::log_path()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Opening log file {:?}", log_path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    AppConfig::ensure_data_dir()?;
    init_logging(cli.command.as_ref())?;

    let config_path = AppConfig::config_path()?;
    let config = AppConfig::load_from(&config_path).context("Loading config")?;

    let player: Arc<dyn AdhaanPlayer> = match &cli.command {
        None => audio::open_default(),
        Some(cmd) if cmd.needs_audio() => audio::open_default(),
        Some(_) => Arc::new(SilentPlayer::new("not needed for this command")),
    };
    let geocoder = Box::new(HttpGeocoder::new()?);
    let mut controller = Controller::new(config, Some(config_path), player, geocoder)?;

    match cli.command {
        Some(Commands::Times) => handlers::handle_times(&mut controller)?,
        Some(Commands::Watch) => loop {
            if let Err(e) = handlers::handle_watch(&mut controller) {
                error!("Error in watch loop: {:#}. Restarting in 5 seconds...", e);
                thread::sleep(WATCH_RESTART_DELAY);
            }
        },
        Some(Commands::Locate {
            auto,
            lat,
            lng,
            zip,
            region,
            save,
        }) => handlers::handle_locate(&mut controller, auto, lat, lng, zip, region, save)?,
        Some(Commands::Method { name }) => {
            handlers::handle_method(&mut controller, name.as_deref())?
        }
        Some(Commands::Toggle { prayer }) => handlers::handle_toggle(&mut controller, &prayer)?,
        Some(Commands::Voices { action }) => handlers::handle_voices(&mut controller, &action)?,
        Some(Commands::Test) => handlers::handle_test(&mut controller)?,
        Some(Commands::Interval { minutes }) => {
            handlers::handle_interval(&mut controller, minutes)?
        }

        // No subcommand → launch TUI
        None => tui::app::run(controller)?,
    }

    Ok(())
}
