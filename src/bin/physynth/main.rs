//! physynth - drag sound sources around a terminal field
//!
//! Run with: cargo run -- [config.toml]

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use physynth::SynthConfig;

const LOG_FILE: &str = "physynth.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => SynthConfig::load(&path)
            .wrap_err_with(|| format!("failed to load config from {path}"))?,
        None => SynthConfig::default(),
    };
    tracing::info!(?config, "starting");

    app::App::new(config)?.run()
}

// The terminal belongs to the TUI, so logs go to a file.
fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
