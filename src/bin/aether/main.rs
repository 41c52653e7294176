//! aether - terminal instrument built on the aether_dsp engine
//!
//! Run with: cargo run --bin aether

mod app;
mod ui;

use std::fs::File;
use std::sync::Mutex;

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::Aether;

const LOG_FILE: &str = "aether.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    Aether::new().bpm(120.0).run()
}

/// The TUI owns the terminal, so logs go to a file.
fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}
