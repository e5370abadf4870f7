//! ultrapad - window-count-aware padding and split automation for yabai.
//!
//! Invoked from yabai signals or a hotkey daemon as a short-lived
//! process: load the config, query yabai, decide, apply, exit. The
//! decision logic lives in `engine`; everything here is CLI glue.

mod config;
mod displays;
mod engine;
mod error;
mod filter;
mod notify;
mod toggle;
mod trace;
mod yabai;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::ConfigStore;
use engine::Engine;
use toggle::ToggleController;
use trace::PassLog;
use yabai::Yabai;

/// Adjust yabai padding and split orientation from per-display rules.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run a resize pass over the current space
    #[arg(short, long)]
    resize: bool,

    /// Toggle global management, notify, then resize
    #[arg(long = "toggle_manage")]
    toggle_manage: bool,

    /// Toggle the current space's management, notify, then resize
    #[arg(long = "toggle_manage_space")]
    toggle_manage_space: bool,

    /// Config file path (default: ~/.config/ultrapad/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut store = match cli.config.clone() {
        Some(path) => ConfigStore::load_from_path(path),
        None => ConfigStore::load(),
    }
    .context("failed to load configuration")?;
    let trace = PassLog::new(store.log_path().context("failed to resolve trace log path")?);
    let wm = Yabai::new();

    let result = run(&cli, &mut store, &wm, &trace);
    if let Err(e) = &result {
        // Fatal errors leave a trail in the pass trace too, not just stderr.
        trace.append(&format!("Fatal: {:#}", e));
    }
    result
}

fn run(cli: &Cli, store: &mut ConfigStore, wm: &Yabai, trace: &PassLog) -> Result<()> {
    if cli.toggle_manage || cli.toggle_manage_space {
        let mut toggles = ToggleController::new(store, wm);
        if cli.toggle_manage {
            toggles.toggle_global().context("failed to toggle global management")?;
        }
        if cli.toggle_manage_space {
            toggles.toggle_space().context("failed to toggle space management")?;
        }
        run_pass(store, wm, trace)?;
    }

    if cli.resize {
        run_pass(store, wm, trace)?;
    }

    Ok(())
}

fn run_pass(store: &ConfigStore, wm: &Yabai, trace: &PassLog) -> Result<()> {
    let outcome = Engine::new(store, wm, trace)
        .run()
        .context("resize pass failed")?;
    log::debug!("Resize pass finished: {:?}", outcome);
    Ok(())
}
