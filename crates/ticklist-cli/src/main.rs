mod cli;
mod config;
mod console;
mod dates;
mod storage;
mod todos;
mod tui;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use console::{ConsoleNotifier, StdinConfirmer};
use ticklist_core::{notify::RecordingNotifier, storage::KeyValueStore};
use ticklist_manager::TodoListManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point wiring the CLI to the todo manager and TUI.
fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(cli::Command::Tui) {
        cli::Command::Tui => {
            let notices = RecordingNotifier::new();
            let manager = TodoListManager::load(
                storage::store_from_config(&config)?,
                Box::new(notices.clone()),
                config.settings(),
            )?;
            tui::launch(manager, notices)?
        }
        cli::Command::Version => print_version(),
        cli::Command::Health => run_health_check(&config)?,
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
        cmd => {
            let mut manager = TodoListManager::load(
                storage::store_from_config(&config)?,
                Box::new(ConsoleNotifier),
                config.settings(),
            )?;
            let mut confirm = StdinConfirmer::new(cli.assume_yes || config.assume_yes);
            todos::handle(cmd, &mut manager, &mut confirm)?
        }
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters; default to warn so command output stays clean.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("ticklist {}", env!("CARGO_PKG_VERSION"));
}

/// Runs a quick write/read/delete round-trip against the data directory.
fn run_health_check(config: &config::Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    run_store_health(&store)?;
    println!("Storage: ok ({})", store.root().display());
    let path = config::default_path()?;
    let status = if path.exists() { "found" } else { "defaults" };
    println!("Config: {status} ({})", path.display());
    Ok(())
}

fn run_store_health<S: KeyValueStore>(store: &S) -> Result<()> {
    let probe_key = "health-probe";
    let payload = "ok";
    store.put(probe_key, payload)?;
    let round_trip = store.get(probe_key)?;
    store.delete(probe_key)?;

    if round_trip != payload {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
