use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod commands;
mod domain;
mod services;

pub use cli::*;
pub use domain::models::*;
pub use services::exec::{CommandRunner, SystemRunner};
pub use services::output::*;

use commands::{handle_admin_commands, handle_runtime_commands};
use services::storage::load_config;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cmsfed=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let cfg = load_config(cli.config.as_deref())?;
    let runner = SystemRunner;

    if handle_runtime_commands(&cli, &cfg, &runner)? {
        return Ok(());
    }
    if handle_admin_commands(&cli, &runner)? {
        return Ok(());
    }

    Ok(())
}
