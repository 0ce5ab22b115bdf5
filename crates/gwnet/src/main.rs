mod cli;
mod commands;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `-v` flags win over the configured level; `RUST_LOG` wins over both.
fn init_tracing(verbosity: u8, configured: &str) {
    let filter = match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Shell completions need no configuration
    if let Command::Completions(args) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "gwnet", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::load(&cli.global);
    let level = ctx
        .as_ref()
        .map_or("warn", |ctx| ctx.config.defaults.log_level.as_str());
    init_tracing(cli.global.verbose, level);
    let ctx = ctx?;

    tracing::debug!(command = ?cli.command, config = %ctx.config_path.display(), "dispatching command");
    commands::dispatch(cli.command, &ctx)
}
