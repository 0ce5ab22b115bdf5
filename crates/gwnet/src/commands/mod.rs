//! Command dispatch: bridges CLI args -> codec calls -> output formatting.

pub mod config_cmd;
pub mod connection;
pub mod util;
pub mod vlan;
pub mod wireguard;

use std::path::PathBuf;

use clap::ValueEnum;
use gwnet_config::{Config, ConfigError};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config: Config,
    pub config_path: PathBuf,
}

impl Context {
    /// Load the config file (`--config` or the platform path) and resolve
    /// the output format against it.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config_path = global.config.clone().unwrap_or_else(gwnet_config::config_path);
        let config = gwnet_config::load_config_from(&config_path)
            .map_err(|source| config_error(&config_path, source))?;

        let format = match global.output {
            Some(format) => format,
            None => OutputFormat::from_str(&config.defaults.output, true).map_err(|reason| {
                config_error(
                    &config_path,
                    ConfigError::Validation {
                        field: "defaults.output".into(),
                        reason,
                    },
                )
            })?,
        };

        Ok(Self {
            format,
            quiet: global.quiet,
            config,
            config_path,
        })
    }
}

pub fn config_error(path: &std::path::Path, source: ConfigError) -> CliError {
    CliError::Config {
        path: path.display().to_string(),
        source,
    }
}

/// Dispatch a command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Connection(args) => connection::handle(args, ctx),
        Command::Vlan(args) => vlan::handle(args, ctx),
        Command::Wireguard(args) => wireguard::handle(args, ctx),
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Completions are generated before a context exists
        Command::Completions(_) => Ok(()),
    }
}
