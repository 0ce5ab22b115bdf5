//! Config subcommand handlers.

use gwnet_config::{Config, save_config_to};

use super::util::yes_no;
use super::{Context, config_error};
use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::CliError;
use crate::output;

fn config_table(cfg: &Config) -> String {
    output::detail_block(&[
        ("defaults.output", cfg.defaults.output.clone()),
        ("defaults.log_level", cfg.defaults.log_level.clone()),
        ("nmcli.binary", cfg.nmcli.binary.clone()),
        ("nmcli.show_secrets", yes_no(cfg.nmcli.show_secrets)),
    ])
}

pub fn handle(args: ConfigArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&ctx.config_path.display().to_string(), ctx.quiet)?;
        }

        ConfigCommand::Show => {
            let out = output::render_single(ctx.format, &ctx.config, config_table, |_| {
                ctx.config_path.display().to_string()
            })?;
            output::print_output(&out, ctx.quiet)?;
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = ctx.config.clone();
            cfg.set(&key, &value)
                .and_then(|()| save_config_to(&cfg, &ctx.config_path))
                .map_err(|source| config_error(&ctx.config_path, source))?;
            tracing::info!(%key, %value, path = %ctx.config_path.display(), "config updated");
            if !ctx.quiet {
                eprintln!("Set {key} = {value} in {}", ctx.config_path.display());
            }
        }
    }
    Ok(())
}
