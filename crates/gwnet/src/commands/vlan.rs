//! VLAN subcommand handlers.

use gwnet_core::{NetworkManagerEntity, VlanConfiguration, VlanFlags};

use super::Context;
use super::util::{self, yes_no};
use crate::cli::{VlanArgs, VlanCommand};
use crate::error::CliError;
use crate::output;

const NMCLI_HINT: &str = "Pass `vlan.parent`, `vlan.id` and `vlan.flags` rows from `nmcli -t connection show`.";
const JSON_HINT: &str = "Expected {\"parentInterface\", \"id\", \"flags\"} with an id of at most 4094.";

fn flag_names(flags: VlanFlags) -> String {
    flags.names().join(",")
}

fn flags_table(flags: &VlanFlags) -> String {
    output::detail_block(&[
        ("Bits", u32::from(*flags).to_string()),
        ("Reorder headers", yes_no(flags.reorder_headers)),
        ("GVRP", yes_no(flags.gvrp)),
        ("Loose binding", yes_no(flags.loose_binding)),
        ("MVRP", yes_no(flags.mvrp)),
    ])
}

fn vlan_table(vlan: &VlanConfiguration) -> String {
    output::detail_block(&[
        ("Parent", vlan.parent_interface.clone()),
        ("ID", vlan.id.to_string()),
        ("Flags", format!("{} ({})", vlan.flags.bits(), flag_names(vlan.flags))),
    ])
}

/// Accept `5` as well as nmcli's `5 (REORDER_HEADERS, LOOSE_BINDING)`.
fn parse_flags(value: &str) -> Result<VlanFlags, CliError> {
    let token = value.split_whitespace().next().unwrap_or_default();
    let bits: u32 = token.parse().map_err(|_| CliError::Validation {
        field: "flags".into(),
        reason: format!("'{value}' is not a flags bitmask"),
    })?;
    Ok(VlanFlags::from(bits))
}

pub fn handle(args: VlanArgs, ctx: &Context) -> Result<(), CliError> {
    let out = match args.command {
        VlanCommand::Decode(input) => {
            let text = util::read_input(&input)?;
            let vlan = VlanConfiguration::from_nmcli_str(&text)
                .map_err(CliError::decode("nmcli VLAN settings", NMCLI_HINT))?;
            output::render_single(ctx.format, &vlan, vlan_table, |v| v.id.to_string())?
        }

        VlanCommand::Encode(input) => {
            let vlan = VlanConfiguration::json_deserialize(util::read_json(&input)?)
                .map_err(CliError::decode("VLAN JSON", JSON_HINT))?;
            vlan.nmcli_serialize().to_string().trim_end().to_owned()
        }

        VlanCommand::Flags { value } => {
            let flags = parse_flags(&value)?;
            output::render_single(ctx.format, &flags, flags_table, |f| flag_names(*f))?
        }
    };
    output::print_output(&out, ctx.quiet)
}
