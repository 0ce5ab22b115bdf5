//! WireGuard subcommand handlers.

use gwnet_core::WireguardTunnel;

use super::Context;
use super::util;
use crate::cli::{WireguardArgs, WireguardCommand};
use crate::error::CliError;
use crate::output;

const JSON_HINT: &str =
    "Expected {\"name\", \"privateKey\", \"port\", \"ipv4\", \"ipv4Prefix\", \"ipv6\", \"ipv6Prefix\", \"peers\"}.";

fn tunnel_table(tunnel: &WireguardTunnel) -> String {
    let mut rows = vec![
        ("Name", tunnel.name.clone()),
        (
            "Port",
            tunnel.port.map_or_else(|| "auto".into(), |p| p.to_string()),
        ),
        (
            "IPv4",
            tunnel.ipv4.map_or_else(|| "-".into(), |a| a.to_string()),
        ),
        (
            "IPv6",
            tunnel.ipv6.map_or_else(|| "-".into(), |a| a.to_string()),
        ),
    ];
    for peer in &tunnel.peers {
        let allowed: Vec<String> = peer.allowed_ips.addresses().map(|a| a.to_string()).collect();
        rows.push((
            "Peer",
            format!(
                "{} @ {} [{}]",
                peer.public_key,
                peer.endpoint_address(),
                allowed.join(", ")
            ),
        ));
    }
    output::detail_block(&rows)
}

fn read_tunnel(input: &crate::cli::InputArgs) -> Result<WireguardTunnel, CliError> {
    WireguardTunnel::json_deserialize(util::read_json(input)?)
        .map_err(CliError::decode("WireGuard tunnel JSON", JSON_HINT))
}

pub fn handle(args: WireguardArgs, ctx: &Context) -> Result<(), CliError> {
    let out = match args.command {
        WireguardCommand::Show(input) => {
            let tunnel = read_tunnel(&input)?;
            tracing::debug!(name = %tunnel.name, peers = tunnel.peers.len(), "decoded tunnel");
            output::render_single(ctx.format, &tunnel, tunnel_table, |t| t.name.clone())?
        }

        WireguardCommand::Conf(input) => read_tunnel(&input)?.to_conf(),

        WireguardCommand::Wg {
            input,
            status,
            delete,
        } => {
            let tunnel = read_tunnel(&input)?;
            if status {
                tunnel.wg_status_command().join(" ")
            } else if delete {
                tunnel.ip_delete_command().join(" ")
            } else {
                tunnel.wg_serialize()
            }
        }
    };
    output::print_output(&out, ctx.quiet)
}
