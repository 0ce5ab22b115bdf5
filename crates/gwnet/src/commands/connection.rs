//! Connection subcommand handlers.

use std::fmt::Display;

use gwnet_core::{
    Connection, ConnectionDetail, LinkSettings, NetworkManagerEntity, NmCliCommand,
    parse_added_uuid,
};
use tabled::Tabled;
use uuid::Uuid;

use super::Context;
use super::util::{self, yes_no};
use crate::cli::{ConnectionAction, ConnectionArgs, ConnectionCommand};
use crate::error::CliError;
use crate::output;

const SHOW_HINT: &str = "Pass the output of `nmcli -t -s connection show <uuid>`.";
const LIST_HINT: &str =
    "Pass the output of `nmcli -t -f NAME,UUID,TYPE,DEVICE,ACTIVE,STATE connection show`.";
const JSON_HINT: &str = "Compare the profile with the output of `gwnet connection decode`.";
const ADD_HINT: &str = "Pass the stdout of `nmcli connection add`.";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "State")]
    state: String,
}

fn connection_row(c: &Connection) -> ConnectionRow {
    ConnectionRow {
        name: c.name.clone(),
        uuid: c.uuid.to_string(),
        kind: c.connection_type.to_string(),
        device: c.interface_name.clone().unwrap_or_default(),
        active: yes_no(c.is_active),
        state: c.state.to_string(),
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn ip_summary<A: Display, G: Display>(method: impl Display, addresses: &[A], gateway: Option<G>) -> String {
    let mut parts = vec![method.to_string()];
    parts.extend(addresses.iter().map(ToString::to_string));
    if let Some(gateway) = gateway {
        parts.push(format!("via {gateway}"));
    }
    parts.join(" ")
}

fn detail_table(d: &ConnectionDetail) -> String {
    let auto = d.auto_connect();
    let mut rows = vec![
        ("Name", d.name().to_owned()),
        ("UUID", d.uuid().to_string()),
        ("Type", d.connection_type().to_string()),
        ("Interface", d.interface().to_owned()),
        (
            "Autoconnect",
            format!(
                "{} (priority {}, retries {})",
                yes_no(auto.enabled),
                auto.priority,
                auto.retries
            ),
        ),
        (
            "IPv4",
            ip_summary(d.ipv4().method, &d.ipv4().addresses, d.ipv4().gateway),
        ),
        (
            "IPv6",
            ip_summary(d.ipv6().method, &d.ipv6().addresses, d.ipv6().gateway),
        ),
    ];
    if let Some(current) = &d.ipv4().current {
        rows.push((
            "IPv4 (live)",
            ip_summary("", &current.addresses, current.gateway).trim().to_owned(),
        ));
    }
    if let Some(current) = &d.ipv6().current {
        rows.push((
            "IPv6 (live)",
            ip_summary("", &current.addresses, current.gateway).trim().to_owned(),
        ));
    }
    match d.link() {
        Some(LinkSettings::Wifi(wifi)) => {
            rows.push(("SSID", wifi.ssid.clone()));
            rows.push(("Mode", wifi.mode.to_string()));
            rows.push((
                "Security",
                wifi.security
                    .as_ref()
                    .map_or_else(|| "-".into(), |s| s.security_type().to_string()),
            ));
        }
        Some(LinkSettings::Gsm { gsm, serial }) => {
            rows.push(("APN", gsm.apn.clone()));
            if let Some(serial) = serial {
                rows.push((
                    "Serial",
                    format!(
                        "{} baud, {} bits, parity '{}', {} stop",
                        serial.baud_rate,
                        serial.bits,
                        serial.parity.as_str(),
                        serial.stop_bits
                    ),
                ));
            }
        }
        None => {}
    }
    output::detail_block(&rows)
}

// ── Command rendering ───────────────────────────────────────────────

fn build_command(
    action: ConnectionAction,
    uuid: Option<&str>,
    ifname: Option<String>,
    show_secrets: bool,
) -> Result<NmCliCommand, CliError> {
    if action == ConnectionAction::List {
        return Ok(NmCliCommand::List);
    }
    let name = format!("{action:?}").to_lowercase();
    let raw = uuid.ok_or_else(|| CliError::Validation {
        field: "uuid".into(),
        reason: format!("required for `{name}`"),
    })?;
    let uuid: Uuid = raw.parse().map_err(|e| CliError::Validation {
        field: "uuid".into(),
        reason: format!("'{raw}' is not a UUID: {e}"),
    })?;
    Ok(match action {
        ConnectionAction::List => NmCliCommand::List,
        ConnectionAction::Show => NmCliCommand::Show { uuid, show_secrets },
        ConnectionAction::Up => NmCliCommand::Up {
            uuid,
            interface: ifname,
        },
        ConnectionAction::Down => NmCliCommand::Down { uuid },
        ConnectionAction::Delete => NmCliCommand::Delete { uuid },
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConnectionArgs, ctx: &Context) -> Result<(), CliError> {
    let binary = ctx.config.nmcli.binary.as_str();
    let out = match args.command {
        ConnectionCommand::Decode(input) => {
            let text = util::read_input(&input)?;
            let detail = ConnectionDetail::from_nmcli_str(&text)
                .map_err(CliError::decode("nmcli connection output", SHOW_HINT))?;
            output::render_single(ctx.format, &detail, detail_table, |d| d.uuid().to_string())?
        }

        ConnectionCommand::Encode { input, add, modify } => {
            let detail = ConnectionDetail::json_deserialize(util::read_json(&input)?)
                .map_err(CliError::decode("connection profile JSON", JSON_HINT))?;
            if add {
                NmCliCommand::add(&detail).to_shell(binary)
            } else if modify {
                NmCliCommand::modify(&detail).to_shell(binary)
            } else {
                detail.nmcli_serialize().to_string().trim_end().to_owned()
            }
        }

        ConnectionCommand::List(input) => {
            let text = util::read_input(&input)?;
            let connections = Connection::parse_list(&text)
                .map_err(CliError::decode("nmcli connection listing", LIST_HINT))?;
            tracing::debug!(count = connections.len(), "parsed connection listing");
            output::render_list(ctx.format, &connections, connection_row, |c| c.uuid.to_string())?
        }

        ConnectionCommand::Command {
            action,
            uuid,
            ifname,
        } => build_command(action, uuid.as_deref(), ifname, ctx.config.nmcli.show_secrets)?
            .to_shell(binary),

        ConnectionCommand::AddedUuid(input) => {
            let text = util::read_input(&input)?;
            parse_added_uuid(&text)
                .map_err(CliError::decode("nmcli add output", ADD_HINT))?
                .to_string()
        }
    };
    output::print_output(&out, ctx.quiet)
}
