// ── Connections ──
//
// `Connection` is a row of `nmcli connection show`; it is read-only and never
// written back. `ConnectionDetail` is the full profile and composes every
// per-domain entity. Which link settings exist depends on the connection
// type, and that pairing is checked whenever links are attached.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::autoconnect::AutoConnect;
use super::enums::{ConnectionState, ConnectionType, NmEnum};
use super::gsm::GsmConnection;
use super::ipv4::Ipv4Connection;
use super::ipv6::Ipv6Connection;
use super::serial::{self, SerialLink};
use super::wifi::WifiConnection;
use crate::convert::ConnectionDetailJson;
use crate::entity::{NetworkManagerEntity, decode_json};
use crate::error::{CodecError, Result};
use crate::nmcli::{NmCliArgs, NmCliConfig, split_terse_fields};

const SECTION: &str = "connection";
const GENERAL_SECTION: &str = "GENERAL";

static SERIAL_INTERFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tty(AMA|ACM|S)\d+$").expect("serial interface pattern is valid")
});

/// Whether `interface` names a serial tty a modem can sit behind.
pub fn is_serial_interface(interface: &str) -> bool {
    SERIAL_INTERFACE.is_match(interface)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|source| CodecError::InvalidUuid {
        value: value.to_owned(),
        source,
    })
}

// ── Connection list ─────────────────────────────────────────────────

/// Summary row of `nmcli -t -f NAME,UUID,TYPE,DEVICE,ACTIVE,STATE connection show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub name: String,
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub interface_name: Option<String>,
    pub is_active: bool,
    pub state: ConnectionState,
}

impl Connection {
    /// Parse one terse row. `ACTIVE` and `STATE` may be missing; without
    /// `ACTIVE` a connection bound to a device counts as active.
    pub fn from_nmcli_row(line: &str) -> Result<Self> {
        let fields = split_terse_fields(line.trim_end_matches('\r'));
        let [name, uuid, kind, device, rest @ ..] = fields.as_slice() else {
            return Err(CodecError::MalformedListRow {
                line: line.to_owned(),
            });
        };
        if rest.len() > 2 {
            return Err(CodecError::MalformedListRow {
                line: line.to_owned(),
            });
        }

        let interface_name = Some(device.clone()).filter(|d| !d.is_empty());
        let is_active = match rest.first() {
            Some(active) => active == "yes",
            None => interface_name.is_some(),
        };
        let state = match rest.get(1).map(String::as_str) {
            None | Some("") => ConnectionState::Deactivated,
            Some(raw) => ConnectionState::parse_nm(raw)?,
        };

        Ok(Self {
            name: name.clone(),
            uuid: parse_uuid(uuid)?,
            connection_type: ConnectionType::parse_nm(kind)?,
            interface_name,
            is_active,
            state,
        })
    }

    /// Parse a whole listing, skipping blank lines.
    pub fn parse_list(output: &str) -> Result<Vec<Self>> {
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::from_nmcli_row)
            .collect()
    }
}

// ── Connection detail ───────────────────────────────────────────────

/// Link-layer settings that only exist for some connection types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSettings {
    Wifi(WifiConnection),
    Gsm {
        gsm: GsmConnection,
        /// Present only when the modem sits behind a serial tty.
        serial: Option<SerialLink>,
    },
}

impl LinkSettings {
    fn name(&self) -> &'static str {
        match self {
            Self::Wifi(_) => "Wi-Fi",
            Self::Gsm { .. } => "GSM",
        }
    }

    fn connection_type(&self) -> ConnectionType {
        match self {
            Self::Wifi(_) => ConnectionType::Wifi,
            Self::Gsm { .. } => ConnectionType::Gsm,
        }
    }
}

/// A complete connection profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetail {
    name: String,
    uuid: Uuid,
    connection_type: ConnectionType,
    interface: String,
    auto_connect: AutoConnect,
    ipv4: Ipv4Connection,
    ipv6: Ipv6Connection,
    link: Option<LinkSettings>,
}

impl ConnectionDetail {
    /// A profile with default autoconnect and IP settings and no link settings.
    pub fn new(
        name: impl Into<String>,
        uuid: Uuid,
        connection_type: ConnectionType,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid,
            connection_type,
            interface: interface.into(),
            auto_connect: AutoConnect::default(),
            ipv4: Ipv4Connection::default(),
            ipv6: Ipv6Connection::default(),
            link: None,
        }
    }

    pub fn with_auto_connect(mut self, auto_connect: AutoConnect) -> Self {
        self.auto_connect = auto_connect;
        self
    }

    pub fn with_ipv4(mut self, ipv4: Ipv4Connection) -> Self {
        self.ipv4 = ipv4;
        self
    }

    pub fn with_ipv6(mut self, ipv6: Ipv6Connection) -> Self {
        self.ipv6 = ipv6;
        self
    }

    /// Attach link settings; they must match the connection type.
    pub fn with_link(mut self, link: LinkSettings) -> Result<Self> {
        if link.connection_type() != self.connection_type {
            return Err(CodecError::LinkMismatch {
                link: link.name(),
                connection_type: self.connection_type.to_string(),
            });
        }
        self.link = Some(link);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn auto_connect(&self) -> &AutoConnect {
        &self.auto_connect
    }

    pub fn ipv4(&self) -> &Ipv4Connection {
        &self.ipv4
    }

    pub fn ipv6(&self) -> &Ipv6Connection {
        &self.ipv6
    }

    pub fn link(&self) -> Option<&LinkSettings> {
        self.link.as_ref()
    }

    pub fn wifi(&self) -> Option<&WifiConnection> {
        match &self.link {
            Some(LinkSettings::Wifi(wifi)) => Some(wifi),
            _ => None,
        }
    }

    pub fn gsm(&self) -> Option<&GsmConnection> {
        match &self.link {
            Some(LinkSettings::Gsm { gsm, .. }) => Some(gsm),
            _ => None,
        }
    }

    pub fn serial(&self) -> Option<&SerialLink> {
        match &self.link {
            Some(LinkSettings::Gsm { serial, .. }) => serial.as_ref(),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionDetailView<'a> {
    name: &'a str,
    uuid: Uuid,
    #[serde(rename = "type")]
    connection_type: ConnectionType,
    interface: &'a str,
    auto_connect: &'a AutoConnect,
    ipv4: &'a Ipv4Connection,
    ipv6: &'a Ipv6Connection,
    #[serde(skip_serializing_if = "Option::is_none")]
    wifi: Option<&'a WifiConnection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gsm: Option<&'a GsmConnection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<&'a SerialLink>,
}

impl Serialize for ConnectionDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ConnectionDetailView {
            name: &self.name,
            uuid: self.uuid,
            connection_type: self.connection_type,
            interface: &self.interface,
            auto_connect: &self.auto_connect,
            ipv4: &self.ipv4,
            ipv6: &self.ipv6,
            wifi: self.wifi(),
            gsm: self.gsm(),
            serial: self.serial(),
        }
        .serialize(serializer)
    }
}

impl NetworkManagerEntity for ConnectionDetail {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<ConnectionDetailJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let name = config.require(SECTION, "id")?;
        let uuid = parse_uuid(config.require(SECTION, "uuid")?)?;
        let connection_type = ConnectionType::parse_nm(config.require(SECTION, "type")?)?;
        let interface = config
            .get_non_empty(SECTION, "interface-name")
            .or_else(|| config.get_non_empty(GENERAL_SECTION, "DEVICES"))
            .unwrap_or_default();

        let link = match connection_type {
            ConnectionType::Wifi => Some(LinkSettings::Wifi(
                WifiConnection::nmcli_deserialize_lenient(config)?,
            )),
            ConnectionType::Gsm => {
                let serial = if is_serial_interface(interface) && config.has_section(serial::SECTION) {
                    tracing::debug!(interface, "attaching serial link");
                    Some(SerialLink::nmcli_deserialize(config)?)
                } else {
                    None
                };
                Some(LinkSettings::Gsm {
                    gsm: GsmConnection::nmcli_deserialize(config)?,
                    serial,
                })
            }
            _ => None,
        };

        let detail = Self::new(name, uuid, connection_type, interface)
            .with_auto_connect(AutoConnect::nmcli_deserialize(config)?)
            .with_ipv4(Ipv4Connection::nmcli_deserialize(config)?)
            .with_ipv6(Ipv6Connection::nmcli_deserialize(config)?);
        match link {
            Some(link) => detail.with_link(link),
            None => Ok(detail),
        }
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "id", self.name.as_str())
            .push(SECTION, "type", self.connection_type.as_ref())
            .push(SECTION, "interface-name", self.interface.as_str())
            .append(self.auto_connect.nmcli_serialize())
            .append(self.ipv4.nmcli_serialize())
            .append(self.ipv6.nmcli_serialize());
        match &self.link {
            Some(LinkSettings::Wifi(wifi)) => {
                args.append(wifi.nmcli_serialize());
            }
            Some(LinkSettings::Gsm { gsm, serial }) => {
                args.append(gsm.nmcli_serialize());
                if let Some(serial) = serial {
                    args.append(serial.nmcli_serialize());
                }
            }
            None => {}
        }
        args
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const UUID: &str = "25ab1b06-2a86-40a9-950f-1c576ddcd35a";

    #[test]
    fn serial_interface_pattern() {
        for name in ["ttyS0", "ttyAMA0", "ttyACM12"] {
            assert!(is_serial_interface(name), "{name}");
        }
        for name in ["wwan0", "ttyUSB0", "ttyS", "xttyS0", "ttyS0a"] {
            assert!(!is_serial_interface(name), "{name}");
        }
    }

    #[test]
    fn list_row_with_all_columns() {
        let row = format!("Wired connection 1:{UUID}:802-3-ethernet:eth0:yes:activated");
        let conn = Connection::from_nmcli_row(&row).unwrap();
        assert_eq!(conn.name, "Wired connection 1");
        assert_eq!(conn.interface_name.as_deref(), Some("eth0"));
        assert!(conn.is_active);
        assert_eq!(conn.state, ConnectionState::Activated);
        assert_eq!(
            serde_json::to_value(&conn).unwrap(),
            json!({
                "name": "Wired connection 1",
                "uuid": UUID,
                "type": "802-3-ethernet",
                "interfaceName": "eth0",
                "isActive": true,
                "state": "activated"
            })
        );
    }

    #[test]
    fn list_row_without_state_columns() {
        let active = Connection::from_nmcli_row(&format!("lte:{UUID}:gsm:ttyS0")).unwrap();
        assert!(active.is_active);
        assert_eq!(active.state, ConnectionState::Deactivated);

        let inactive = Connection::from_nmcli_row(&format!("a\\:b:{UUID}:802-11-wireless::no:")).unwrap();
        assert_eq!(inactive.name, "a:b");
        assert_eq!(inactive.interface_name, None);
        assert!(!inactive.is_active);
    }

    #[test]
    fn list_rejects_malformed_rows() {
        assert!(matches!(
            Connection::from_nmcli_row("just:three:fields"),
            Err(CodecError::MalformedListRow { .. })
        ));
        assert!(matches!(
            Connection::from_nmcli_row("n:not-a-uuid:gsm:"),
            Err(CodecError::InvalidUuid { .. })
        ));
        let listing = format!("eth:{UUID}:802-3-ethernet:eth0\n\nvpn:{UUID}:vpn:\n");
        assert_eq!(Connection::parse_list(&listing).unwrap().len(), 2);
    }

    #[test]
    fn link_must_match_type() {
        let detail = ConnectionDetail::new("eth0", Uuid::nil(), ConnectionType::Ethernet, "eth0");
        let err = detail
            .with_link(LinkSettings::Gsm {
                gsm: GsmConnection::default(),
                serial: None,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "GSM settings cannot be attached to a 802-3-ethernet connection"
        );
    }

    fn gsm_json(interface: &str) -> Value {
        json!({
            "name": "lte",
            "uuid": UUID,
            "type": "gsm",
            "interface": interface,
            "autoConnect": {"enabled": true, "priority": 0, "retries": -1},
            "ipv4": {"method": "auto", "addresses": [], "gateway": null, "dns": []},
            "ipv6": {"method": "ignore", "addresses": [], "gateway": null, "dns": []},
            "gsm": {"apn": "internet", "username": null, "password": null, "pin": null},
            "serial": {"baudRate": 115200, "bits": 8, "parity": "n", "sendDelay": 0, "stopBits": 1}
        })
    }

    #[test]
    fn serial_attached_only_for_serial_interfaces() {
        let on_tty = ConnectionDetail::json_deserialize(gsm_json("ttyS0")).unwrap();
        assert!(on_tty.serial().is_some());
        assert_eq!(on_tty.json_serialize().unwrap(), gsm_json("ttyS0"));

        let on_wwan = ConnectionDetail::json_deserialize(gsm_json("wwan0")).unwrap();
        assert!(on_wwan.gsm().is_some());
        assert!(on_wwan.serial().is_none());
        assert!(on_wwan.json_serialize().unwrap().get("serial").is_none());
    }

    #[test]
    fn serial_is_required_on_serial_interfaces() {
        let mut json = gsm_json("ttyAMA0");
        json.as_object_mut().unwrap().remove("serial");
        assert!(matches!(
            ConnectionDetail::json_deserialize(json),
            Err(CodecError::MissingField { field: "serial" })
        ));
    }

    #[test]
    fn interface_falls_back_to_general_devices() {
        let config = NmCliConfig::parse(&format!(
            "connection.id:eth0\nconnection.uuid:{UUID}\nconnection.type:802-3-ethernet\nconnection.interface-name:\nGENERAL.DEVICES:eth1\n"
        ))
        .unwrap();
        let detail = ConnectionDetail::nmcli_deserialize(&config).unwrap();
        assert_eq!(detail.interface(), "eth1");
        assert!(detail.link().is_none());

        let no_general = NmCliConfig::parse(&format!(
            "connection.id:eth0\nconnection.uuid:{UUID}\nconnection.type:802-3-ethernet\n"
        ))
        .unwrap();
        assert_eq!(ConnectionDetail::nmcli_deserialize(&no_general).unwrap().interface(), "");
    }

    #[test]
    fn nmcli_identity_is_mandatory() {
        let bad_uuid = NmCliConfig::parse(
            "connection.id:eth0\nconnection.uuid:nope\nconnection.type:802-3-ethernet",
        )
        .unwrap();
        assert!(matches!(
            ConnectionDetail::nmcli_deserialize(&bad_uuid),
            Err(CodecError::InvalidUuid { .. })
        ));
        let no_type = NmCliConfig::parse(&format!("connection.id:eth0\nconnection.uuid:{UUID}")).unwrap();
        assert!(matches!(
            ConnectionDetail::nmcli_deserialize(&no_type),
            Err(CodecError::MissingProperty { .. })
        ));
    }

    #[test]
    fn nmcli_serialization_order() {
        let detail = ConnectionDetail::json_deserialize(gsm_json("ttyS0")).unwrap();
        let properties: Vec<_> = detail.nmcli_serialize().pairs().map(|(k, _)| k.to_owned()).collect();
        let sections: Vec<_> = properties
            .iter()
            .map(|p| p.split_once('.').unwrap().0)
            .fold(Vec::new(), |mut acc: Vec<&str>, section| {
                if acc.last() != Some(&section) {
                    acc.push(section);
                }
                acc
            });
        assert_eq!(sections, ["connection", "ipv4", "ipv6", "gsm", "serial"]);
        assert_eq!(&properties[..3], ["connection.id", "connection.type", "connection.interface-name"]);
    }
}
