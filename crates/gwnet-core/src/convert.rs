// ── JSON-to-model conversions ──
//
// Incoming JSON is deserialized into the loose wire shapes below and then
// validated into `crate::model` types through `TryFrom`. Addresses, enum
// values and UUIDs are parsed here so that failures surface as typed
// `CodecError`s rather than opaque serde messages. Empty strings in optional
// positions mean "absent", matching what the web UI sends.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::entity::NetworkManagerEntity;
use crate::error::{CodecError, Result};
use crate::model::address::{parse_ipv4, parse_ipv6};
use crate::model::connection::{is_serial_interface, parse_uuid};
use crate::model::enums::NmEnum;
use crate::model::wifi_security::WEP_KEY_SLOTS;
use crate::model::{
    AllowedIps, AutoConnect, ConnectionDetail, ConnectionType, Eap, EapPhaseOneMethod,
    EapPhaseTwoMethod, GsmConnection, Ipv4Address, Ipv4Connection, Ipv4Method, Ipv6Address,
    Ipv6Connection, Ipv6Method, Leap, LinkSettings, SerialLink, Wep, WepKeyType, WifiConnection,
    WifiMode, WifiSecurity, WifiSecurityType, WireguardPeer, WireguardTunnel,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Serialize DNS servers as `[{"address": ...}]`.
pub(crate) fn serialize_dns<A: Serialize, S: Serializer>(
    servers: &[A],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Server<'a, A> {
        address: &'a A,
    }

    serializer.collect_seq(servers.iter().map(|address| Server { address }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<Value>, field: &'static str) -> Result<Value> {
    match value {
        Some(Value::Null) | None => Err(CodecError::MissingField { field }),
        Some(value) => Ok(value),
    }
}

fn parse_optional<T: NmEnum>(value: Option<String>) -> Result<Option<T>> {
    non_empty(value).map(|v| T::parse_nm(&v)).transpose()
}

// ── Addresses ──────────────────────────────────────────────────────

/// IPv4 address entry. `prefix` wins over `mask` when both are given.
#[derive(Debug, Deserialize)]
pub(crate) struct Ipv4AddressJson {
    #[serde(default)]
    address: String,
    prefix: Option<u8>,
    mask: Option<String>,
}

impl TryFrom<Ipv4AddressJson> for Ipv4Address {
    type Error = CodecError;

    fn try_from(wire: Ipv4AddressJson) -> Result<Self> {
        let address = parse_ipv4(&wire.address)?;
        match (wire.prefix, non_empty(wire.mask)) {
            (Some(prefix), _) => Ipv4Address::new(address, prefix),
            (None, Some(mask)) => Ok(Ipv4Address::from_mask(address, parse_ipv4(&mask)?)),
            (None, None) => Err(CodecError::MissingField { field: "prefix" }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ipv6AddressJson {
    #[serde(default)]
    address: String,
    prefix: u8,
}

impl TryFrom<Ipv6AddressJson> for Ipv6Address {
    type Error = CodecError;

    fn try_from(wire: Ipv6AddressJson) -> Result<Self> {
        Ok(Ipv6Address::new(parse_ipv6(&wire.address)?, wire.prefix))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DnsJson {
    #[serde(default)]
    address: String,
}

// ── IP connections ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct Ipv4ConnectionJson {
    method: String,
    #[serde(default)]
    addresses: Vec<Ipv4AddressJson>,
    #[serde(default)]
    gateway: Option<String>,
    #[serde(default)]
    dns: Vec<DnsJson>,
}

impl TryFrom<Ipv4ConnectionJson> for Ipv4Connection {
    type Error = CodecError;

    fn try_from(wire: Ipv4ConnectionJson) -> Result<Self> {
        Ok(Self {
            method: Ipv4Method::parse_nm(&wire.method)?,
            addresses: wire
                .addresses
                .into_iter()
                .filter(|a| !a.address.is_empty())
                .map(Ipv4Address::try_from)
                .collect::<Result<_>>()?,
            gateway: non_empty(wire.gateway)
                .map(|gw| parse_ipv4(&gw))
                .transpose()?,
            dns: wire
                .dns
                .iter()
                .filter(|d| !d.address.is_empty())
                .map(|d| parse_ipv4(&d.address))
                .collect::<Result<_>>()?,
            current: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ipv6ConnectionJson {
    method: String,
    #[serde(default)]
    addresses: Vec<Ipv6AddressJson>,
    #[serde(default)]
    gateway: Option<String>,
    #[serde(default)]
    dns: Vec<DnsJson>,
}

impl TryFrom<Ipv6ConnectionJson> for Ipv6Connection {
    type Error = CodecError;

    fn try_from(wire: Ipv6ConnectionJson) -> Result<Self> {
        Ok(Self {
            method: Ipv6Method::parse_nm(&wire.method)?,
            addresses: wire
                .addresses
                .into_iter()
                .filter(|a| !a.address.is_empty())
                .map(Ipv6Address::try_from)
                .collect::<Result<_>>()?,
            gateway: non_empty(wire.gateway)
                .map(|gw| parse_ipv6(&gw))
                .transpose()?,
            dns: wire
                .dns
                .iter()
                .filter(|d| !d.address.is_empty())
                .map(|d| parse_ipv6(&d.address))
                .collect::<Result<_>>()?,
            current: None,
        })
    }
}

// ── Wi-Fi ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WifiSecurityJson {
    #[serde(rename = "type")]
    kind: String,
    psk: Option<String>,
    leap: Option<Value>,
    wep: Option<Value>,
    eap: Option<Value>,
}

impl TryFrom<WifiSecurityJson> for WifiSecurity {
    type Error = CodecError;

    fn try_from(wire: WifiSecurityJson) -> Result<Self> {
        Ok(match WifiSecurityType::parse_nm(&wire.kind)? {
            WifiSecurityType::Open => Self::Open,
            WifiSecurityType::WpaPsk => Self::WpaPsk {
                psk: wire.psk.ok_or(CodecError::MissingField { field: "psk" })?,
            },
            WifiSecurityType::Leap => Self::Leap {
                leap: Leap::json_deserialize(required(wire.leap, "leap")?)?,
            },
            WifiSecurityType::Wep => Self::Wep {
                wep: Wep::json_deserialize(required(wire.wep, "wep")?)?,
            },
            WifiSecurityType::WpaEap => Self::WpaEap {
                eap: Eap::json_deserialize(required(wire.eap, "eap")?)?,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WepJson {
    #[serde(rename = "type", default)]
    key_type: Option<String>,
    #[serde(default)]
    index: u8,
    #[serde(default)]
    keys: Vec<String>,
}

impl TryFrom<WepJson> for Wep {
    type Error = CodecError;

    fn try_from(wire: WepJson) -> Result<Self> {
        if wire.keys.len() > WEP_KEY_SLOTS {
            tracing::warn!(
                count = wire.keys.len(),
                "more WEP keys than slots, extra keys dropped"
            );
        }
        let mut keys: [String; WEP_KEY_SLOTS] = Default::default();
        for (slot, key) in keys.iter_mut().zip(wire.keys) {
            *slot = key;
        }
        let key_type = parse_optional::<WepKeyType>(wire.key_type)?.unwrap_or_default();
        Wep::new(key_type, wire.index, keys)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EapJson {
    phase_one_method: Option<String>,
    phase_two_method: Option<String>,
    #[serde(default)]
    anonymous_identity: String,
    #[serde(default)]
    cert: String,
    #[serde(default)]
    identity: String,
    #[serde(default)]
    password: String,
}

impl TryFrom<EapJson> for Eap {
    type Error = CodecError;

    fn try_from(wire: EapJson) -> Result<Self> {
        Ok(Self {
            phase_one_method: parse_optional::<EapPhaseOneMethod>(wire.phase_one_method)?,
            phase_two_method: parse_optional::<EapPhaseTwoMethod>(wire.phase_two_method)?,
            anonymous_identity: wire.anonymous_identity,
            cert: wire.cert,
            identity: wire.identity,
            password: wire.password,
        })
    }
}

/// `bssids` is accepted but ignored; it is observed state.
#[derive(Debug, Deserialize)]
pub(crate) struct WifiConnectionJson {
    ssid: String,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    security: Option<Value>,
}

impl TryFrom<WifiConnectionJson> for WifiConnection {
    type Error = CodecError;

    fn try_from(wire: WifiConnectionJson) -> Result<Self> {
        let security = match wire.security {
            Some(Value::Null) | None => None,
            Some(json) => Some(WifiSecurity::json_deserialize(json)?),
        };
        Ok(Self {
            ssid: wire.ssid,
            mode: parse_optional::<WifiMode>(wire.mode)?.unwrap_or_default(),
            bssids: Vec::new(),
            security,
        })
    }
}

// ── Connection detail ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectionDetailJson {
    name: String,
    uuid: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    interface: Option<String>,
    auto_connect: Value,
    ipv4: Value,
    ipv6: Value,
    #[serde(default)]
    wifi: Option<Value>,
    #[serde(default)]
    gsm: Option<Value>,
    #[serde(default)]
    serial: Option<Value>,
}

impl TryFrom<ConnectionDetailJson> for ConnectionDetail {
    type Error = CodecError;

    fn try_from(wire: ConnectionDetailJson) -> Result<Self> {
        let uuid = parse_uuid(&wire.uuid)?;
        let connection_type = ConnectionType::parse_nm(&wire.kind)?;
        let interface = wire.interface.unwrap_or_default();

        let link = match connection_type {
            ConnectionType::Wifi => Some(LinkSettings::Wifi(WifiConnection::json_deserialize(
                required(wire.wifi, "wifi")?,
            )?)),
            ConnectionType::Gsm => {
                let serial = if is_serial_interface(&interface) {
                    tracing::debug!(%interface, "attaching serial link");
                    Some(SerialLink::json_deserialize(required(wire.serial, "serial")?)?)
                } else {
                    None
                };
                Some(LinkSettings::Gsm {
                    gsm: GsmConnection::json_deserialize(required(wire.gsm, "gsm")?)?,
                    serial,
                })
            }
            _ => None,
        };

        let detail = ConnectionDetail::new(wire.name, uuid, connection_type, interface)
            .with_auto_connect(AutoConnect::json_deserialize(wire.auto_connect)?)
            .with_ipv4(Ipv4Connection::json_deserialize(wire.ipv4)?)
            .with_ipv6(Ipv6Connection::json_deserialize(wire.ipv6)?);
        match link {
            Some(link) => detail.with_link(link),
            None => Ok(detail),
        }
    }
}

// ── WireGuard ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AllowedIpsJson {
    #[serde(default)]
    ipv4: Vec<Ipv4AddressJson>,
    #[serde(default)]
    ipv6: Vec<Ipv6AddressJson>,
}

impl TryFrom<AllowedIpsJson> for AllowedIps {
    type Error = CodecError;

    fn try_from(wire: AllowedIpsJson) -> Result<Self> {
        Ok(Self {
            ipv4: wire
                .ipv4
                .into_iter()
                .map(Ipv4Address::try_from)
                .collect::<Result<_>>()?,
            ipv6: wire
                .ipv6
                .into_iter()
                .map(Ipv6Address::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireguardPeerJson {
    public_key: String,
    #[serde(default)]
    psk: Option<String>,
    #[serde(default)]
    keepalive: u16,
    endpoint: String,
    port: u16,
    #[serde(rename = "allowedIPs", default)]
    allowed_ips: Option<AllowedIpsJson>,
}

impl TryFrom<WireguardPeerJson> for WireguardPeer {
    type Error = CodecError;

    fn try_from(wire: WireguardPeerJson) -> Result<Self> {
        Ok(Self {
            public_key: wire.public_key,
            psk: wire.psk,
            keepalive: wire.keepalive,
            endpoint: wire.endpoint,
            port: wire.port,
            allowed_ips: AllowedIps::try_from(wire.allowed_ips.unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireguardTunnelJson {
    name: String,
    private_key: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    ipv4: Option<String>,
    #[serde(default)]
    ipv4_prefix: Option<u8>,
    #[serde(default)]
    ipv6: Option<String>,
    #[serde(default)]
    ipv6_prefix: Option<u8>,
    #[serde(default)]
    peers: Vec<WireguardPeerJson>,
}

impl TryFrom<WireguardTunnelJson> for WireguardTunnel {
    type Error = CodecError;

    fn try_from(wire: WireguardTunnelJson) -> Result<Self> {
        let ipv4 = match (non_empty(wire.ipv4), wire.ipv4_prefix) {
            (Some(address), Some(prefix)) => Some(Ipv4Address::new(parse_ipv4(&address)?, prefix)?),
            (Some(_), None) => return Err(CodecError::MissingField { field: "ipv4Prefix" }),
            (None, _) => None,
        };
        let ipv6 = match (non_empty(wire.ipv6), wire.ipv6_prefix) {
            (Some(address), Some(prefix)) => Some(Ipv6Address::new(parse_ipv6(&address)?, prefix)),
            (Some(_), None) => return Err(CodecError::MissingField { field: "ipv6Prefix" }),
            (None, _) => None,
        };
        Ok(Self {
            name: wire.name,
            private_key: wire.private_key,
            port: wire.port,
            ipv4,
            ipv6,
            peers: wire
                .peers
                .into_iter()
                .map(WireguardPeer::try_from)
                .collect::<Result<_>>()?,
        })
    }
}
