//! Network configuration codec for the IQRF gateway.
//!
//! NetworkManager state shows up in three shapes: the JSON view served to the
//! web UI, the terse `section.key:value` text printed by `nmcli`, and the
//! `section.key value` arguments accepted by `nmcli connection add|modify`.
//! This crate converts between them without doing any I/O:
//!
//! - **[`NetworkManagerEntity`]** is the four-way contract
//!   (`json_deserialize`, `json_serialize`, `nmcli_deserialize`,
//!   `nmcli_serialize`) implemented by every profile entity.
//!
//! - **[`NmCliConfig`] / [`NmCliArgs`]** are the parsed nmcli output and the
//!   ordered argument list, including nmcli's escaping rules.
//!
//! - **Domain model** ([`model`]) covers addresses, IPv4/IPv6 settings,
//!   autoconnect, Wi-Fi and its security variants, GSM with an optional serial
//!   link, VLANs, WireGuard tunnels, and the [`ConnectionDetail`] aggregate.
//!
//! - **[`NmCliCommand`]** renders the nmcli invocations (list, show, add,
//!   modify, up, down, delete) for a caller that actually spawns processes.

pub mod command;
pub mod convert;
pub mod entity;
pub mod error;
pub mod model;
pub mod nmcli;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{LIST_FIELDS, NmCliCommand, parse_added_uuid};
pub use entity::NetworkManagerEntity;
pub use error::CodecError;
pub use nmcli::{NmCliArgs, NmCliConfig};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Addresses
    AllowedIps,
    // Per-domain settings
    AutoConnect,
    // Connections
    Connection,
    ConnectionDetail,
    ConnectionState,
    ConnectionType,
    Eap,
    GsmConnection,
    Ipv4Address,
    Ipv4Connection,
    Ipv4Method,
    Ipv6Address,
    Ipv6Connection,
    Ipv6Method,
    Leap,
    LinkSettings,
    MultiAddress,
    SerialLink,
    SerialParity,
    VlanConfiguration,
    VlanFlags,
    Wep,
    WifiConnection,
    WifiMode,
    WifiSecurity,
    WifiSecurityType,
    // WireGuard
    WireguardPeer,
    WireguardTunnel,
};
