// ── NetworkManager entity model ──
//
// Every type here is a free-standing value that converts between the JSON
// view, nmcli output and nmcli arguments. `ConnectionDetail` is the only
// aggregate; it owns one of each per-domain entity.

pub mod address;
pub mod enums;

pub mod autoconnect;
pub mod connection;
pub mod gsm;
pub mod ipv4;
pub mod ipv6;
pub mod serial;
pub mod vlan;
pub mod wifi;
pub mod wifi_security;
pub mod wireguard;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use gwnet_core::model::*` gives you everything.

// Addresses
pub use address::{Ipv4Address, Ipv6Address, MultiAddress};

// Value sets
pub use enums::{
    ConnectionState, ConnectionType, EapPhaseOneMethod, EapPhaseTwoMethod, Ipv4Method,
    Ipv6Method, NmEnum, SerialParity, WepKeyType, WifiMode, WifiSecurityType,
};

// Connections
pub use connection::{Connection, ConnectionDetail, LinkSettings, is_serial_interface};

// Per-domain settings
pub use autoconnect::AutoConnect;
pub use gsm::GsmConnection;
pub use ipv4::{Ipv4Connection, Ipv4Current};
pub use ipv6::{Ipv6Connection, Ipv6Current};
pub use serial::SerialLink;
pub use vlan::{VlanConfiguration, VlanFlags};
pub use wifi::WifiConnection;
pub use wifi_security::{Eap, Leap, Wep, WifiSecurity};

// WireGuard
pub use wireguard::{AllowedIps, WireguardPeer, WireguardTunnel};
