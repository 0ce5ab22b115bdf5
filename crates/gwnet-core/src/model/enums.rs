// ── NetworkManager value sets ──
//
// Every enum carries its nmcli spelling through strum; JSON uses the same
// spelling. `NmEnum::parse_nm` is the single entry point that turns a raw
// string into a typed value or an `UnknownVariant` error.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{CodecError, Result};

/// A closed NetworkManager value set with a string form.
pub trait NmEnum: FromStr + AsRef<str> + Sized {
    /// Human-readable name of the value set, used in error messages.
    const KIND: &'static str;

    fn parse_nm(value: &str) -> Result<Self> {
        value.parse().map_err(|_| CodecError::UnknownVariant {
            kind: Self::KIND,
            value: value.to_owned(),
        })
    }
}

// ── Connections ─────────────────────────────────────────────────────

/// Connection profile type (`connection.type`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    #[strum(to_string = "802-3-ethernet", serialize = "ethernet")]
    #[serde(rename = "802-3-ethernet", alias = "ethernet")]
    Ethernet,
    #[strum(to_string = "802-11-wireless", serialize = "wifi")]
    #[serde(rename = "802-11-wireless", alias = "wifi")]
    Wifi,
    Gsm,
    Cdma,
    Bluetooth,
    Bond,
    Bridge,
    Dummy,
    Infiniband,
    IpTunnel,
    Loopback,
    Macsec,
    Macvlan,
    Team,
    Tun,
    Veth,
    Vlan,
    Vpn,
    Vrf,
    Vxlan,
    WifiP2p,
    Wireguard,
    Wpan,
    Pppoe,
    Adsl,
    Generic,
}

/// Activation state of a connection in `nmcli connection show` listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Activating,
    Activated,
    Deactivating,
    #[default]
    Deactivated,
}

// ── IP configuration ────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Ipv4Method {
    #[default]
    Auto,
    LinkLocal,
    Manual,
    Shared,
    Disabled,
}

impl Ipv4Method {
    /// Whether NetworkManager obtains the configuration at runtime.
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::Auto)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Ipv6Method {
    #[default]
    Auto,
    Dhcp,
    Ignore,
    LinkLocal,
    Manual,
    Shared,
    Disabled,
}

impl Ipv6Method {
    /// Whether NetworkManager obtains the configuration at runtime.
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::Auto | Self::Dhcp)
    }
}

// ── Wi-Fi ───────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    #[default]
    Infrastructure,
    Adhoc,
    Ap,
    Mesh,
}

/// Discriminant of [`WifiSecurity`](crate::model::WifiSecurity).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WifiSecurityType {
    Open,
    WpaPsk,
    Wep,
    Leap,
    WpaEap,
}

impl WifiSecurityType {
    /// Derive the security type from `802-11-wireless-security.key-mgmt`
    /// and `auth-alg`.
    pub fn from_nmcli(key_mgmt: &str, auth_alg: &str) -> Result<Self> {
        match key_mgmt {
            "" => Ok(Self::Open),
            "wpa-psk" => Ok(Self::WpaPsk),
            "none" => Ok(Self::Wep),
            "ieee8021x" if auth_alg == "leap" => Ok(Self::Leap),
            "wpa-eap" => Ok(Self::WpaEap),
            other => Err(CodecError::UnknownVariant {
                kind: "Wi-Fi key management",
                value: if auth_alg.is_empty() {
                    other.to_owned()
                } else {
                    format!("{other} (auth-alg {auth_alg})")
                },
            }),
        }
    }
}

/// How WEP keys are interpreted (`wep-key-type`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WepKeyType {
    #[default]
    Unknown,
    Key,
    Passphrase,
}

impl WepKeyType {
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Key => 1,
            Self::Passphrase => 2,
        }
    }

    /// Accepts `1`, `key` and nmcli's `1 (key)` spelling.
    pub fn from_nmcli(value: &str) -> Result<Self> {
        let token = value.split_whitespace().next().unwrap_or_default();
        match token {
            "" | "0" => Ok(Self::Unknown),
            "1" => Ok(Self::Key),
            "2" => Ok(Self::Passphrase),
            name => Self::parse_nm(name).map_err(|_| CodecError::UnknownVariant {
                kind: Self::KIND,
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EapPhaseOneMethod {
    Peap,
    Ttls,
    Tls,
    Leap,
    Pwd,
    Fast,
    Md5,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EapPhaseTwoMethod {
    Pap,
    Chap,
    Mschap,
    Mschapv2,
    Gtc,
    Otp,
    Md5,
    Tls,
}

impl NmEnum for ConnectionType {
    const KIND: &'static str = "connection type";
}

impl NmEnum for ConnectionState {
    const KIND: &'static str = "connection state";
}

impl NmEnum for Ipv4Method {
    const KIND: &'static str = "IPv4 method";
}

impl NmEnum for Ipv6Method {
    const KIND: &'static str = "IPv6 method";
}

impl NmEnum for WifiMode {
    const KIND: &'static str = "Wi-Fi mode";
}

impl NmEnum for WifiSecurityType {
    const KIND: &'static str = "Wi-Fi security type";
}

impl NmEnum for WepKeyType {
    const KIND: &'static str = "WEP key type";
}

impl NmEnum for EapPhaseOneMethod {
    const KIND: &'static str = "EAP phase one method";
}

impl NmEnum for EapPhaseTwoMethod {
    const KIND: &'static str = "EAP phase two method";
}

// ── Serial ──────────────────────────────────────────────────────────

/// Serial parity (`serial.parity`). Unknown spellings coerce to
/// [`SerialParity::Unset`] instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter)]
pub enum SerialParity {
    Even,
    Odd,
    None,
    #[default]
    Unset,
}

impl SerialParity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Even => "E",
            Self::Odd => "o",
            Self::None => "n",
            Self::Unset => "",
        }
    }

    pub fn coerce(value: &str) -> Self {
        match value {
            "E" => Self::Even,
            "o" => Self::Odd,
            "n" => Self::None,
            "" => Self::Unset,
            other => {
                tracing::debug!(parity = other, "unrecognized serial parity, using unset");
                Self::Unset
            }
        }
    }
}

impl Serialize for SerialParity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SerialParity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or(Self::Unset, |raw| Self::coerce(&raw)))
    }
}
