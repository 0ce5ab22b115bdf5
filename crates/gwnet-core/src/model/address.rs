// ── Address + prefix value types ──
//
// `Ipv4Address` enforces a prefix of at most 32; `Ipv6Address` accepts any
// prefix that fits in a byte. Both display as `address/prefix`, which is
// also the form nmcli and wg consume.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{CodecError, Result};

const IPV4_MAX_PREFIX: u8 = 32;

// ── IPv4 ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Address {
    address: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Address {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > IPV4_MAX_PREFIX {
            return Err(CodecError::InvalidPrefix {
                family: "IPv4",
                value: prefix.to_string(),
                max: IPV4_MAX_PREFIX,
            });
        }
        Ok(Self { address, prefix })
    }

    /// Parse `address/prefix`.
    pub fn from_prefix(value: &str) -> Result<Self> {
        let (address, prefix) = split_prefix(value, "IPv4")?;
        Self::new(parse_ipv4(address)?, parse_prefix(prefix, "IPv4")?)
    }

    /// Build from a dotted subnet mask. The prefix is the number of leading
    /// one bits; a non-contiguous mask is not rejected.
    pub fn from_mask(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        let prefix = u32::from(mask).leading_ones();
        Self {
            address,
            prefix: u8::try_from(prefix).unwrap_or(IPV4_MAX_PREFIX),
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Dotted subnet mask for the prefix.
    pub fn mask(&self) -> Ipv4Addr {
        let bits = u32::MAX
            .checked_shl(u32::from(IPV4_MAX_PREFIX - self.prefix))
            .unwrap_or(0);
        Ipv4Addr::from(bits)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

impl FromStr for Ipv4Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_prefix(s)
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Ipv4Address", 3)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("prefix", &self.prefix)?;
        state.serialize_field("mask", &self.mask())?;
        state.end()
    }
}

// ── IPv6 ────────────────────────────────────────────────────────────

/// IPv6 address with prefix. The prefix is not bounds-checked beyond `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Address {
    address: Ipv6Addr,
    prefix: u8,
}

impl Ipv6Address {
    pub fn new(address: Ipv6Addr, prefix: u8) -> Self {
        Self { address, prefix }
    }

    /// Parse `address/prefix`.
    pub fn from_prefix(value: &str) -> Result<Self> {
        let (address, prefix) = split_prefix(value, "IPv6")?;
        Ok(Self::new(parse_ipv6(address)?, parse_prefix(prefix, "IPv6")?))
    }

    pub fn address(&self) -> Ipv6Addr {
        self.address
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

impl FromStr for Ipv6Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_prefix(s)
    }
}

impl Serialize for Ipv6Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Ipv6Address", 2)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("prefix", &self.prefix)?;
        state.end()
    }
}

// ── Either family ───────────────────────────────────────────────────

/// Address of either family with a prefix, as stored for WireGuard
/// interfaces and peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl MultiAddress {
    pub fn new(address: IpAddr, prefix: u8) -> Result<Self> {
        match address {
            IpAddr::V4(v4) => Ipv4Address::new(v4, prefix).map(Self::V4),
            IpAddr::V6(v6) => Ok(Self::V6(Ipv6Address::new(v6, prefix))),
        }
    }

    /// Parse `address/prefix`, picking the family from the address literal.
    pub fn from_prefix(value: &str) -> Result<Self> {
        let (address, prefix) = split_prefix(value, "IP")?;
        let address: IpAddr = address.parse().map_err(|_| CodecError::InvalidAddress {
            family: "IP",
            value: address.to_owned(),
        })?;
        Self::new(address, parse_prefix(prefix, "IP")?)
    }

    pub fn address(&self) -> IpAddr {
        match self {
            Self::V4(a) => IpAddr::V4(a.address()),
            Self::V6(a) => IpAddr::V6(a.address()),
        }
    }

    pub fn prefix(&self) -> u8 {
        match self {
            Self::V4(a) => a.prefix(),
            Self::V6(a) => a.prefix(),
        }
    }
}

impl fmt::Display for MultiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(a) => fmt::Display::fmt(a, f),
            Self::V6(a) => fmt::Display::fmt(a, f),
        }
    }
}

impl FromStr for MultiAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_prefix(s)
    }
}

/// `{address, prefix}` for both families; no mask even for IPv4.
impl Serialize for MultiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MultiAddress", 2)?;
        state.serialize_field("address", &self.address())?;
        state.serialize_field("prefix", &self.prefix())?;
        state.end()
    }
}

impl From<Ipv4Address> for MultiAddress {
    fn from(a: Ipv4Address) -> Self {
        Self::V4(a)
    }
}

impl From<Ipv6Address> for MultiAddress {
    fn from(a: Ipv6Address) -> Self {
        Self::V6(a)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

pub(crate) fn parse_ipv4(value: &str) -> Result<Ipv4Addr> {
    value.trim().parse().map_err(|_| CodecError::InvalidAddress {
        family: "IPv4",
        value: value.to_owned(),
    })
}

pub(crate) fn parse_ipv6(value: &str) -> Result<Ipv6Addr> {
    value.trim().parse().map_err(|_| CodecError::InvalidAddress {
        family: "IPv6",
        value: value.to_owned(),
    })
}

fn split_prefix<'a>(value: &'a str, family: &'static str) -> Result<(&'a str, &'a str)> {
    value
        .trim()
        .split_once('/')
        .ok_or_else(|| CodecError::InvalidPrefix {
            family,
            value: value.to_owned(),
            max: if family == "IPv4" { IPV4_MAX_PREFIX } else { u8::MAX },
        })
}

fn parse_prefix(value: &str, family: &'static str) -> Result<u8> {
    value.trim().parse().map_err(|_| CodecError::InvalidPrefix {
        family,
        value: value.to_owned(),
        max: if family == "IPv4" { IPV4_MAX_PREFIX } else { u8::MAX },
    })
}
