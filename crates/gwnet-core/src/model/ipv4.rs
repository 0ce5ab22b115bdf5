use std::net::Ipv4Addr;

use serde::Serialize;
use serde_json::Value;

use super::address::{Ipv4Address, parse_ipv4};
use super::enums::{Ipv4Method, NmEnum};
use crate::convert::{Ipv4ConnectionJson, serialize_dns};
use crate::entity::{NetworkManagerEntity, decode_json};
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig, split_list};

const SECTION: &str = "ipv4";
const RUNTIME_SECTION: &str = "IP4";

/// Configured IPv4 settings of a connection profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv4Connection {
    pub method: Ipv4Method,
    pub addresses: Vec<Ipv4Address>,
    pub gateway: Option<Ipv4Addr>,
    #[serde(serialize_with = "serialize_dns")]
    pub dns: Vec<Ipv4Addr>,
    /// Live state reported by NetworkManager. Only filled when decoding nmcli
    /// output of an automatically configured connection; never written back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Ipv4Current>,
}

/// Runtime IPv4 state from the `IP4` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv4Current {
    pub addresses: Vec<Ipv4Address>,
    pub gateway: Option<Ipv4Addr>,
    #[serde(serialize_with = "serialize_dns")]
    pub dns: Vec<Ipv4Addr>,
}

impl Ipv4Current {
    fn from_runtime(config: &NmCliConfig) -> Result<Self> {
        Ok(Self {
            addresses: config
                .indexed(RUNTIME_SECTION, "ADDRESS")
                .into_iter()
                .map(Ipv4Address::from_prefix)
                .collect::<Result<_>>()?,
            gateway: config
                .get_non_empty(RUNTIME_SECTION, "GATEWAY")
                .map(parse_ipv4)
                .transpose()?,
            dns: config
                .indexed(RUNTIME_SECTION, "DNS")
                .into_iter()
                .map(parse_ipv4)
                .collect::<Result<_>>()?,
        })
    }
}

impl NetworkManagerEntity for Ipv4Connection {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<Ipv4ConnectionJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let method = config
            .get_non_empty(SECTION, "method")
            .map(Ipv4Method::parse_nm)
            .transpose()?
            .unwrap_or_default();
        let addresses = split_list(config.get_or_empty(SECTION, "addresses"))
            .map(Ipv4Address::from_prefix)
            .collect::<Result<_>>()?;
        let gateway = config
            .get_non_empty(SECTION, "gateway")
            .map(parse_ipv4)
            .transpose()?;
        let dns = split_list(config.get_or_empty(SECTION, "dns"))
            .map(parse_ipv4)
            .collect::<Result<_>>()?;

        let current = if method.is_automatic() && config.has_section(RUNTIME_SECTION) {
            tracing::debug!("attaching live IPv4 state");
            Some(Ipv4Current::from_runtime(config)?)
        } else {
            None
        };

        Ok(Self {
            method,
            addresses,
            gateway,
            dns,
            current,
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "method", self.method.as_ref())
            .push(SECTION, "addresses", join(&self.addresses))
            .push(
                SECTION,
                "gateway",
                self.gateway.map(|gw| gw.to_string()).unwrap_or_default(),
            )
            .push(SECTION, "dns", join(&self.dns));
        args
    }
}

pub(crate) fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
