use std::net::Ipv6Addr;

use serde::Serialize;
use serde_json::Value;

use super::address::{Ipv6Address, parse_ipv6};
use super::enums::{Ipv6Method, NmEnum};
use super::ipv4::join;
use crate::convert::{Ipv6ConnectionJson, serialize_dns};
use crate::entity::{NetworkManagerEntity, decode_json};
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig, split_list};

const SECTION: &str = "ipv6";
const RUNTIME_SECTION: &str = "IP6";

/// Configured IPv6 settings of a connection profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv6Connection {
    pub method: Ipv6Method,
    pub addresses: Vec<Ipv6Address>,
    pub gateway: Option<Ipv6Addr>,
    #[serde(serialize_with = "serialize_dns")]
    pub dns: Vec<Ipv6Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Ipv6Current>,
}

/// Runtime IPv6 state from the `IP6` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv6Current {
    pub addresses: Vec<Ipv6Address>,
    pub gateway: Option<Ipv6Addr>,
    #[serde(serialize_with = "serialize_dns")]
    pub dns: Vec<Ipv6Addr>,
}

impl Ipv6Current {
    fn from_runtime(config: &NmCliConfig) -> Result<Self> {
        Ok(Self {
            addresses: config
                .indexed(RUNTIME_SECTION, "ADDRESS")
                .into_iter()
                .map(Ipv6Address::from_prefix)
                .collect::<Result<_>>()?,
            gateway: config
                .get_non_empty(RUNTIME_SECTION, "GATEWAY")
                .map(parse_ipv6)
                .transpose()?,
            dns: config
                .indexed(RUNTIME_SECTION, "DNS")
                .into_iter()
                .map(parse_ipv6)
                .collect::<Result<_>>()?,
        })
    }
}

impl NetworkManagerEntity for Ipv6Connection {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<Ipv6ConnectionJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let method = config
            .get_non_empty(SECTION, "method")
            .map(Ipv6Method::parse_nm)
            .transpose()?
            .unwrap_or_default();
        let addresses = split_list(config.get_or_empty(SECTION, "addresses"))
            .map(Ipv6Address::from_prefix)
            .collect::<Result<_>>()?;
        let gateway = config
            .get_non_empty(SECTION, "gateway")
            .map(parse_ipv6)
            .transpose()?;
        let dns = split_list(config.get_or_empty(SECTION, "dns"))
            .map(parse_ipv6)
            .collect::<Result<_>>()?;

        let current = if method.is_automatic() && config.has_section(RUNTIME_SECTION) {
            tracing::debug!("attaching live IPv6 state");
            Some(Ipv6Current::from_runtime(config)?)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn nmcli_escaped_addresses() {
        let config = NmCliConfig::parse(
            "ipv6.method:manual\nipv6.addresses:2001\\:db8\\:\\:2/64\nipv6.gateway:2001\\:db8\\:\\:1\nipv6.dns:2001\\:4860\\:4860\\:\\:8888",
        )
        .unwrap();
        let conn = Ipv6Connection::nmcli_deserialize(&config).unwrap();
        assert_eq!(conn.addresses[0].to_string(), "2001:db8::2/64");
        assert_eq!(conn.gateway, Some("2001:db8::1".parse().unwrap()));
        assert_eq!(conn.dns.len(), 1);

        let args = conn.nmcli_serialize();
        assert_eq!(args.get("ipv6.addresses"), Some("2001:db8::2/64"));
        assert_eq!(args.get("ipv6.dns"), Some("2001:4860:4860::8888"));
    }

    #[test]
    fn dhcp_counts_as_automatic() {
        let config = NmCliConfig::parse(
            "ipv6.method:dhcp\nIP6.ADDRESS[2]:2001:db8::20/128\nIP6.ADDRESS[1]:fe80::1/64\nIP6.GATEWAY:fe80::ff",
        )
        .unwrap();
        let current = Ipv6Connection::nmcli_deserialize(&config)
            .unwrap()
            .current
            .unwrap();
        let rendered: Vec<_> = current.addresses.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["fe80::1/64", "2001:db8::20/128"]);
        assert_eq!(current.gateway, Some("fe80::ff".parse().unwrap()));
        assert!(current.dns.is_empty());
    }

    #[test]
    fn ignore_has_no_current() {
        let config = NmCliConfig::parse("ipv6.method:ignore\nIP6.ADDRESS[1]:fe80::1/64").unwrap();
        assert_eq!(Ipv6Connection::nmcli_deserialize(&config).unwrap().current, None);
    }

    #[test]
    fn json_round_trip() {
        let json = json!({
            "method": "manual",
            "addresses": [{"address": "fd00::10", "prefix": 64}],
            "gateway": "fd00::1",
            "dns": [{"address": "fd00::1"}]
        });
        let conn = Ipv6Connection::json_deserialize(json.clone()).unwrap();
        assert_eq!(conn.json_serialize().unwrap(), json);
    }

    #[test]
    fn json_ignores_current_on_input() {
        let json = json!({
            "method": "auto",
            "addresses": [],
            "gateway": null,
            "dns": [],
            "current": {"addresses": [{"address": "fd00::10", "prefix": 64}], "gateway": null, "dns": []}
        });
        let conn = Ipv6Connection::json_deserialize(json).unwrap();
        assert_eq!(conn.current, None);
    }
}
