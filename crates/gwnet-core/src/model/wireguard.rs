// ── WireGuard ──
//
// Tunnels are configured with `wg set` (runtime) or a wg-quick style
// configuration file. Neither involves nmcli, so these types expose the JSON
// codec and the two `wg` renderings instead of `NetworkManagerEntity`.

use std::net::Ipv6Addr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::address::{Ipv4Address, Ipv6Address, MultiAddress};
use crate::convert::{AllowedIpsJson, WireguardPeerJson, WireguardTunnelJson};
use crate::entity::decode_json;
use crate::error::Result;

// ── Allowed IPs ─────────────────────────────────────────────────────

/// Networks routed to a peer, split by family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedIps {
    pub ipv4: Vec<Ipv4Address>,
    pub ipv6: Vec<Ipv6Address>,
}

impl AllowedIps {
    pub fn from_addresses(addresses: impl IntoIterator<Item = MultiAddress>) -> Self {
        let mut allowed = Self::default();
        for address in addresses {
            match address {
                MultiAddress::V4(v4) => allowed.ipv4.push(v4),
                MultiAddress::V6(v6) => allowed.ipv6.push(v6),
            }
        }
        allowed
    }

    pub fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<AllowedIpsJson, _>(json)
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }

    /// IPv4 networks first, then IPv6.
    pub fn addresses(&self) -> impl Iterator<Item = MultiAddress> + '_ {
        self.ipv4
            .iter()
            .copied()
            .map(MultiAddress::V4)
            .chain(self.ipv6.iter().copied().map(MultiAddress::V6))
    }

    fn joined(&self) -> String {
        self.addresses()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `allowed-ips a,b,...` clause for `wg set`, or nothing when no
    /// network is allowed.
    pub fn wg_args(&self) -> Vec<String> {
        if self.is_empty() {
            Vec::new()
        } else {
            vec!["allowed-ips".to_owned(), self.joined()]
        }
    }

    /// `AllowedIPs = a,b,...` configuration line, or empty.
    pub fn to_conf(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("AllowedIPs = {}", self.joined())
        }
    }
}

#[derive(Serialize)]
struct AllowedIpsView {
    ipv4: Vec<MultiAddress>,
    ipv6: Vec<MultiAddress>,
}

impl Serialize for AllowedIps {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        AllowedIpsView {
            ipv4: self.ipv4.iter().copied().map(MultiAddress::V4).collect(),
            ipv6: self.ipv6.iter().copied().map(MultiAddress::V6).collect(),
        }
        .serialize(serializer)
    }
}

// ── Peer ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireguardPeer {
    pub public_key: String,
    /// Preshared key, handed to `wg` as given.
    pub psk: Option<String>,
    /// Persistent keepalive interval in seconds, `0` disables it.
    pub keepalive: u16,
    /// Host name or address of the peer.
    pub endpoint: String,
    pub port: u16,
    #[serde(rename = "allowedIPs")]
    pub allowed_ips: AllowedIps,
}

impl WireguardPeer {
    pub fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<WireguardPeerJson, _>(json)
    }

    fn preshared_key(&self) -> Option<&str> {
        self.psk.as_deref().filter(|psk| !psk.is_empty())
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn endpoint_address(&self) -> String {
        if self.endpoint.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.endpoint, self.port)
        } else {
            format!("{}:{}", self.endpoint, self.port)
        }
    }

    /// `peer` clause of a `wg set` command.
    pub fn wg_args(&self) -> Vec<String> {
        let mut args = vec!["peer".to_owned(), self.public_key.clone()];
        if let Some(psk) = self.preshared_key() {
            args.extend(["preshared-key".to_owned(), psk.to_owned()]);
        }
        args.extend([
            "endpoint".to_owned(),
            self.endpoint_address(),
            "persistent-keepalive".to_owned(),
            self.keepalive.to_string(),
        ]);
        args.extend(self.allowed_ips.wg_args());
        args
    }

    pub fn wg_serialize(&self) -> String {
        self.wg_args().join(" ")
    }

    /// `[Peer]` section of a configuration file.
    pub fn to_conf(&self) -> String {
        let mut lines = vec!["[Peer]".to_owned(), format!("PublicKey = {}", self.public_key)];
        if let Some(psk) = self.preshared_key() {
            lines.push(format!("PresharedKey = {psk}"));
        }
        lines.push(format!("Endpoint = {}", self.endpoint_address()));
        if self.keepalive > 0 {
            lines.push(format!("PersistentKeepalive = {}", self.keepalive));
        }
        if !self.allowed_ips.is_empty() {
            lines.push(self.allowed_ips.to_conf());
        }
        conf_section(&lines)
    }
}

// ── Tunnel ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireguardTunnel {
    pub name: String,
    pub private_key: String,
    /// Listen port; `None` lets the kernel pick one.
    pub port: Option<u16>,
    pub ipv4: Option<Ipv4Address>,
    pub ipv6: Option<Ipv6Address>,
    pub peers: Vec<WireguardPeer>,
}

impl WireguardTunnel {
    pub fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<WireguardTunnelJson, _>(json)
    }

    pub fn json_serialize(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Full `wg set` command line as argv.
    pub fn wg_command(&self) -> Vec<String> {
        let mut argv = vec![
            "wg".to_owned(),
            "set".to_owned(),
            self.name.clone(),
            "private-key".to_owned(),
            self.private_key.clone(),
        ];
        if let Some(port) = self.port {
            argv.extend(["listen-port".to_owned(), port.to_string()]);
        }
        for peer in &self.peers {
            argv.extend(peer.wg_args());
        }
        argv
    }

    pub fn wg_serialize(&self) -> String {
        self.wg_command().join(" ")
    }

    pub fn wg_status_command(&self) -> Vec<String> {
        vec!["wg".to_owned(), "show".to_owned(), self.name.clone()]
    }

    pub fn ip_delete_command(&self) -> Vec<String> {
        ["ip", "link", "delete", "dev", self.name.as_str()]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// wg-quick style configuration file.
    pub fn to_conf(&self) -> String {
        let mut lines = vec![
            "[Interface]".to_owned(),
            format!("PrivateKey = {}", self.private_key),
        ];
        if let Some(port) = self.port {
            lines.push(format!("ListenPort = {port}"));
        }
        let addresses: Vec<String> = self
            .ipv4
            .map(|a| a.to_string())
            .into_iter()
            .chain(self.ipv6.map(|a| a.to_string()))
            .collect();
        if !addresses.is_empty() {
            lines.push(format!("Address = {}", addresses.join(", ")));
        }
        let mut conf = conf_section(&lines);
        for peer in &self.peers {
            conf.push('\n');
            conf.push_str(&peer.to_conf());
        }
        conf
    }
}

/// One newline-terminated line per entry.
fn conf_section(lines: &[String]) -> String {
    let mut section = lines.join("\n");
    section.push('\n');
    section
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireguardTunnelView<'a> {
    name: &'a str,
    private_key: &'a str,
    port: Option<u16>,
    ipv4: Option<std::net::Ipv4Addr>,
    ipv4_prefix: Option<u8>,
    ipv6: Option<Ipv6Addr>,
    ipv6_prefix: Option<u8>,
    peers: &'a [WireguardPeer],
}

impl Serialize for WireguardTunnel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireguardTunnelView {
            name: &self.name,
            private_key: &self.private_key,
            port: self.port,
            ipv4: self.ipv4.map(|a| a.address()),
            ipv4_prefix: self.ipv4.map(|a| a.prefix()),
            ipv6: self.ipv6.map(|a| a.address()),
            ipv6_prefix: self.ipv6.map(|a| a.prefix()),
            peers: &self.peers,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tunnel_json() -> Value {
        json!({
            "name": "wg0",
            "privateKey": "cHJpdmF0ZQ==",
            "port": 51820,
            "ipv4": "10.8.0.1",
            "ipv4Prefix": 24,
            "ipv6": "fd00::1",
            "ipv6Prefix": 64,
            "peers": [{
                "publicKey": "cGVlcg==",
                "psk": null,
                "keepalive": 25,
                "endpoint": "vpn.example.org",
                "port": 51820,
                "allowedIPs": {
                    "ipv4": [{"address": "10.8.0.0", "prefix": 24}],
                    "ipv6": [{"address": "fd00::", "prefix": 64}]
                }
            }]
        })
    }

    #[test]
    fn json_round_trip() {
        let tunnel = WireguardTunnel::json_deserialize(tunnel_json()).unwrap();
        assert_eq!(tunnel.ipv4.unwrap().to_string(), "10.8.0.1/24");
        assert_eq!(tunnel.json_serialize().unwrap(), tunnel_json());
    }

    #[test]
    fn wg_set_command() {
        let tunnel = WireguardTunnel::json_deserialize(tunnel_json()).unwrap();
        assert_eq!(
            tunnel.wg_serialize(),
            "wg set wg0 private-key cHJpdmF0ZQ== listen-port 51820 peer cGVlcg== endpoint vpn.example.org:51820 persistent-keepalive 25 allowed-ips 10.8.0.0/24,fd00::/64"
        );
        assert_eq!(tunnel.ip_delete_command(), ["ip", "link", "delete", "dev", "wg0"]);
        assert_eq!(tunnel.wg_status_command(), ["wg", "show", "wg0"]);
    }

    #[test]
    fn conf_file() {
        let tunnel = WireguardTunnel::json_deserialize(tunnel_json()).unwrap();
        assert_eq!(
            tunnel.to_conf(),
            "[Interface]\nPrivateKey = cHJpdmF0ZQ==\nListenPort = 51820\nAddress = 10.8.0.1/24, fd00::1/64\n\n\
             [Peer]\nPublicKey = cGVlcg==\nEndpoint = vpn.example.org:51820\nPersistentKeepalive = 25\n\
             AllowedIPs = 10.8.0.0/24,fd00::/64\n"
        );
    }

    #[test]
    fn peer_with_psk_and_ipv6_endpoint() {
        let peer = WireguardPeer {
            public_key: "key".into(),
            psk: Some("shared".into()),
            keepalive: 0,
            endpoint: "2001:db8::1".into(),
            port: 1234,
            allowed_ips: AllowedIps::default(),
        };
        assert_eq!(
            peer.wg_serialize(),
            "peer key preshared-key shared endpoint [2001:db8::1]:1234 persistent-keepalive 0"
        );
        assert_eq!(
            peer.to_conf(),
            "[Peer]\nPublicKey = key\nPresharedKey = shared\nEndpoint = [2001:db8::1]:1234\n"
        );
    }

    #[test]
    fn allowed_ips_rendering() {
        let empty = AllowedIps::default();
        assert!(empty.wg_args().is_empty());
        assert_eq!(empty.to_conf(), "");

        let allowed = AllowedIps::from_addresses([
            MultiAddress::from_prefix("fd00::/64").unwrap(),
            MultiAddress::from_prefix("192.168.0.0/16").unwrap(),
        ]);
        assert_eq!(allowed.wg_args(), ["allowed-ips", "192.168.0.0/16,fd00::/64"]);
        assert_eq!(allowed.to_conf(), "AllowedIPs = 192.168.0.0/16,fd00::/64");
        assert_eq!(
            AllowedIps::json_deserialize(serde_json::to_value(&allowed).unwrap()).unwrap(),
            allowed
        );
    }

    #[test]
    fn tunnel_without_addresses() {
        let tunnel = WireguardTunnel::json_deserialize(json!({
            "name": "wg1",
            "privateKey": "k",
            "port": null,
            "ipv4": null,
            "ipv4Prefix": null,
            "ipv6": null,
            "ipv6Prefix": null,
            "peers": []
        }))
        .unwrap();
        assert_eq!(tunnel.wg_serialize(), "wg set wg1 private-key k");
        assert_eq!(tunnel.to_conf(), "[Interface]\nPrivateKey = k\n");
    }
}
