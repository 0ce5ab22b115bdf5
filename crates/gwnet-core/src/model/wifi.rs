use serde::Serialize;
use serde_json::Value;

use super::enums::{NmEnum, WifiMode};
use super::wifi_security::{self, WifiSecurity};
use crate::convert::WifiConnectionJson;
use crate::entity::{NetworkManagerEntity, decode_json};
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig, split_list};

const SECTION: &str = "802-11-wireless";

/// Wireless settings of a connection profile.
///
/// `bssids` lists access points NetworkManager has seen for this profile. It
/// is observed state: it only comes from nmcli output and is never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiConnection {
    pub ssid: String,
    pub mode: WifiMode,
    pub bssids: Vec<String>,
    pub security: Option<WifiSecurity>,
}

impl WifiConnection {
    /// Decode like [`NetworkManagerEntity::nmcli_deserialize`], except that a
    /// security block which fails to decode is logged and dropped instead of
    /// failing the whole connection.
    pub fn nmcli_deserialize_lenient(config: &NmCliConfig) -> Result<Self> {
        let mut wifi = Self::decode_base(config)?;
        wifi.security = match decode_security(config) {
            Ok(security) => security,
            Err(error) => {
                tracing::warn!(%error, ssid = %wifi.ssid, "ignoring undecodable Wi-Fi security settings");
                None
            }
        };
        Ok(wifi)
    }

    fn decode_base(config: &NmCliConfig) -> Result<Self> {
        Ok(Self {
            ssid: config.require(SECTION, "ssid")?.to_owned(),
            mode: config
                .get_non_empty(SECTION, "mode")
                .map(WifiMode::parse_nm)
                .transpose()?
                .unwrap_or_default(),
            bssids: split_list(config.get_or_empty(SECTION, "seen-bssids"))
                .map(str::to_owned)
                .collect(),
            security: None,
        })
    }
}

fn decode_security(config: &NmCliConfig) -> Result<Option<WifiSecurity>> {
    if !config.has_section(wifi_security::SECTION) {
        return Ok(None);
    }
    WifiSecurity::nmcli_deserialize(config).map(Some)
}

impl NetworkManagerEntity for WifiConnection {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<WifiConnectionJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let mut wifi = Self::decode_base(config)?;
        wifi.security = decode_security(config)?;
        Ok(wifi)
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "ssid", self.ssid.as_str())
            .push(SECTION, "mode", self.mode.as_ref());
        if let Some(security) = &self.security {
            args.append(security.nmcli_serialize());
        }
        args
    }
}
