use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::NetworkManagerEntity;
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig, int_or};

const SECTION: &str = "connection";

/// Automatic activation settings of a connection profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoConnect {
    pub enabled: bool,
    pub priority: i32,
    /// `-1` lets NetworkManager pick its global default, `0` retries forever.
    pub retries: i32,
}

impl Default for AutoConnect {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 0,
            retries: -1,
        }
    }
}

impl NetworkManagerEntity for AutoConnect {
    fn json_deserialize(json: Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: config
                .get_non_empty(SECTION, "autoconnect")
                .map_or(defaults.enabled, |value| value == "yes"),
            priority: int_or(config, SECTION, "autoconnect-priority", defaults.priority)?,
            retries: int_or(config, SECTION, "autoconnect-retries", defaults.retries)?,
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "autoconnect", if self.enabled { "yes" } else { "no" })
            .push(SECTION, "autoconnect-priority", self.priority.to_string())
            .push(SECTION, "autoconnect-retries", self.retries.to_string());
        args
    }
}
