use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::SerialParity;
use crate::entity::NetworkManagerEntity;
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig, int_or};

pub(crate) const SECTION: &str = "serial";

/// Serial line parameters of a modem attached over a tty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialLink {
    pub baud_rate: u32,
    pub bits: u8,
    #[serde(default)]
    pub parity: SerialParity,
    /// Delay between sent bytes, in microseconds.
    pub send_delay: u64,
    pub stop_bits: u8,
}

impl Default for SerialLink {
    fn default() -> Self {
        Self {
            baud_rate: 57_600,
            bits: 8,
            parity: SerialParity::Unset,
            send_delay: 0,
            stop_bits: 1,
        }
    }
}

impl NetworkManagerEntity for SerialLink {
    fn json_deserialize(json: Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            baud_rate: int_or(config, SECTION, "baud-rate", defaults.baud_rate)?,
            bits: int_or(config, SECTION, "bits", defaults.bits)?,
            parity: SerialParity::coerce(config.get_or_empty(SECTION, "parity")),
            send_delay: int_or(config, SECTION, "send-delay", defaults.send_delay)?,
            stop_bits: int_or(config, SECTION, "stopbits", defaults.stop_bits)?,
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "baud-rate", self.baud_rate.to_string())
            .push(SECTION, "bits", self.bits.to_string())
            .push(SECTION, "parity", self.parity.as_str())
            .push(SECTION, "send-delay", self.send_delay.to_string())
            .push(SECTION, "stopbits", self.stop_bits.to_string());
        args
    }
}
