// ── Wi-Fi security ──
//
// `WifiSecurity` is a closed sum type: the variant decides which payload
// exists, so "exactly one payload" holds by construction. In JSON the
// variant is the `type` tag and the payload sits under its own key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{EapPhaseOneMethod, EapPhaseTwoMethod, NmEnum, WepKeyType, WifiSecurityType};
use crate::convert::{EapJson, WepJson, WifiSecurityJson};
use crate::entity::{NetworkManagerEntity, decode_json};
use crate::error::{CodecError, Result};
use crate::nmcli::{NmCliArgs, NmCliConfig, int_or, split_list};

pub(crate) const SECTION: &str = "802-11-wireless-security";
const EAP_SECTION: &str = "802-1x";

/// Number of WEP key slots (`wep-key0` .. `wep-key3`).
pub const WEP_KEY_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WifiSecurity {
    Open,
    WpaPsk { psk: String },
    Leap { leap: Leap },
    Wep { wep: Wep },
    WpaEap { eap: Eap },
}

impl WifiSecurity {
    pub fn security_type(&self) -> WifiSecurityType {
        match self {
            Self::Open => WifiSecurityType::Open,
            Self::WpaPsk { .. } => WifiSecurityType::WpaPsk,
            Self::Leap { .. } => WifiSecurityType::Leap,
            Self::Wep { .. } => WifiSecurityType::Wep,
            Self::WpaEap { .. } => WifiSecurityType::WpaEap,
        }
    }
}

impl NetworkManagerEntity for WifiSecurity {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<WifiSecurityJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let security_type = WifiSecurityType::from_nmcli(
            config.get_or_empty(SECTION, "key-mgmt"),
            config.get_or_empty(SECTION, "auth-alg"),
        )?;
        tracing::trace!(%security_type, "decoding Wi-Fi security");
        Ok(match security_type {
            WifiSecurityType::Open => Self::Open,
            WifiSecurityType::WpaPsk => Self::WpaPsk {
                psk: config.require(SECTION, "psk")?.to_owned(),
            },
            WifiSecurityType::Leap => Self::Leap {
                leap: Leap::nmcli_deserialize(config)?,
            },
            WifiSecurityType::Wep => Self::Wep {
                wep: Wep::nmcli_deserialize(config)?,
            },
            WifiSecurityType::WpaEap => Self::WpaEap {
                eap: Eap::nmcli_deserialize(config)?,
            },
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        match self {
            Self::Open => {}
            Self::WpaPsk { psk } => {
                args.push(SECTION, "key-mgmt", "wpa-psk")
                    .push(SECTION, "psk", psk.as_str());
            }
            Self::Leap { leap } => {
                args.push(SECTION, "key-mgmt", "ieee8021x")
                    .push(SECTION, "auth-alg", "leap")
                    .append(leap.nmcli_serialize());
            }
            Self::Wep { wep } => {
                args.push(SECTION, "key-mgmt", "none")
                    .push(SECTION, "auth-alg", "open")
                    .append(wep.nmcli_serialize());
            }
            Self::WpaEap { eap } => {
                args.push(SECTION, "key-mgmt", "wpa-eap")
                    .append(eap.nmcli_serialize());
            }
        }
        args
    }
}

// ── LEAP ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leap {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl NetworkManagerEntity for Leap {
    fn json_deserialize(json: Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        Ok(Self {
            username: config.require(SECTION, "leap-username")?.to_owned(),
            password: config.get_or_empty(SECTION, "leap-password").to_owned(),
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "leap-username", self.username.as_str())
            .push(SECTION, "leap-password", self.password.as_str());
        args
    }
}

// ── WEP ─────────────────────────────────────────────────────────────

/// Static WEP keys. `index` selects the transmit key slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Wep {
    #[serde(rename = "type")]
    pub key_type: WepKeyType,
    pub index: u8,
    pub keys: [String; WEP_KEY_SLOTS],
}

impl Wep {
    pub fn new(key_type: WepKeyType, index: u8, keys: [String; WEP_KEY_SLOTS]) -> Result<Self> {
        if usize::from(index) >= WEP_KEY_SLOTS {
            return Err(CodecError::InvalidInteger {
                field: "wep.index".into(),
                value: index.to_string(),
            });
        }
        Ok(Self {
            key_type,
            index,
            keys,
        })
    }

    /// Key used for transmission.
    pub fn active_key(&self) -> &str {
        self.keys
            .get(usize::from(self.index))
            .map_or("", String::as_str)
    }
}

impl NetworkManagerEntity for Wep {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<WepJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let key_type = WepKeyType::from_nmcli(config.get_or_empty(SECTION, "wep-key-type"))?;
        let index = int_or(config, SECTION, "wep-tx-keyidx", 0u8)?;
        let keys = std::array::from_fn(|slot| {
            config
                .get_or_empty(SECTION, &format!("wep-key{slot}"))
                .to_owned()
        });
        Self::new(key_type, index, keys)
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "wep-key-type", self.key_type.code().to_string())
            .push(SECTION, "wep-tx-keyidx", self.index.to_string());
        for (slot, key) in self.keys.iter().enumerate() {
            args.push(SECTION, &format!("wep-key{slot}"), key.as_str());
        }
        args
    }
}

// ── EAP ─────────────────────────────────────────────────────────────

/// 802.1X (WPA-Enterprise) credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eap {
    pub phase_one_method: Option<EapPhaseOneMethod>,
    pub phase_two_method: Option<EapPhaseTwoMethod>,
    pub anonymous_identity: String,
    /// Path of the CA certificate (`802-1x.ca-cert`).
    pub cert: String,
    pub identity: String,
    pub password: String,
}

impl NetworkManagerEntity for Eap {
    fn json_deserialize(json: Value) -> Result<Self> {
        decode_json::<EapJson, _>(json)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        // nmcli may list several outer methods; the first one wins.
        let phase_one = split_list(config.require(EAP_SECTION, "eap")?)
            .next()
            .map(EapPhaseOneMethod::parse_nm)
            .transpose()?;
        let phase_two = config
            .get_non_empty(EAP_SECTION, "phase2-auth")
            .map(EapPhaseTwoMethod::parse_nm)
            .transpose()?;
        Ok(Self {
            phase_one_method: phase_one,
            phase_two_method: phase_two,
            anonymous_identity: config
                .get_or_empty(EAP_SECTION, "anonymous-identity")
                .to_owned(),
            cert: config.get_or_empty(EAP_SECTION, "ca-cert").to_owned(),
            identity: config.get_or_empty(EAP_SECTION, "identity").to_owned(),
            password: config.get_or_empty(EAP_SECTION, "password").to_owned(),
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(
            EAP_SECTION,
            "eap",
            self.phase_one_method.as_ref().map_or("", EapPhaseOneMethod::as_ref),
        )
        .push(
            EAP_SECTION,
            "phase2-auth",
            self.phase_two_method.as_ref().map_or("", EapPhaseTwoMethod::as_ref),
        )
        .push(EAP_SECTION, "anonymous-identity", self.anonymous_identity.as_str())
        .push(EAP_SECTION, "ca-cert", self.cert.as_str())
        .push(EAP_SECTION, "identity", self.identity.as_str())
        .push(EAP_SECTION, "password", self.password.as_str());
        args
    }
}
