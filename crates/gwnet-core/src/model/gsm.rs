use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::NetworkManagerEntity;
use crate::error::Result;
use crate::nmcli::{NmCliArgs, NmCliConfig};

const SECTION: &str = "gsm";

/// Mobile broadband settings of a connection profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GsmConnection {
    pub apn: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
}

impl GsmConnection {
    /// Value of `gsm.pin-flags`: a SIM without a PIN must not be prompted for one.
    pub fn pin_flags(&self) -> &'static str {
        if self.pin.as_deref().unwrap_or_default().is_empty() {
            "not-required"
        } else {
            "none"
        }
    }
}

impl NetworkManagerEntity for GsmConnection {
    fn json_deserialize(json: Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let optional = |key| config.get_non_empty(SECTION, key).map(str::to_owned);
        Ok(Self {
            apn: config.require(SECTION, "apn")?.to_owned(),
            username: optional("username"),
            password: optional("password"),
            pin: optional("pin"),
        })
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let value = |field: &Option<String>| field.clone().unwrap_or_default();
        let mut args = NmCliArgs::new();
        args.push(SECTION, "apn", self.apn.as_str())
            .push(SECTION, "username", value(&self.username))
            .push(SECTION, "password", value(&self.password))
            .push(SECTION, "pin", value(&self.pin))
            .push(SECTION, "pin-flags", self.pin_flags());
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
    fn absent_credentials_become_null_and_empty() {
        let gsm = GsmConnection::from_nmcli_str("gsm.apn:internet\ngsm.username:\n").unwrap();
        assert_eq!(
            gsm.json_serialize().unwrap(),
            json!({"apn": "internet", "username": null, "password": null, "pin": null})
        );
        assert_eq!(
            gsm.nmcli_serialize().to_string(),
            "gsm.apn \"internet\" gsm.username \"\" gsm.password \"\" gsm.pin \"\" gsm.pin-flags \"not-required\" "
        );
    }

    #[test]
    fn pin_switches_pin_flags() {
        let gsm = GsmConnection {
            apn: "internet.t-mobile.cz".into(),
            username: Some("user".into()),
            password: Some("pass".into()),
            pin: Some("1234".into()),
        };
        let args = gsm.nmcli_serialize();
        assert_eq!(args.get("gsm.pin"), Some("1234"));
        assert_eq!(args.get("gsm.pin-flags"), Some("none"));
        assert_eq!(
            GsmConnection {
                pin: Some(String::new()),
                ..gsm
            }
            .pin_flags(),
            "not-required"
        );
    }

    #[test]
    fn apn_is_required() {
        assert!(GsmConnection::from_nmcli_str("gsm.pin:1234").is_err());
        assert!(GsmConnection::json_deserialize(json!({"pin": "1234"})).is_err());
    }

    #[test]
    fn json_round_trip_with_missing_optionals() {
        let gsm = GsmConnection::json_deserialize(json!({"apn": "internet", "pin": "0000"})).unwrap();
        assert_eq!(gsm.username, None);
        assert_eq!(
            gsm.json_serialize().unwrap(),
            json!({"apn": "internet", "username": null, "password": null, "pin": "0000"})
        );
    }
}
