// ── The codec contract ──
//
// Every NetworkManager entity converts between three shapes: the JSON view,
// parsed nmcli output, and nmcli arguments. Entities share no state, so the
// contract is a trait rather than a base type.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::nmcli::{NmCliArgs, NmCliConfig};

pub trait NetworkManagerEntity: Serialize + Sized {
    /// Build the entity from its JSON view.
    fn json_deserialize(json: Value) -> Result<Self>;

    /// Build the entity from parsed `nmcli -t -s connection show` output.
    /// Absent sections and rows fall back to NetworkManager defaults.
    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self>;

    /// Arguments for `nmcli connection add|modify`.
    fn nmcli_serialize(&self) -> NmCliArgs;

    fn json_serialize(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_json_str(input: &str) -> Result<Self> {
        Self::json_deserialize(serde_json::from_str(input)?)
    }

    fn from_nmcli_str(input: &str) -> Result<Self> {
        Self::nmcli_deserialize(&NmCliConfig::parse(input)?)
    }
}

/// Deserialize `json` into the wire shape `W`, then validate it into `T`.
pub(crate) fn decode_json<W, T>(json: Value) -> Result<T>
where
    W: DeserializeOwned,
    T: TryFrom<W>,
    CodecError: From<T::Error>,
{
    let wire: W = serde_json::from_value(json)?;
    Ok(T::try_from(wire)?)
}
