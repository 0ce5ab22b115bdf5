// ── VLAN ──
//
// nmcli reports `vlan.flags` as an integer bit set, optionally followed by
// the flag names: `5 (REORDER_HEADERS, LOOSE_BINDING)`. Only the four
// documented bits are kept; anything above bit 3 is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::NetworkManagerEntity;
use crate::error::{CodecError, Result};
use crate::nmcli::{NmCliArgs, NmCliConfig, parse_int, parse_leading_int};

const SECTION: &str = "vlan";

/// Highest usable 802.1Q VLAN id.
pub const MAX_VLAN_ID: u16 = 4094;

const REORDER_HEADERS: u32 = 1 << 0;
const GVRP: u32 = 1 << 1;
const LOOSE_BINDING: u32 = 1 << 2;
const MVRP: u32 = 1 << 3;

// ── Flags ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct VlanFlags {
    pub reorder_headers: bool,
    pub gvrp: bool,
    pub loose_binding: bool,
    pub mvrp: bool,
}

impl VlanFlags {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            reorder_headers: bits & REORDER_HEADERS != 0,
            gvrp: bits & GVRP != 0,
            loose_binding: bits & LOOSE_BINDING != 0,
            mvrp: bits & MVRP != 0,
        }
    }

    pub fn bits(self) -> u32 {
        [
            (self.reorder_headers, REORDER_HEADERS),
            (self.gvrp, GVRP),
            (self.loose_binding, LOOSE_BINDING),
            (self.mvrp, MVRP),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// NetworkManager names of the set flags, lowest bit first.
    pub fn names(self) -> Vec<&'static str> {
        [
            (self.reorder_headers, "REORDER_HEADERS"),
            (self.gvrp, "GVRP"),
            (self.loose_binding, "LOOSE_BINDING"),
            (self.mvrp, "MVRP"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

impl From<u32> for VlanFlags {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<VlanFlags> for u32 {
    fn from(flags: VlanFlags) -> Self {
        flags.bits()
    }
}

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanConfiguration {
    pub parent_interface: String,
    pub id: u16,
    #[serde(default)]
    pub flags: VlanFlags,
}

impl VlanConfiguration {
    pub fn new(parent_interface: impl Into<String>, id: u16, flags: VlanFlags) -> Result<Self> {
        if id > MAX_VLAN_ID {
            return Err(CodecError::InvalidInteger {
                field: "vlan.id".into(),
                value: id.to_string(),
            });
        }
        Ok(Self {
            parent_interface: parent_interface.into(),
            id,
            flags,
        })
    }
}

impl NetworkManagerEntity for VlanConfiguration {
    fn json_deserialize(json: Value) -> Result<Self> {
        let wire: Self = serde_json::from_value(json)?;
        Self::new(wire.parent_interface, wire.id, wire.flags)
    }

    fn nmcli_deserialize(config: &NmCliConfig) -> Result<Self> {
        let parent = config.require(SECTION, "parent")?;
        let id = parse_int("vlan.id", config.require(SECTION, "id")?)?;
        let flags = match config.get_non_empty(SECTION, "flags") {
            Some(raw) => VlanFlags::from_bits(parse_leading_int("vlan.flags", raw)?),
            None => VlanFlags::default(),
        };
        Self::new(parent, id, flags)
    }

    fn nmcli_serialize(&self) -> NmCliArgs {
        let mut args = NmCliArgs::new();
        args.push(SECTION, "parent", self.parent_interface.as_str())
            .push(SECTION, "id", self.id.to_string())
            .push(SECTION, "flags", self.flags.bits().to_string());
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
    fn all_sixteen_combinations_round_trip() {
        for bits in 0..16u32 {
            let flags = VlanFlags::from_bits(bits);
            assert_eq!(flags.bits(), bits);
            assert_eq!(VlanFlags::from_bits(flags.bits()), flags);
        }
    }

    #[test]
    fn bit_layout() {
        let flags = VlanFlags::from_bits(0b0101);
        assert!(flags.reorder_headers);
        assert!(!flags.gvrp);
        assert!(flags.loose_binding);
        assert!(!flags.mvrp);
        assert_eq!(flags.names(), ["REORDER_HEADERS", "LOOSE_BINDING"]);
    }

    #[test]
    fn upper_bits_are_dropped() {
        assert_eq!(VlanFlags::from_bits(0xF0 | MVRP).bits(), MVRP);
    }

    #[test]
    fn flags_json_is_camel_case() {
        let flags = VlanFlags::from_bits(REORDER_HEADERS | MVRP);
        assert_eq!(
            serde_json::to_value(flags).unwrap(),
            json!({"reorderHeaders": true, "gvrp": false, "looseBinding": false, "mvrp": true})
        );
    }

    #[test]
    fn nmcli_with_flag_names() {
        let vlan = VlanConfiguration::from_nmcli_str(
            "vlan.parent:eth0\nvlan.id:100\nvlan.flags:5 (REORDER_HEADERS, LOOSE_BINDING)\nvlan.ingress-priority-map:",
        )
        .unwrap();
        assert_eq!(vlan.parent_interface, "eth0");
        assert_eq!(vlan.id, 100);
        assert_eq!(vlan.flags.bits(), 5);
        assert_eq!(
            vlan.nmcli_serialize().to_string(),
            "vlan.parent \"eth0\" vlan.id \"100\" vlan.flags \"5\" "
        );
    }

    #[test]
    fn json_round_trip_and_id_limit() {
        let json = json!({
            "parentInterface": "eth1",
            "id": 42,
            "flags": {"reorderHeaders": false, "gvrp": true, "looseBinding": false, "mvrp": false}
        });
        let vlan = VlanConfiguration::json_deserialize(json.clone()).unwrap();
        assert_eq!(vlan.json_serialize().unwrap(), json);

        let too_big = json!({"parentInterface": "eth1", "id": 4095});
        assert!(VlanConfiguration::json_deserialize(too_big).is_err());
        assert!(VlanConfiguration::from_nmcli_str("vlan.parent:eth0").is_err());
    }
}
