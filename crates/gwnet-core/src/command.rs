// ── nmcli command builder ──
//
// Every NetworkManager operation is a typed `NmCliCommand`. Rendering stops
// at an argv vector or a shell line; spawning the process, timeouts and
// retries belong to the caller.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::entity::NetworkManagerEntity;
use crate::error::{CodecError, Result};
use crate::model::ConnectionDetail;
use crate::model::connection::parse_uuid;
use crate::nmcli::NmCliArgs;

/// Columns requested for connection listings, in the order
/// [`Connection::from_nmcli_row`](crate::model::Connection::from_nmcli_row) expects.
pub const LIST_FIELDS: &str = "NAME,UUID,TYPE,DEVICE,ACTIVE,STATE";

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("UUID pattern is valid")
});

/// All nmcli operations on connection profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmCliCommand {
    // ── Read ─────────────────────────────────────────────────────────
    List,
    Show {
        uuid: Uuid,
        show_secrets: bool,
    },

    // ── Write ────────────────────────────────────────────────────────
    Add {
        args: NmCliArgs,
    },
    Modify {
        uuid: Uuid,
        args: NmCliArgs,
    },
    Delete {
        uuid: Uuid,
    },

    // ── Activation ───────────────────────────────────────────────────
    Up {
        uuid: Uuid,
        interface: Option<String>,
    },
    Down {
        uuid: Uuid,
    },
}

impl NmCliCommand {
    pub fn add(detail: &ConnectionDetail) -> Self {
        Self::Add {
            args: detail.nmcli_serialize(),
        }
    }

    /// Rewrite the profile identified by the detail's own UUID.
    pub fn modify(detail: &ConnectionDetail) -> Self {
        Self::Modify {
            uuid: detail.uuid(),
            args: detail.nmcli_serialize(),
        }
    }

    fn prefix(&self) -> Vec<String> {
        let words: &[&str] = match self {
            Self::List => &["-t", "-f", LIST_FIELDS, "connection", "show"],
            Self::Show {
                show_secrets: true, ..
            } => &["-t", "-s", "connection", "show"],
            Self::Show { .. } => &["-t", "connection", "show"],
            Self::Add { .. } => &["-t", "connection", "add"],
            Self::Modify { .. } => &["-t", "connection", "modify"],
            Self::Delete { .. } => &["-t", "connection", "delete"],
            Self::Up { .. } => &["-t", "connection", "up"],
            Self::Down { .. } => &["-t", "connection", "down"],
        };
        let mut argv: Vec<String> = words.iter().map(|w| (*w).to_owned()).collect();
        match self {
            Self::List | Self::Add { .. } => {}
            Self::Show { uuid, .. }
            | Self::Modify { uuid, .. }
            | Self::Delete { uuid }
            | Self::Down { uuid }
            | Self::Up { uuid, .. } => argv.push(uuid.to_string()),
        }
        if let Self::Up {
            interface: Some(interface),
            ..
        } = self
        {
            argv.extend(["ifname".to_owned(), interface.clone()]);
        }
        argv
    }

    fn properties(&self) -> Option<&NmCliArgs> {
        match self {
            Self::Add { args } | Self::Modify { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Arguments after the program name.
    pub fn args(&self) -> Vec<String> {
        let mut argv = self.prefix();
        if let Some(properties) = self.properties() {
            argv.extend(properties.to_argv());
        }
        argv
    }

    /// Full argv with `program` (usually `nmcli`) first.
    pub fn to_argv(&self, program: &str) -> Vec<String> {
        let mut argv = vec![program.to_owned()];
        argv.extend(self.args());
        argv
    }

    /// Shell-pasteable command line. Property values are double-quoted.
    pub fn to_shell(&self, program: &str) -> String {
        let mut line = program.to_owned();
        for word in self.prefix() {
            line.push(' ');
            line.push_str(&word);
        }
        if let Some(properties) = self.properties().filter(|p| !p.is_empty()) {
            line.push(' ');
            line.push_str(properties.to_string().trim_end());
        }
        line
    }
}

/// Extract the UUID from `nmcli connection add` output, e.g.
/// `Connection 'lte' (2f1f...) successfully added.`
pub fn parse_added_uuid(stdout: &str) -> Result<Uuid> {
    let found = UUID_PATTERN
        .find(stdout)
        .ok_or(CodecError::UuidNotFound)?;
    parse_uuid(found.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ConnectionType;

    const UUID: &str = "25ab1b06-2a86-40a9-950f-1c576ddcd35a";

    fn uuid() -> Uuid {
        UUID.parse().unwrap()
    }

    #[test]
    fn list_and_show() {
        assert_eq!(
            NmCliCommand::List.to_argv("nmcli"),
            ["nmcli", "-t", "-f", LIST_FIELDS, "connection", "show"]
        );
        let show = NmCliCommand::Show {
            uuid: uuid(),
            show_secrets: true,
        };
        assert_eq!(show.args(), ["-t", "-s", "connection", "show", UUID]);
        let show = NmCliCommand::Show {
            uuid: uuid(),
            show_secrets: false,
        };
        assert_eq!(show.to_shell("nmcli"), format!("nmcli -t connection show {UUID}"));
    }

    #[test]
    fn up_with_interface() {
        let up = NmCliCommand::Up {
            uuid: uuid(),
            interface: Some("eth0".into()),
        };
        assert_eq!(up.args(), ["-t", "connection", "up", UUID, "ifname", "eth0"]);
        let down = NmCliCommand::Down { uuid: uuid() };
        assert_eq!(down.args(), ["-t", "connection", "down", UUID]);
        let delete = NmCliCommand::Delete { uuid: uuid() };
        assert_eq!(delete.args(), ["-t", "connection", "delete", UUID]);
    }

    #[test]
    fn modify_renders_properties() {
        let detail = ConnectionDetail::new("eth0", uuid(), ConnectionType::Ethernet, "eth0");
        let modify = NmCliCommand::modify(&detail);
        let argv = modify.args();
        assert_eq!(&argv[..4], ["-t", "connection", "modify", UUID]);
        assert_eq!(&argv[4..6], ["connection.id", "eth0"]);

        let shell = modify.to_shell("/usr/bin/nmcli");
        assert!(shell.starts_with(&format!(
            "/usr/bin/nmcli -t connection modify {UUID} connection.id \"eth0\" connection.type \"802-3-ethernet\""
        )));
        assert!(!shell.ends_with(' '));
    }

    #[test]
    fn add_has_no_uuid() {
        let detail = ConnectionDetail::new("eth0", uuid(), ConnectionType::Ethernet, "eth0");
        let argv = NmCliCommand::add(&detail).args();
        assert_eq!(&argv[..3], ["-t", "connection", "add"]);
        assert!(!argv.iter().any(|a| a == UUID));
    }

    #[test]
    fn added_uuid_is_extracted() {
        let stdout = format!("Connection 'lte' ({UUID}) successfully added.\n");
        assert_eq!(parse_added_uuid(&stdout).unwrap(), uuid());
        assert!(matches!(
            parse_added_uuid("Error: failed"),
            Err(CodecError::UuidNotFound)
        ));
    }
}
