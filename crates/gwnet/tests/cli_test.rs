//! Integration tests for the `gwnet` CLI binary.
//!
//! Every test feeds documents through files or stdin; nothing here needs
//! NetworkManager.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const UUID: &str = "25ab1b06-2a86-40a9-950f-1c576ddcd35a";

const ETH0_NMCLI: &str = "\
connection.id:eth0
connection.uuid:25ab1b06-2a86-40a9-950f-1c576ddcd35a
connection.type:802-3-ethernet
connection.interface-name:eth0
connection.autoconnect:yes
ipv4.method:manual
ipv4.addresses:10.1.1.1/16
ipv4.gateway:10.1.0.1
ipv4.dns:10.1.1.1,1.1.1.1
ipv6.method:ignore
";

const ETH0_JSON: &str = r#"{
  "name": "eth0",
  "uuid": "25ab1b06-2a86-40a9-950f-1c576ddcd35a",
  "type": "802-3-ethernet",
  "interface": "eth0",
  "autoConnect": {"enabled": true, "priority": 0, "retries": -1},
  "ipv4": {
    "method": "manual",
    "addresses": [{"address": "10.1.1.1", "mask": "255.255.0.0"}],
    "gateway": "10.1.0.1",
    "dns": [{"address": "10.1.1.1"}, {"address": "1.1.1.1"}]
  },
  "ipv6": {"method": "ignore", "addresses": [], "gateway": null, "dns": []}
}"#;

const TUNNEL_JSON: &str = r#"{
  "name": "wg0",
  "privateKey": "cHJpdmF0ZQ==",
  "port": 51820,
  "ipv4": "10.8.0.1",
  "ipv4Prefix": 24,
  "peers": [{
    "publicKey": "cHVibGlj",
    "keepalive": 25,
    "endpoint": "vpn.example.org",
    "port": 51820,
    "allowedIPs": {"ipv4": [{"address": "10.8.0.0", "prefix": 24}], "ipv6": []}
  }]
}"#;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `gwnet` binary with env isolation.
///
/// Clears all `GWNET_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn gwnet_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gwnet");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("GWNET_OUTPUT")
        .env_remove("GWNET_CONFIG")
        .env_remove("GWNET_DEFAULTS__OUTPUT")
        .env_remove("GWNET_DEFAULTS__LOG_LEVEL")
        .env_remove("GWNET_NMCLI__BINARY")
        .env_remove("GWNET_NMCLI__SHOW_SECRETS")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = gwnet_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("connection")
            .and(predicate::str::contains("vlan"))
            .and(predicate::str::contains("wireguard"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gwnet"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = gwnet_cmd(home.path())
        .args(["--output", "xml", "connection", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("possible values"), "{text}");
}

// ── connection ──────────────────────────────────────────────────────

#[test]
fn test_connection_decode_from_stdin() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "decode"])
        .write_stdin(ETH0_NMCLI)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""mask": "255.255.0.0""#)
                .and(predicate::str::contains(r#""gateway": "10.1.0.1""#))
                .and(predicate::str::contains(r#""method": "ignore""#)),
        );
}

#[test]
fn test_connection_decode_from_file_as_table() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("eth0.conf");
    std::fs::write(&file, ETH0_NMCLI).unwrap();
    gwnet_cmd(home.path())
        .args(["-o", "table", "connection", "decode"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("manual 10.1.1.1/16 via 10.1.0.1"));
}

#[test]
fn test_connection_decode_rejects_garbage() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "decode"])
        .write_stdin("this is not nmcli output\n")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Could not decode nmcli connection output"));
}

#[test]
fn test_connection_encode_properties() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "encode", "-"])
        .write_stdin(ETH0_JSON)
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with(r#"connection.id "eth0" connection.type "802-3-ethernet""#)
                .and(predicate::str::contains(r#"ipv4.addresses "10.1.1.1/16""#))
                .and(predicate::str::contains(r#"ipv4.dns "10.1.1.1,1.1.1.1""#)),
        );
}

#[test]
fn test_connection_encode_modify_command() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "encode", "--modify"])
        .write_stdin(ETH0_JSON)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "nmcli -t connection modify {UUID} connection.id \"eth0\""
        )));
}

#[test]
fn test_connection_encode_bad_prefix() {
    let home = TempDir::new().unwrap();
    let json = ETH0_JSON.replace(r#""mask": "255.255.0.0""#, r#""prefix": 40"#);
    gwnet_cmd(home.path())
        .args(["connection", "encode"])
        .write_stdin(json)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("connection profile JSON"));
}

#[test]
fn test_connection_encode_invalid_json() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "encode"])
        .write_stdin("{ not json")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid JSON input"));
}

#[test]
fn test_connection_list_plain() {
    let home = TempDir::new().unwrap();
    let listing = format!(
        "eth0:{UUID}:802-3-ethernet:eth0:yes:activated\n\
         LTE:a1b2c3d4-e5f6-4789-8abc-def012345678:gsm::no:\n"
    );
    gwnet_cmd(home.path())
        .args(["-o", "plain", "connection", "list"])
        .write_stdin(listing)
        .assert()
        .success()
        .stdout(format!("{UUID}\na1b2c3d4-e5f6-4789-8abc-def012345678\n"));
}

#[test]
fn test_connection_command_show_uses_secrets_setting() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "command", "show", UUID])
        .assert()
        .success()
        .stdout(format!("nmcli -t -s connection show {UUID}\n"));

    gwnet_cmd(home.path())
        .env("GWNET_NMCLI__SHOW_SECRETS", "false")
        .args(["connection", "command", "show", UUID])
        .assert()
        .success()
        .stdout(format!("nmcli -t connection show {UUID}\n"));
}

#[test]
fn test_connection_command_requires_uuid() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "command", "down"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required for `down`"));
}

#[test]
fn test_connection_added_uuid() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["connection", "added-uuid"])
        .write_stdin(format!("Connection 'eth0' ({UUID}) successfully added.\n"))
        .assert()
        .success()
        .stdout(format!("{UUID}\n"));
}

// ── vlan ────────────────────────────────────────────────────────────

#[test]
fn test_vlan_flags_plain() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["-o", "plain", "vlan", "flags", "5 (REORDER_HEADERS, LOOSE_BINDING)"])
        .assert()
        .success()
        .stdout("REORDER_HEADERS,LOOSE_BINDING\n");
}

#[test]
fn test_vlan_decode_and_encode() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["-o", "json-compact", "vlan", "decode"])
        .write_stdin("vlan.parent:eth0\nvlan.id:100\nvlan.flags:1 (REORDER_HEADERS)\n")
        .assert()
        .success()
        .stdout(
            "{\"parentInterface\":\"eth0\",\"id\":100,\"flags\":{\"reorderHeaders\":true,\"gvrp\":false,\"looseBinding\":false,\"mvrp\":false}}\n",
        );

    gwnet_cmd(home.path())
        .args(["vlan", "encode"])
        .write_stdin(r#"{"parentInterface": "eth0", "id": 100, "flags": {"reorderHeaders": true, "gvrp": false, "looseBinding": true, "mvrp": false}}"#)
        .assert()
        .success()
        .stdout("vlan.parent \"eth0\" vlan.id \"100\" vlan.flags \"5\"\n");
}

// ── wireguard ───────────────────────────────────────────────────────

#[test]
fn test_wireguard_conf() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["wireguard", "conf"])
        .write_stdin(TUNNEL_JSON)
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("[Interface]\nPrivateKey = cHJpdmF0ZQ==\nListenPort = 51820\n")
                .and(predicate::str::contains("Address = 10.8.0.1/24"))
                .and(predicate::str::contains("Endpoint = vpn.example.org:51820"))
                .and(predicate::str::contains("AllowedIPs = 10.8.0.0/24")),
        );
}

#[test]
fn test_wireguard_wg_commands() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["wg", "wg"])
        .write_stdin(TUNNEL_JSON)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "wg set wg0 private-key cHJpdmF0ZQ== listen-port 51820 peer cHVibGlj",
        ));

    gwnet_cmd(home.path())
        .args(["wg", "wg", "--delete"])
        .write_stdin(TUNNEL_JSON)
        .assert()
        .success()
        .stdout("ip link delete dev wg0\n");
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""binary": "nmcli""#));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("gwnet.toml");

    gwnet_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "nmcli.binary", "/usr/bin/nmcli"])
        .assert()
        .success();
    assert!(std::fs::read_to_string(&config).unwrap().contains("/usr/bin/nmcli"));

    gwnet_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["connection", "command", "list"])
        .assert()
        .success()
        .stdout("/usr/bin/nmcli -t -f NAME,UUID,TYPE,DEVICE,ACTIVE,STATE connection show\n");
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    gwnet_cmd(home.path())
        .arg("--config")
        .arg(home.path().join("gwnet.toml"))
        .args(["config", "set", "profiles.home", "x"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_default_output_from_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("gwnet.toml");
    std::fs::write(&config, "[defaults]\noutput = \"yaml\"\n").unwrap();
    gwnet_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["connection", "decode"])
        .write_stdin(ETH0_NMCLI)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: eth0"));
}

#[test]
fn test_config_invalid_default_output() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("gwnet.toml");
    std::fs::write(&config, "[defaults]\noutput = \"xml\"\n").unwrap();
    gwnet_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .args(["connection", "list"])
        .write_stdin("")
        .assert()
        .code(5);
}
