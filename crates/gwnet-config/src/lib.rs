//! Configuration for the `gwnet` command-line tool.
//!
//! A TOML file in the platform config directory, overlaid with `GWNET_`
//! environment variables (`__` separates nesting levels, so
//! `GWNET_DEFAULTS__OUTPUT=yaml` sets `defaults.output`). The codec crate
//! never sees these types.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output formats the CLI can render, in the spelling used by `--output`.
pub const OUTPUT_FORMATS: &[&str] = &["json", "json-compact", "yaml", "table", "plain"];

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{key}'")]
    UnknownKey { key: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// How rendered nmcli commands look.
    #[serde(default)]
    pub nmcli: NmCliSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format when `--output` is not given.
    #[serde(default = "default_output")]
    pub output: String,

    /// Log level when neither `-v` nor `RUST_LOG` is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: default_log_level(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NmCliSettings {
    /// Program name placed in front of rendered commands.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Render `show` commands with `-s` so secrets are printed.
    #[serde(default = "default_show_secrets")]
    pub show_secrets: bool,
}

impl Default for NmCliSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            show_secrets: default_show_secrets(),
        }
    }
}

fn default_binary() -> String {
    "nmcli".into()
}
fn default_show_secrets() -> bool {
    true
}

impl Config {
    /// Set one value by its dotted key, e.g. `defaults.output`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "defaults.output" => {
                self.defaults.output = one_of("defaults.output", value, OUTPUT_FORMATS)?;
            }
            "defaults.log_level" | "defaults.log-level" => {
                self.defaults.log_level = one_of("defaults.log_level", value, LOG_LEVELS)?;
            }
            "nmcli.binary" => {
                if value.trim().is_empty() {
                    return Err(ConfigError::Validation {
                        field: "nmcli.binary".into(),
                        reason: "program name cannot be empty".into(),
                    });
                }
                self.nmcli.binary = value.into();
            }
            "nmcli.show_secrets" | "nmcli.show-secrets" => {
                self.nmcli.show_secrets = value.parse().map_err(|_| ConfigError::Validation {
                    field: "nmcli.show_secrets".into(),
                    reason: "must be 'true' or 'false'".into(),
                })?;
            }
            other => {
                return Err(ConfigError::UnknownKey { key: other.into() });
            }
        }
        Ok(())
    }
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<String, ConfigError> {
    if allowed.contains(&value) {
        Ok(value.to_owned())
    } else {
        Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "gwnet", "gwnet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gwnet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` + environment. A missing file yields the
/// defaults (still overlaid with the environment).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GWNET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories as needed.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_values() {
        let mut cfg = Config::default();
        cfg.set("defaults.output", "yaml").unwrap();
        cfg.set("nmcli.show-secrets", "false").unwrap();
        assert_eq!(cfg.defaults.output, "yaml");
        assert!(!cfg.nmcli.show_secrets);

        assert!(matches!(
            cfg.set("defaults.output", "xml"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set("nmcli.show_secrets", "maybe"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set("profiles.home", "x"),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn config_path_ends_with_file_name() {
        assert!(config_path().ends_with("config.toml"));
    }
}
