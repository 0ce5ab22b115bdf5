//! Clap derive structures for the `gwnet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gwnet -- convert gateway network settings between JSON and nmcli
#[derive(Debug, Parser)]
#[command(
    name = "gwnet",
    version,
    about = "Convert IQRF gateway network settings between JSON and nmcli",
    long_about = "Translates NetworkManager connection profiles between the JSON view \
        used by the gateway web UI, the terse output of `nmcli -t connection show`, \
        and the arguments of `nmcli connection add|modify`.\n\n\
        gwnet never runs nmcli itself; it reads files or stdin and prints the \
        converted form or the command line to run.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "GWNET_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "GWNET_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Pretty table
    Table,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert connection profiles and render nmcli commands
    #[command(alias = "conn", alias = "c")]
    Connection(ConnectionArgs),

    /// Convert VLAN settings
    Vlan(VlanArgs),

    /// Render WireGuard tunnels as wg commands or wg-quick configs
    #[command(alias = "wg")]
    Wireguard(WireguardArgs),

    /// Inspect and edit the gwnet configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Input Arguments ───────────────────────────────────────────

/// Where to read the document from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file (`-` or omitted reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

// ── Connection ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    #[command(subcommand)]
    pub command: ConnectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionCommand {
    /// Decode `nmcli -t -s connection show <uuid>` output into JSON
    Decode(InputArgs),

    /// Encode a JSON profile into nmcli properties
    Encode {
        #[command(flatten)]
        input: InputArgs,

        /// Print a complete `nmcli connection add` command
        #[arg(long, conflicts_with = "modify")]
        add: bool,

        /// Print a complete `nmcli connection modify <uuid>` command
        #[arg(long)]
        modify: bool,
    },

    /// Parse `nmcli -t -f NAME,UUID,TYPE,DEVICE,ACTIVE,STATE connection show` output
    #[command(alias = "ls")]
    List(InputArgs),

    /// Print the nmcli command line for a connection operation
    Command {
        /// Operation to render
        action: ConnectionAction,

        /// Connection UUID (required for every action except `list`)
        uuid: Option<String>,

        /// Interface to activate on (`up` only)
        #[arg(long)]
        ifname: Option<String>,
    },

    /// Extract the new connection's UUID from `nmcli connection add` output
    AddedUuid(InputArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionAction {
    List,
    Show,
    Up,
    Down,
    Delete,
}

// ── VLAN ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// Decode `vlan.*` nmcli output into JSON
    Decode(InputArgs),

    /// Encode JSON VLAN settings into nmcli properties
    Encode(InputArgs),

    /// Explain a `vlan.flags` bitmask
    Flags {
        /// Bitmask, e.g. `5` or `5 (REORDER_HEADERS, LOOSE_BINDING)`
        value: String,
    },
}

// ── WireGuard ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WireguardArgs {
    #[command(subcommand)]
    pub command: WireguardCommand,
}

#[derive(Debug, Subcommand)]
pub enum WireguardCommand {
    /// Validate a JSON tunnel and print it normalized
    Show(InputArgs),

    /// Render a wg-quick configuration file
    Conf(InputArgs),

    /// Render the `wg set` command that applies the tunnel
    Wg {
        #[command(flatten)]
        input: InputArgs,

        /// Render `wg show <name>` instead
        #[arg(long, conflicts_with = "delete")]
        status: bool,

        /// Render `ip link delete dev <name>` instead
        #[arg(long)]
        delete: bool,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "defaults.output")
        key: String,

        /// Value to set
        value: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
