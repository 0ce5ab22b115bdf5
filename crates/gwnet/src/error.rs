//! CLI error types with miette diagnostics.
//!
//! Wraps `CodecError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use gwnet_config::ConfigError;
use gwnet_core::CodecError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 4;
    pub const CONFIG: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Could not decode {what}")]
    #[diagnostic(
        code(gwnet::decode),
        help("{hint}")
    )]
    Decode {
        what: &'static str,
        hint: &'static str,
        #[source]
        source: CodecError,
    },

    #[error("Invalid JSON input: {0}")]
    #[diagnostic(code(gwnet::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not read {path}")]
    #[diagnostic(code(gwnet::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gwnet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error")]
    #[diagnostic(
        code(gwnet::config),
        help(
            "Inspect the resolved settings with: gwnet config show\n\
             Config file: {path}"
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(gwnet::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Wrap a codec failure with a description of the input it was decoding.
    pub fn decode(what: &'static str, hint: &'static str) -> impl FnOnce(CodecError) -> Self {
        move |source| Self::Decode { what, hint, source }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Decode { .. } | Self::Json(_) | Self::Read { .. } => exit_code::INPUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } => exit_code::CONFIG,
            Self::Io(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}
