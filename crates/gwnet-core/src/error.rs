// ── Codec error types ──
//
// Every decoder returns `CodecError`. Low-level failures (address literals,
// enum values, integers) bubble up unchanged to the entity being decoded;
// only `ConnectionDetail` downgrades a failing Wi-Fi security block.

use std::convert::Infallible;

use thiserror::Error;

/// Unified error type for the codec crate.
#[derive(Debug, Error)]
pub enum CodecError {
    // ── Malformed input ──────────────────────────────────────────────
    #[error("invalid {family} address '{value}'")]
    InvalidAddress { family: &'static str, value: String },

    #[error("invalid {family} prefix '{value}' (maximum is {max})")]
    InvalidPrefix {
        family: &'static str,
        value: String,
        max: u8,
    },

    #[error("invalid UUID '{value}'")]
    InvalidUuid {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("invalid integer for {field}: '{value}'")]
    InvalidInteger { field: String, value: String },

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("malformed nmcli row: '{line}'")]
    MalformedRow { line: String },

    #[error("malformed nmcli connection list row: '{line}'")]
    MalformedListRow { line: String },

    // ── Missing data ─────────────────────────────────────────────────
    #[error("missing nmcli property {section}.{key}")]
    MissingProperty { section: String, key: String },

    #[error("missing JSON field '{field}'")]
    MissingField { field: &'static str },

    // ── Aggregate invariants ─────────────────────────────────────────
    #[error("{link} settings cannot be attached to a {connection_type} connection")]
    LinkMismatch {
        link: &'static str,
        connection_type: String,
    },

    #[error("no connection UUID found in nmcli output")]
    UuidNotFound,

    // ── JSON ─────────────────────────────────────────────────────────
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn missing(section: &str, key: &str) -> Self {
        Self::MissingProperty {
            section: section.to_owned(),
            key: key.to_owned(),
        }
    }
}

impl From<Infallible> for CodecError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
