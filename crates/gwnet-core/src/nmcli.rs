// ── nmcli text codec ──
//
// Two directions, two shapes. `NmCliConfig` is the parsed form of
// `nmcli -t -s connection show <uuid>` output; `NmCliArgs` is the ordered
// list of `section.key value` pairs handed to `nmcli connection add|modify`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{CodecError, Result};

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<section>[^.:\s]+)\.(?P<key>[^:]+):(?P<value>.*)$")
        .expect("nmcli row pattern is valid")
});

/// Placeholder nmcli prints for unset values outside terse mode.
const UNSET: &str = "--";

/// Properties of one nmcli setting section, in output order.
pub type Section = IndexMap<String, String>;

// ── Parsed nmcli output ─────────────────────────────────────────────

/// Section-then-key map built from nmcli's `section.key:value` rows.
///
/// Runtime sections keep nmcli's upper-case names (`GENERAL`, `IP4`, `IP6`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NmCliConfig {
    sections: IndexMap<String, Section>,
}

impl NmCliConfig {
    /// Parse terse nmcli output. Blank lines are skipped, any other row that
    /// is not `section.key:value` is an error.
    pub fn parse(input: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in input.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let caps = ROW.captures(line).ok_or_else(|| CodecError::MalformedRow {
                line: line.to_owned(),
            })?;
            let section = &caps["section"];
            let key = &caps["key"];
            tracing::trace!(section, key, "nmcli row");
            config.insert(section, key, &unescape(&caps["value"]));
        }
        Ok(config)
    }

    /// Insert a single property, normalizing nmcli's `--` placeholder to empty.
    pub fn insert(&mut self, section: &str, key: &str, value: &str) {
        let value = if value == UNSET { "" } else { value };
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Property value, or `""` when the row is absent.
    pub fn get_or_empty(&self, section: &str, key: &str) -> &str {
        self.get(section, key).unwrap_or_default()
    }

    /// Property value, `None` when absent or empty.
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|v| !v.is_empty())
    }

    /// Property value that must be present (it may still be empty).
    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        self.get(section, key)
            .ok_or_else(|| CodecError::missing(section, key))
    }

    /// Values of indexed runtime keys (`ADDRESS[1]`, `ADDRESS[2]`, ...) in
    /// index order, skipping empty ones.
    pub fn indexed(&self, section: &str, key: &str) -> Vec<&str> {
        let Some(props) = self.section(section) else {
            return Vec::new();
        };
        let mut found: Vec<(u32, &str)> = props
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .filter_map(|(k, v)| {
                let index = k
                    .strip_prefix(key)?
                    .strip_prefix('[')?
                    .strip_suffix(']')?
                    .parse()
                    .ok()?;
                Some((index, v.as_str()))
            })
            .collect();
        found.sort_by_key(|(index, _)| *index);
        found.into_iter().map(|(_, v)| v).collect()
    }
}

impl FromStr for NmCliConfig {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ── Arguments for nmcli ─────────────────────────────────────────────

/// Ordered `section.key value` pairs for `nmcli connection add|modify`.
///
/// The `Display` form is `section.key "value" ` per pair, shell-quoted.
/// [`NmCliArgs::to_argv`] gives the same pairs unquoted for direct spawning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NmCliArgs {
    pairs: Vec<(String, String)>,
}

impl NmCliArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: &str, key: &str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((format!("{section}.{key}"), value.into()));
        self
    }

    /// Move every pair of `other` to the end of `self`.
    pub fn append(&mut self, mut other: NmCliArgs) -> &mut Self {
        self.pairs.append(&mut other.pairs);
        self
    }

    /// Look up a value by its full `section.key` property name.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flatten into `[property, value, property, value, ...]`.
    pub fn to_argv(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect()
    }
}

impl fmt::Display for NmCliArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (property, value) in &self.pairs {
            write!(f, "{property} \"{}\" ", shell_escape(value))?;
        }
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Undo nmcli's terse-mode escaping of `:` and `\`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == ':' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Split a terse multi-column row (`nmcli -t -f A,B,C ...`) on unescaped
/// colons, unescaping `\:` and `\\` inside fields.
pub(crate) fn split_terse_fields(line: &str) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (':' | '\\')) => push_char(&mut fields, next),
                Some(other) => {
                    push_char(&mut fields, '\\');
                    push_char(&mut fields, other);
                }
                None => push_char(&mut fields, '\\'),
            },
            ':' => fields.push(String::new()),
            other => push_char(&mut fields, other),
        }
    }
    fields
}

fn push_char(fields: &mut [String], c: char) {
    if let Some(last) = fields.last_mut() {
        last.push(c);
    }
}

/// Escape the characters that stay special inside POSIX double quotes.
fn shell_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split an nmcli list value on commas and/or whitespace.
pub(crate) fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|piece| !piece.is_empty())
}

/// Parse a base-10 integer property.
pub(crate) fn parse_int<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidInteger {
            field: field.to_owned(),
            value: value.to_owned(),
        })
}

/// Parse the leading integer of values such as `5 (REORDER_HEADERS, LOOSE_BINDING)`.
pub(crate) fn parse_leading_int<T: FromStr>(field: &str, value: &str) -> Result<T> {
    let token = value.split_whitespace().next().unwrap_or_default();
    parse_int(field, token).map_err(|_| CodecError::InvalidInteger {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

/// Optional integer property: absent or empty rows yield `default`.
pub(crate) fn int_or<T: FromStr>(
    config: &NmCliConfig,
    section: &str,
    key: &str,
    default: T,
) -> Result<T> {
    match config.get_non_empty(section, key) {
        Some(value) => parse_int(&format!("{section}.{key}"), value),
        None => Ok(default),
    }
}
