//! User-facing messages and the dictionary that renders them

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::domain::DomainError;

/// Message key used when a failure carries no client-safe message.
pub const UNEXPECTED_ERROR: &str = "error.unexpected-error";
/// Message key for argv[0] not resolving to any command.
pub const COMMAND_NOT_FOUND: &str = "error.cli.command-not-found";
/// Message key for a command that resolved to something not executable.
pub const INVALID_COMMAND: &str = "error.cli.invalid-command";

/// A message addressed by dictionary key, with named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryMessage {
    key: String,
    params: BTreeMap<String, String>,
}

impl DictionaryMessage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// Client-safe message attached to a failure.
///
/// Plain strings convert into a [`DictionaryMessage`] keyed by the string;
/// use `Literal` for text that must be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Dictionary(DictionaryMessage),
    Literal(String),
}

impl From<DictionaryMessage> for Message {
    fn from(msg: DictionaryMessage) -> Self {
        Message::Dictionary(msg)
    }
}

impl From<&str> for Message {
    fn from(key: &str) -> Self {
        Message::Dictionary(DictionaryMessage::new(key))
    }
}

impl From<String> for Message {
    fn from(key: String) -> Self {
        Message::Dictionary(DictionaryMessage::new(key))
    }
}

/// Key to template mapping; templates reference parameters as `{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Default for Dictionary {
    /// Dictionary with the built-in framework messages.
    fn default() -> Self {
        let mut dict = Self::empty();
        dict.insert(UNEXPECTED_ERROR, "An unexpected error occurred");
        dict.insert(COMMAND_NOT_FOUND, "Command not found: {command}");
        dict.insert(INVALID_COMMAND, "Invalid command: {command}");
        dict
    }
}

impl Dictionary {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build from a TOML table. Nested tables flatten into dotted keys, so
    /// `[error.cli] invalid-command = ".."` and
    /// `"error.cli.invalid-command" = ".."` are equivalent.
    pub fn from_table(table: &toml::Table) -> Result<Self, DomainError> {
        let mut dict = Self::empty();
        dict.extend_from_table("", table)?;
        Ok(dict)
    }

    fn extend_from_table(&mut self, prefix: &str, table: &toml::Table) -> Result<(), DomainError> {
        for (key, value) in table {
            let full = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                toml::Value::String(s) => {
                    self.entries.insert(full, s.clone());
                }
                toml::Value::Table(nested) => self.extend_from_table(&full, nested)?,
                other => {
                    return Err(DomainError::InvalidDictionary {
                        key: full,
                        message: format!("expected string, found {}", other.type_str()),
                    })
                }
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Overlay `other` onto self; entries in `other` win.
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, message: &Message) -> String {
        match message {
            Message::Literal(text) => text.clone(),
            Message::Dictionary(msg) => match self.get(msg.key()) {
                Some(template) => substitute(template, msg.params()),
                // unknown key: show the key, keep parameters visible
                None if msg.params().is_empty() => msg.key().to_string(),
                None => {
                    let params = msg
                        .params()
                        .iter()
                        .map(|(k, v)| format!("{k}: {v}"))
                        .join(", ");
                    format!("{} ({})", msg.key(), params)
                }
            },
        }
    }
}

fn substitute(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
