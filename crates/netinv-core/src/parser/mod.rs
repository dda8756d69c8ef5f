//! Structured parsers for device command output.
//!
//! A parser converts the text of one command on one OS into a JSON tree.
//! [`ParserRegistry`] maps `(os, command)` to a parser; a missing entry or a
//! parser that finds nothing is reported as a recoverable error so the
//! executor can fall back to raw text.

mod asa;
mod inventory;
mod ios;
mod iosxr;
mod nxos;

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::error::CoreError;
use crate::model::DeviceOs;
use crate::session::normalize_command;

pub const SHOW_VERSION: &str = "show version";
pub const SHOW_INVENTORY: &str = "show inventory";

/// Why a parser produced no tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The parser ran but none of its patterns matched.
    #[error("no data matched the parser schema")]
    SchemaEmpty,
}

/// A parser for one command's text output.
pub type ParseFn = fn(&str) -> Result<Value, ParseError>;

/// Lookup table from `(os, command)` to a structured parser.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    parsers: HashMap<(DeviceOs, String), ParseFn>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParserRegistry {
    /// A registry with no parsers: every command falls back to raw text.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// The parsers shipped with netinv.
    ///
    /// ASA `show version` is deliberately absent; its fields are pulled from
    /// the raw text.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for os in [DeviceOs::Ios, DeviceOs::IosXe] {
            registry.register(os.clone(), SHOW_VERSION, ios::parse_show_version);
            registry.register(os, SHOW_INVENTORY, ios::parse_show_inventory);
        }
        registry.register(DeviceOs::Nxos, SHOW_VERSION, nxos::parse_show_version);
        registry.register(DeviceOs::Nxos, SHOW_INVENTORY, nxos::parse_show_inventory);
        registry.register(DeviceOs::IosXr, SHOW_VERSION, iosxr::parse_show_version);
        registry.register(DeviceOs::IosXr, SHOW_INVENTORY, iosxr::parse_show_inventory);
        registry.register(DeviceOs::Asa, SHOW_INVENTORY, asa::parse_show_inventory);
        registry
    }

    /// Add or replace the parser for `(os, command)`.
    pub fn register(&mut self, os: DeviceOs, command: &str, parser: ParseFn) {
        self.parsers.insert((os, normalize_command(command)), parser);
    }

    pub fn has_parser(&self, os: &DeviceOs, command: &str) -> bool {
        self.parsers
            .contains_key(&(os.clone(), normalize_command(command)))
    }

    /// Parse `output` of `command` from `device`.
    ///
    /// Returns [`CoreError::ParserMissing`] when no parser is registered and
    /// [`CoreError::SchemaEmpty`] when the parser found nothing.
    pub fn parse(
        &self,
        device: &str,
        os: &DeviceOs,
        command: &str,
        output: &str,
    ) -> Result<Value, CoreError> {
        let Some(parser) = self.parsers.get(&(os.clone(), normalize_command(command))) else {
            return Err(CoreError::ParserMissing {
                device: device.to_owned(),
                os: os.to_string(),
                command: command.to_owned(),
            });
        };

        match parser(output) {
            Ok(Value::Object(map)) if map.is_empty() => Err(CoreError::SchemaEmpty {
                device: device.to_owned(),
                command: command.to_owned(),
            }),
            Ok(tree) => Ok(tree),
            Err(ParseError::SchemaEmpty) => Err(CoreError::SchemaEmpty {
                device: device.to_owned(),
                command: command.to_owned(),
            }),
        }
    }
}
