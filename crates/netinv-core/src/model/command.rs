// ── Command results ──

use serde::Serialize;
use serde_json::Value;

/// Output of one command on one device.
///
/// `Parsed` when a structured parser turned the CLI text into a tree,
/// `Raw` when no parser exists or the parser found nothing usable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum CommandResult {
    Parsed(Value),
    Raw(String),
}

/// Which [`CommandResult`] variant an extraction strategy accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Parsed,
    Raw,
    /// Parsed, or a raw capture that came back empty.
    ParsedOrEmpty,
}

impl PayloadKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Parsed => "structured",
            Self::Raw => "raw text",
            Self::ParsedOrEmpty => "structured or empty",
        }
    }
}

impl CommandResult {
    pub fn as_parsed(&self) -> Option<&Value> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Parsed(_) => None,
        }
    }

    /// The empty-output sentinel: a raw capture with nothing in it.
    pub fn is_empty_raw(&self) -> bool {
        matches!(self, Self::Raw(text) if text.trim().is_empty())
    }

    pub fn satisfies(&self, kind: PayloadKind) -> bool {
        match kind {
            PayloadKind::Parsed => matches!(self, Self::Parsed(_)),
            PayloadKind::Raw => matches!(self, Self::Raw(_)),
            PayloadKind::ParsedOrEmpty => {
                matches!(self, Self::Parsed(_)) || self.is_empty_raw()
            }
        }
    }
}
