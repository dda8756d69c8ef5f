// ── Device OS tag ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system family of a CLI-managed device.
///
/// Parsed from the testbed's `os` string. Tags outside the known set are
/// kept verbatim in [`Other`](Self::Other) so they still show up in the
/// report, flagged as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceOs {
    Ios,
    IosXe,
    Nxos,
    IosXr,
    Asa,
    Other(String),
}

impl DeviceOs {
    /// The tag as written in testbeds and reports.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ios => "ios",
            Self::IosXe => "iosxe",
            Self::Nxos => "nxos",
            Self::IosXr => "iosxr",
            Self::Asa => "asa",
            Self::Other(tag) => tag,
        }
    }

    /// Whether the normalizer has an extraction strategy for this OS.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for DeviceOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DeviceOs {
    fn from(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_ascii_lowercase().as_str() {
            "ios" => Self::Ios,
            "iosxe" => Self::IosXe,
            "nxos" => Self::Nxos,
            "iosxr" => Self::IosXr,
            "asa" => Self::Asa,
            _ => Self::Other(tag.to_owned()),
        }
    }
}

impl From<String> for DeviceOs {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<DeviceOs> for String {
    fn from(os: DeviceOs) -> Self {
        os.as_str().to_owned()
    }
}
