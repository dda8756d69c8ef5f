// ── APIC response shapes ──
//
// Managed objects arrive as `{ "<class>": { "attributes": { ... } } }`
// inside the `imdata` array. Only the attributes the inventory needs are
// typed; the rest are ignored.

use serde::Deserialize;
use serde_json::Value;

/// The `{ totalCount, imdata }` envelope around every APIC query.
#[derive(Debug, Deserialize)]
pub struct ImData<T> {
    /// Object count. APIC sends it as a string (`"1"`).
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<Value>,
    #[serde(default = "Vec::new")]
    pub imdata: Vec<T>,
}

impl<T> ImData<T> {
    /// `totalCount` as text, whether the controller sent a string or a number.
    pub fn total_count_text(&self) -> Option<String> {
        match self.total_count.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Attributes<T> {
    pub attributes: T,
}

#[derive(Debug, Deserialize)]
pub struct AaaLoginObject {
    #[serde(rename = "aaaLogin")]
    pub aaa_login: Attributes<AaaLogin>,
}

#[derive(Debug, Deserialize)]
pub struct AaaLogin {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct FabricNodeObject {
    #[serde(rename = "fabricNode")]
    pub fabric_node: Attributes<FabricNode>,
}

/// One node of the fabric, as listed by `fabricNode.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FabricNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    /// Distinguished name, e.g. `topology/pod-1/node-101`.
    #[serde(default)]
    pub dn: String,
}

#[derive(Debug, Deserialize)]
pub struct FirmwareRunningObject {
    #[serde(rename = "firmwareRunning")]
    pub firmware_running: Attributes<FirmwareRunning>,
}

#[derive(Debug, Deserialize)]
pub struct FirmwareRunning {
    #[serde(default)]
    pub version: String,
}

/// Outcome of a running-firmware query that the controller answered with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFirmware {
    /// Exactly one `firmwareRunning` object came back.
    Running(String),
    /// The controller reported a count other than one.
    Ambiguous { total_count: Option<String> },
}
