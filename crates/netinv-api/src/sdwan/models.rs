// ── vManage response shapes ──

use serde::Deserialize;

/// The `{ "data": [...] }` envelope used by `/dataservice` listings.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// One device known to the WAN controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SdwanDevice {
    #[serde(rename = "host-name", default)]
    pub host_name: String,
    #[serde(rename = "device-model", default)]
    pub device_model: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Boot time in epoch milliseconds.
    #[serde(rename = "uptime-date", default)]
    pub uptime_date: Option<i64>,
    #[serde(rename = "board-serial", default)]
    pub board_serial: Option<String>,
}
