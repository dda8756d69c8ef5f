// ── Inventory records ──

use serde::{Deserialize, Serialize};

use super::os::DeviceOs;

/// Placeholder for a field that could not be collected or normalized.
pub const SENTINEL_ERROR: &str = "Error";
/// Placeholder for every field of a device whose OS has no strategy.
pub const SENTINEL_UNSUPPORTED: &str = "Unsupported";
/// Placeholder for a controller value that came back ambiguous.
pub const SENTINEL_UNKNOWN: &str = "Unknown";
/// Serial placeholder when a device returned no inventory at all.
pub const SENTINEL_NOT_AVAILABLE: &str = "N/A";

/// One row of the inventory report.
///
/// Field order is the report's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub device_name: String,
    pub device_os: String,
    pub software_version: String,
    /// Not every source can report uptime (fabric controllers can't).
    pub uptime: Option<String>,
    pub serial_number: String,
}

impl InventoryRecord {
    /// A row standing in for a device that could not be normalized.
    pub fn degraded(device_name: &str, os: &DeviceOs, sentinel: &str) -> Self {
        Self {
            device_name: device_name.to_owned(),
            device_os: os.to_string(),
            software_version: sentinel.to_owned(),
            uptime: None,
            serial_number: sentinel.to_owned(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        [SENTINEL_ERROR, SENTINEL_UNSUPPORTED].contains(&self.software_version.as_str())
            && self.software_version == self.serial_number
    }
}

/// The three fields the normalizer derives from command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFacts {
    pub software_version: String,
    pub uptime: Option<String>,
    pub serial_number: String,
}

impl DeviceFacts {
    pub fn into_record(self, device_name: &str, os: &DeviceOs) -> InventoryRecord {
        InventoryRecord {
            device_name: device_name.to_owned(),
            device_os: os.to_string(),
            software_version: self.software_version,
            uptime: self.uptime,
            serial_number: self.serial_number,
        }
    }
}
