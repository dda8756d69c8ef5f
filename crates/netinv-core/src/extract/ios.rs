use super::{ExtractionStrategy, parsed, text_at};
use crate::error::CoreError;
use crate::model::{CommandResult, DeviceFacts, PayloadKind, SENTINEL_NOT_AVAILABLE};
use crate::parser::{SHOW_INVENTORY, SHOW_VERSION};

/// IOS and IOS XE: the chassis model named by `show version` keys the
/// serial lookup in `show inventory`.
pub(super) struct IosStrategy;

impl ExtractionStrategy for IosStrategy {
    fn payloads(&self) -> (PayloadKind, PayloadKind) {
        (PayloadKind::Parsed, PayloadKind::ParsedOrEmpty)
    }

    fn extract(
        &self,
        _device_name: &str,
        show_version: &CommandResult,
        show_inventory: &CommandResult,
    ) -> Result<DeviceFacts, CoreError> {
        let version = parsed(SHOW_VERSION, show_version)?;
        let software_version = text_at(version, &["version", "version"])?;
        let uptime = text_at(version, &["version", "uptime"])?;

        let serial_number = if show_inventory.is_empty_raw() {
            SENTINEL_NOT_AVAILABLE.to_owned()
        } else {
            let chassis = text_at(version, &["version", "chassis"])?;
            let inventory = parsed(SHOW_INVENTORY, show_inventory)?;
            let path = ["main", "chassis", chassis.as_str(), "sn"];
            text_at(inventory, &path)?
        };

        Ok(DeviceFacts {
            software_version,
            uptime: Some(uptime),
            serial_number,
        })
    }
}
