use super::{ExtractionStrategy, lookup, parsed, text_at};
use crate::error::CoreError;
use crate::model::{CommandResult, DeviceFacts, PayloadKind};
use crate::parser::{SHOW_INVENTORY, SHOW_VERSION};

/// IOS XR: the serial of the first module the device lists.
pub(super) struct IosXrStrategy;

impl ExtractionStrategy for IosXrStrategy {
    fn payloads(&self) -> (PayloadKind, PayloadKind) {
        (PayloadKind::Parsed, PayloadKind::Parsed)
    }

    fn extract(
        &self,
        _device_name: &str,
        show_version: &CommandResult,
        show_inventory: &CommandResult,
    ) -> Result<DeviceFacts, CoreError> {
        let version = parsed(SHOW_VERSION, show_version)?;
        let inventory = parsed(SHOW_INVENTORY, show_inventory)?;

        let software_version = text_at(version, &["software_version"])?;
        let uptime = text_at(version, &["uptime"])?;

        let first_module = lookup(inventory, &["module_name"])?
            .as_object()
            .and_then(|modules| modules.values().next())
            .ok_or_else(|| CoreError::field_missing(&["module_name"]))?;
        let serial_number = text_at(first_module, &["sn"])
            .map_err(|_| CoreError::field_missing(&["module_name", "<first>", "sn"]))?;

        Ok(DeviceFacts {
            software_version,
            uptime: Some(uptime),
            serial_number,
        })
    }
}
