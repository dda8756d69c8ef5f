use super::{ExtractionStrategy, parsed, text_at};
use crate::error::CoreError;
use crate::model::{CommandResult, DeviceFacts, PayloadKind};
use crate::parser::{SHOW_INVENTORY, SHOW_VERSION};

/// NX-OS: uptime is rebuilt from the kernel uptime counters.
pub(super) struct NxosStrategy;

impl ExtractionStrategy for NxosStrategy {
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

        let software_version = text_at(version, &["platform", "software", "system_version"])?;

        let counter = |unit: &str| text_at(version, &["platform", "kernel_uptime", unit]);
        let uptime = format!(
            "{} days, {} hours, {} minutes",
            counter("days")?,
            counter("hours")?,
            counter("minutes")?
        );

        let serial_number = text_at(inventory, &["name", "Chassis", "serial_number"])?;

        Ok(DeviceFacts {
            software_version,
            uptime: Some(uptime),
            serial_number,
        })
    }
}
