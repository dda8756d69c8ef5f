use std::sync::LazyLock;

use regex::Regex;

use super::{ExtractionStrategy, parsed, raw, text_at};
use crate::error::CoreError;
use crate::model::{CommandResult, DeviceFacts, PayloadKind};
use crate::parser::{SHOW_INVENTORY, SHOW_VERSION};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Software Version ([^\n ]*)").expect("static regex must compile")
});

/// ASA: version and uptime come from raw `show version` text, the serial
/// from the parsed chassis entry.
pub(super) struct AsaStrategy;

impl ExtractionStrategy for AsaStrategy {
    fn payloads(&self) -> (PayloadKind, PayloadKind) {
        (PayloadKind::Raw, PayloadKind::Parsed)
    }

    fn extract(
        &self,
        device_name: &str,
        show_version: &CommandResult,
        show_inventory: &CommandResult,
    ) -> Result<DeviceFacts, CoreError> {
        let text = raw(SHOW_VERSION, show_version)?;
        let inventory = parsed(SHOW_INVENTORY, show_inventory)?;

        let software_version = VERSION_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| CoreError::field_missing(&["software_version"]))?;

        let uptime_re = Regex::new(&format!(
            r"{} up (\d* days? \d* hours?)",
            regex::escape(device_name)
        ))
        .map_err(|_| CoreError::field_missing(&["uptime"]))?;
        let uptime = uptime_re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| CoreError::field_missing(&["uptime"]))?;

        let serial_number = text_at(inventory, &["Chassis", "sn"])?;

        Ok(DeviceFacts {
            software_version,
            uptime: Some(uptime),
            serial_number,
        })
    }
}
