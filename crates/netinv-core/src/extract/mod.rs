//! Per-OS field extraction.
//!
//! Each supported [`DeviceOs`] maps to an [`ExtractionStrategy`] that knows
//! where that OS family keeps its software version, uptime, and chassis
//! serial. Strategies declare the [`CommandResult`] variant they accept for
//! each command; [`extract`] checks that before handing over.
//!
//! Extraction is pure: no I/O, no logging.

mod asa;
mod ios;
mod iosxr;
mod nxos;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{CommandResult, DeviceFacts, DeviceOs, PayloadKind};
use crate::parser::{SHOW_INVENTORY, SHOW_VERSION};

/// Field extraction for one OS family.
pub trait ExtractionStrategy: Sync {
    /// Accepted payloads for `(show version, show inventory)`.
    fn payloads(&self) -> (PayloadKind, PayloadKind);

    fn extract(
        &self,
        device_name: &str,
        show_version: &CommandResult,
        show_inventory: &CommandResult,
    ) -> Result<DeviceFacts, CoreError>;
}

/// The strategy for `os`, or `None` when the OS is not supported.
pub fn strategy_for(os: &DeviceOs) -> Option<&'static dyn ExtractionStrategy> {
    match os {
        DeviceOs::Ios | DeviceOs::IosXe => Some(&ios::IosStrategy),
        DeviceOs::Nxos => Some(&nxos::NxosStrategy),
        DeviceOs::IosXr => Some(&iosxr::IosXrStrategy),
        DeviceOs::Asa => Some(&asa::AsaStrategy),
        DeviceOs::Other(_) => None,
    }
}

/// Derive software version, uptime, and serial from the two command results.
pub fn extract(
    os: &DeviceOs,
    device_name: &str,
    show_version: &CommandResult,
    show_inventory: &CommandResult,
) -> Result<DeviceFacts, CoreError> {
    let strategy = strategy_for(os).ok_or_else(|| CoreError::UnsupportedOs {
        os: os.to_string(),
    })?;

    let (version_kind, inventory_kind) = strategy.payloads();
    expect_payload(SHOW_VERSION, show_version, version_kind)?;
    expect_payload(SHOW_INVENTORY, show_inventory, inventory_kind)?;

    strategy.extract(device_name, show_version, show_inventory)
}

fn expect_payload(command: &str, result: &CommandResult, kind: PayloadKind) -> Result<(), CoreError> {
    if result.satisfies(kind) {
        Ok(())
    } else {
        Err(CoreError::UnexpectedPayload {
            command: command.to_owned(),
            expected: kind.describe(),
        })
    }
}

// ── Tree access ──────────────────────────────────────────────────────

fn parsed<'a>(command: &str, result: &'a CommandResult) -> Result<&'a Value, CoreError> {
    result.as_parsed().ok_or_else(|| CoreError::UnexpectedPayload {
        command: command.to_owned(),
        expected: PayloadKind::Parsed.describe(),
    })
}

fn raw<'a>(command: &str, result: &'a CommandResult) -> Result<&'a str, CoreError> {
    result.as_raw().ok_or_else(|| CoreError::UnexpectedPayload {
        command: command.to_owned(),
        expected: PayloadKind::Raw.describe(),
    })
}

/// Walk `path` through nested mappings.
fn lookup<'a>(tree: &'a Value, path: &[&str]) -> Result<&'a Value, CoreError> {
    path.iter()
        .try_fold(tree, |node, key| node.get(*key))
        .ok_or_else(|| CoreError::field_missing(path))
}

/// The leaf at `path` as text. Numbers render as their decimal form.
fn text_at(tree: &Value, path: &[&str]) -> Result<String, CoreError> {
    match lookup(tree, path)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(CoreError::field_missing(path)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn facts(version: &str, uptime: Option<&str>, serial: &str) -> DeviceFacts {
        DeviceFacts {
            software_version: version.into(),
            uptime: uptime.map(Into::into),
            serial_number: serial.into(),
        }
    }

    #[test]
    fn ios_end_to_end_row() {
        let version = CommandResult::Parsed(json!({
            "version": {"version": "16.9.3", "uptime": "3 weeks", "chassis": "C9300"}
        }));
        let inventory = CommandResult::Parsed(json!({
            "main": {"chassis": {"C9300": {"sn": "FOC12345"}}}
        }));

        let record = extract(&DeviceOs::Ios, "R1", &version, &inventory)
            .unwrap()
            .into_record("R1", &DeviceOs::Ios);

        assert_eq!(record.device_name, "R1");
        assert_eq!(record.device_os, "ios");
        assert_eq!(record.software_version, "16.9.3");
        assert_eq!(record.uptime.as_deref(), Some("3 weeks"));
        assert_eq!(record.serial_number, "FOC12345");
    }

    #[test]
    fn iosxe_uses_the_ios_paths() {
        let version = CommandResult::Parsed(json!({
            "version": {"version": "17.3.1", "uptime": "1 day", "chassis": "C8300"}
        }));
        let inventory = CommandResult::Parsed(json!({
            "main": {"chassis": {"C8300": {"sn": "FDO1"}}}
        }));
        assert_eq!(
            extract(&DeviceOs::IosXe, "R2", &version, &inventory).unwrap(),
            facts("17.3.1", Some("1 day"), "FDO1")
        );
    }

    #[test]
    fn iosv_capture_extracts_through_the_parsers() {
        let parsers = crate::parser::ParserRegistry::builtin();
        let version_text = "\
Cisco IOS Software, IOSv Software (VIOS-ADVENTERPRISEK9-M), Version 15.6(2)T, RELEASE SOFTWARE (fc2)
R1 uptime is 1 day, 2 hours, 3 minutes
Cisco IOSv (revision 1.0) with  with 460137K/62464K bytes of memory.
Processor board ID 9J0PD0QHX8J1XYKBSJ1Q1
";
        let inventory_text = "NAME: \"IOSv\", DESCR: \"Cisco IOSv Chassis\"\n\
PID: IOSv              , VID: 1.0, SN: 9J0PD0QHX8J1XYKBSJ1Q1\n";

        let version = CommandResult::Parsed(
            parsers
                .parse("R1", &DeviceOs::Ios, SHOW_VERSION, version_text)
                .unwrap(),
        );
        let inventory = CommandResult::Parsed(
            parsers
                .parse("R1", &DeviceOs::Ios, SHOW_INVENTORY, inventory_text)
                .unwrap(),
        );

        assert_eq!(
            extract(&DeviceOs::Ios, "R1", &version, &inventory).unwrap(),
            facts("15.6(2)T", Some("1 day, 2 hours, 3 minutes"), "9J0PD0QHX8J1XYKBSJ1Q1")
        );
    }

    #[test]
    fn ios_empty_inventory_is_not_available() {
        let version = CommandResult::Parsed(json!({
            "version": {"version": "15.2", "uptime": "5 days", "chassis": "ISR"}
        }));
        for empty in ["", "  \n"] {
            let inventory = CommandResult::Raw(empty.into());
            assert_eq!(
                extract(&DeviceOs::Ios, "R3", &version, &inventory).unwrap(),
                facts("15.2", Some("5 days"), "N/A")
            );
        }
    }

    #[test]
    fn ios_non_empty_raw_inventory_is_rejected() {
        let version = CommandResult::Parsed(json!({
            "version": {"version": "15.2", "uptime": "5 days", "chassis": "ISR"}
        }));
        let err = extract(
            &DeviceOs::Ios,
            "R3",
            &version,
            &CommandResult::Raw("% Invalid input".into()),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedPayload { .. }));
    }

    #[test]
    fn ios_serial_for_wrong_chassis_is_missing() {
        let version = CommandResult::Parsed(json!({
            "version": {"version": "16.9.3", "uptime": "3 weeks", "chassis": "C9300"}
        }));
        let inventory = CommandResult::Parsed(json!({
            "main": {"chassis": {"C9500": {"sn": "X"}}}
        }));
        let err = extract(&DeviceOs::Ios, "R1", &version, &inventory).unwrap_err();
        match err {
            CoreError::FieldMissing { path } => assert_eq!(path, "main.chassis.C9300.sn"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nxos_uptime_drops_seconds() {
        let version = CommandResult::Parsed(json!({
            "platform": {
                "software": {"system_version": "9.3(3)"},
                "kernel_uptime": {"days": 6, "hours": 20, "minutes": 48, "seconds": 59}
            }
        }));
        let inventory = CommandResult::Parsed(json!({
            "name": {"Chassis": {"serial_number": "9N3KD63KWT4"}}
        }));
        assert_eq!(
            extract(&DeviceOs::Nxos, "nx1", &version, &inventory).unwrap(),
            facts("9.3(3)", Some("6 days, 20 hours, 48 minutes"), "9N3KD63KWT4")
        );
    }

    #[test]
    fn iosxr_takes_first_module() {
        let version = CommandResult::Parsed(json!({
            "software_version": "6.5.3",
            "uptime": "2 weeks"
        }));
        let inventory = CommandResult::Parsed(json!({
            "module_name": {
                "0/RP0/CPU0": {"sn": "FIRST"},
                "0/0/CPU0": {"sn": "SECOND"},
                "0/1/CPU0": {"sn": "THIRD"}
            }
        }));
        assert_eq!(
            extract(&DeviceOs::IosXr, "xr1", &version, &inventory).unwrap(),
            facts("6.5.3", Some("2 weeks"), "FIRST")
        );
    }

    #[test]
    fn iosxr_without_modules_is_missing() {
        let version = CommandResult::Parsed(json!({"software_version": "7.1", "uptime": "1 day"}));
        let inventory = CommandResult::Parsed(json!({"module_name": {}}));
        let err = extract(&DeviceOs::IosXr, "xr1", &version, &inventory).unwrap_err();
        assert!(matches!(err, CoreError::FieldMissing { .. }));
    }

    #[test]
    fn asa_reads_raw_show_version() {
        let version = CommandResult::Raw(
            "Cisco Adaptive Security Appliance Software Version 9.8(2)\n\
             Firepower Extensible Operating System Version 2.2(2.52)\n\n\
             fw1 up 4 days 3 hours\n"
                .into(),
        );
        let inventory = CommandResult::Parsed(json!({
            "Chassis": {"descr": "ASA 5506-X", "sn": "JAD20280ABC"}
        }));
        assert_eq!(
            extract(&DeviceOs::Asa, "fw1", &version, &inventory).unwrap(),
            facts("9.8(2)", Some("4 days 3 hours"), "JAD20280ABC")
        );
    }

    #[test]
    fn asa_version_does_not_cross_newline() {
        let version = CommandResult::Raw("Software Version \nfw1 up 1 day 2 hours\n".into());
        let inventory = CommandResult::Parsed(json!({"Chassis": {"sn": "S"}}));
        let got = extract(&DeviceOs::Asa, "fw1", &version, &inventory).unwrap();
        assert_eq!(got.software_version, "");
    }

    #[test]
    fn asa_uptime_anchors_on_device_name() {
        let version = CommandResult::Raw(
            "Software Version 9.12(4)\nfw2 up 9 days 9 hours\nfw1 up 1 day 2 hours\n".into(),
        );
        let inventory = CommandResult::Parsed(json!({"Chassis": {"sn": "S"}}));
        let got = extract(&DeviceOs::Asa, "fw1", &version, &inventory).unwrap();
        assert_eq!(got.uptime.as_deref(), Some("1 day 2 hours"));
    }

    #[test]
    fn asa_device_name_is_escaped() {
        let version = CommandResult::Raw("Software Version 9.8\nfwXa up 3 days 1 hour\n".into());
        let inventory = CommandResult::Parsed(json!({"Chassis": {"sn": "S"}}));
        let err = extract(&DeviceOs::Asa, "fw.a", &version, &inventory).unwrap_err();
        assert!(matches!(err, CoreError::FieldMissing { .. }));
    }

    #[test]
    fn asa_requires_parsed_inventory() {
        let version = CommandResult::Raw("Software Version 9.8\nfw1 up 3 days 1 hour\n".into());
        let err = extract(&DeviceOs::Asa, "fw1", &version, &CommandResult::Raw(String::new()))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedPayload { .. }));
    }

    #[test]
    fn unknown_os_is_unsupported() {
        let any = CommandResult::Raw("text".into());
        let err = extract(&DeviceOs::Other("junos".into()), "mx1", &any, &any).unwrap_err();
        match err {
            CoreError::UnsupportedOs { os } => assert_eq!(os, "junos"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn numeric_leaves_render_as_text() {
        let tree = json!({"a": {"b": 42}});
        assert_eq!(text_at(&tree, &["a", "b"]).unwrap(), "42");
        assert!(text_at(&tree, &["a"]).is_err());
    }
}
