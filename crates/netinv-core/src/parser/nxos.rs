// NX-OS parsers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use super::ParseError;
use super::inventory::parse_items;

static SYSTEM_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:NXOS|system):\s+version\s+(?P<version>\S+)")
        .expect("static regex must compile")
});

static KERNEL_UPTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Kernel uptime is (?P<days>\d+) day\(s\), (?P<hours>\d+) hour\(s\), (?P<minutes>\d+) minute\(s\), (?P<seconds>\d+) second\(s\)",
    )
    .expect("static regex must compile")
});

static CHASSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*cisco (?P<model>.+?)\s+[Cc]hassis").expect("static regex must compile")
});

static DEVICE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Device name:\s*(?P<name>\S+)").expect("static regex must compile")
});

/// `show version` → `{"platform": {"name", "software": {"system_version"},
/// "kernel_uptime": {"days", "hours", "minutes", "seconds"}, "hardware": {...}}}`.
pub(crate) fn parse_show_version(output: &str) -> Result<Value, ParseError> {
    let mut platform = Map::new();

    if let Some(caps) = SYSTEM_VERSION_RE.captures(output) {
        platform.insert(
            "software".into(),
            json!({ "system_version": &caps["version"] }),
        );
    }

    if let Some(caps) = KERNEL_UPTIME_RE.captures(output) {
        let num = |key: &str| caps[key].parse::<u64>().unwrap_or_default();
        platform.insert(
            "kernel_uptime".into(),
            json!({
                "days": num("days"),
                "hours": num("hours"),
                "minutes": num("minutes"),
                "seconds": num("seconds"),
            }),
        );
    }

    let mut hardware = Map::new();
    if let Some(caps) = CHASSIS_RE.captures(output) {
        hardware.insert("model".into(), json!(caps["model"].trim()));
    }
    if let Some(caps) = DEVICE_NAME_RE.captures(output) {
        hardware.insert("device_name".into(), json!(&caps["name"]));
    }
    if !hardware.is_empty() {
        platform.insert("hardware".into(), Value::Object(hardware));
    }

    if platform.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }
    platform.insert("name".into(), json!("Nxos"));
    Ok(json!({ "platform": platform }))
}

/// `show inventory` → `{"name": {NAME: {"description", "pid", "vid", "serial_number"}}}`.
pub(crate) fn parse_show_inventory(output: &str) -> Result<Value, ParseError> {
    let items = parse_items(output);
    if items.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }

    let by_name: Map<String, Value> = items
        .into_iter()
        .map(|item| {
            (
                item.name,
                json!({
                    "description": item.descr,
                    "pid": item.pid,
                    "vid": item.vid,
                    "serial_number": item.sn,
                }),
            )
        })
        .collect();

    Ok(json!({ "name": by_name }))
}
