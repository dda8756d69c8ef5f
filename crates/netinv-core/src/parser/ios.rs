// IOS / IOS XE parsers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use super::ParseError;
use super::inventory::parse_items;

static IOS_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Cisco IOS Software[^\n]*?Version\s+(?P<version>[^\s,]+)")
        .expect("static regex must compile")
});

static XE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Cisco IOS XE Software,\s+Version\s+(?P<version>[^\s,]+)")
        .expect("static regex must compile")
});

static UPTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<hostname>\S+)\s+uptime is\s+(?P<uptime>[^\r\n]+?)\s*$")
        .expect("static regex must compile")
});

static CHASSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[Cc]isco\s+(?P<chassis>\S+)\s+(?:\([^)]*\)\s+)?(?:processor|with)\b")
        .expect("static regex must compile")
});

static BOARD_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Processor board ID\s+(?P<sn>\S+)").expect("static regex must compile")
});

/// `show version` → `{"version": {"version", "hostname", "uptime", "chassis", "chassis_sn"}}`.
pub(crate) fn parse_show_version(output: &str) -> Result<Value, ParseError> {
    let mut version = Map::new();

    if let Some(caps) = IOS_VERSION_RE
        .captures(output)
        .or_else(|| XE_VERSION_RE.captures(output))
    {
        version.insert("version".into(), json!(&caps["version"]));
    }
    if let Some(caps) = UPTIME_RE.captures(output) {
        version.insert("hostname".into(), json!(&caps["hostname"]));
        version.insert("uptime".into(), json!(&caps["uptime"]));
    }
    if let Some(caps) = CHASSIS_RE.captures(output) {
        version.insert("chassis".into(), json!(&caps["chassis"]));
    }
    if let Some(caps) = BOARD_ID_RE.captures(output) {
        version.insert("chassis_sn".into(), json!(&caps["sn"]));
    }

    if version.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }
    Ok(json!({ "version": version }))
}

/// `show inventory` → `{"main": {"chassis": {PID: item}}, "slot": {NAME: item}}`.
///
/// The first item is the chassis; every other item is filed under `slot`.
pub(crate) fn parse_show_inventory(output: &str) -> Result<Value, ParseError> {
    let mut items = parse_items(output).into_iter();
    let Some(chassis) = items.next() else {
        return Err(ParseError::SchemaEmpty);
    };

    let item_json = |item: &super::inventory::InventoryItem| {
        json!({
            "name": item.name,
            "descr": item.descr,
            "pid": item.pid,
            "vid": item.vid,
            "sn": item.sn,
        })
    };

    let mut main_chassis = Map::new();
    main_chassis.insert(chassis.pid.clone(), item_json(&chassis));

    let slot: Map<String, Value> = items
        .map(|item| (item.name.clone(), item_json(&item)))
        .collect();

    let mut tree = Map::new();
    tree.insert("main".into(), json!({ "chassis": main_chassis }));
    if !slot.is_empty() {
        tree.insert("slot".into(), Value::Object(slot));
    }
    Ok(Value::Object(tree))
}
