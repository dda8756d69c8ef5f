// IOS XR parsers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use super::ParseError;
use super::inventory::parse_items;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Cisco IOS XR Software,\s+Version\s+(?P<version>[^\s\[]+)")
        .expect("static regex must compile")
});

// Classic XR prints "System uptime is ...", eXR/7.x prints "<host> uptime is ...".
static UPTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\S+\s+uptime is\s+(?P<uptime>[^\r\n]+?)\s*$")
        .expect("static regex must compile")
});

static FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*cisco\s+(?P<family>\S+)[^\n(]*\(").expect("static regex must compile")
});

/// `show version` → `{"software_version", "uptime", "device_family"?}`.
pub(crate) fn parse_show_version(output: &str) -> Result<Value, ParseError> {
    let mut tree = Map::new();

    if let Some(caps) = VERSION_RE.captures(output) {
        tree.insert("software_version".into(), json!(&caps["version"]));
    }
    if let Some(caps) = UPTIME_RE.captures(output) {
        tree.insert("uptime".into(), json!(&caps["uptime"]));
    }
    if let Some(caps) = FAMILY_RE.captures(output) {
        tree.insert("device_family".into(), json!(&caps["family"]));
    }

    if tree.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }
    Ok(Value::Object(tree))
}

/// `show inventory` → `{"module_name": {NAME: {"descr", "pid", "vid", "sn"}}}`,
/// modules kept in the order the device listed them.
pub(crate) fn parse_show_inventory(output: &str) -> Result<Value, ParseError> {
    let items = parse_items(output);
    if items.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }

    let modules: Map<String, Value> = items
        .into_iter()
        .map(|item| {
            (
                item.name,
                json!({
                    "descr": item.descr,
                    "pid": item.pid,
                    "vid": item.vid,
                    "sn": item.sn,
                }),
            )
        })
        .collect();

    Ok(json!({ "module_name": modules }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHOW_VERSION: &str = "\
Cisco IOS XR Software, Version 6.5.3
Copyright (c) 2013-2019 by Cisco Systems, Inc.

Build Information:
 Built By     : ahoang
 Version      : 6.5.3

cisco IOS-XRv 9000 () processor
System uptime is 2 weeks 1 day 3 hours 14 minutes
";

    #[test]
    fn show_version_fields() {
        let tree = parse_show_version(SHOW_VERSION).unwrap();
        assert_eq!(
            tree,
            json!({
                "software_version": "6.5.3",
                "uptime": "2 weeks 1 day 3 hours 14 minutes",
                "device_family": "IOS-XRv",
            })
        );
    }

    #[test]
    fn show_inventory_keeps_device_order() {
        let out = "\
NAME: \"0/RP0/CPU0\", DESCR: \"Cisco IOS-XRv 9000 Centralized Route Processor\"
PID: R-IOSXRV9000-RP-C , VID: V01, SN: SN-RP0

NAME: \"0/0/CPU0\", DESCR: \"Cisco IOS-XRv 9000 Centralized Line Card\"
PID: R-IOSXRV9000-LC-C , VID: V01, SN: SN-LC0
";
        let tree = parse_show_inventory(out).unwrap();
        let names: Vec<_> = tree["module_name"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(names, ["0/RP0/CPU0", "0/0/CPU0"]);
        assert_eq!(tree["module_name"]["0/RP0/CPU0"]["sn"], "SN-RP0");
    }

    #[test]
    fn unrelated_text_is_schema_empty() {
        assert_eq!(parse_show_inventory("nothing here"), Err(ParseError::SchemaEmpty));
    }
}
