// `show inventory` block parsing shared by every Cisco CLI family.
//
// Each item is a NAME/DESCR line followed by a PID/VID/SN line:
//
//   NAME: "Chassis", DESCR: "ASA 5506-X with FirePOWER services"
//   PID: ASA5506           , VID: V01     , SN: JAD20280ABC

use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*NAME:\s*"(?P<name>[^"]*)"\s*,\s*DESCR:\s*"(?P<descr>[^"]*)""#)
        .expect("static regex must compile")
});

static PID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*PID:\s*(?P<pid>[^,]*?)\s*,\s*VID:\s*(?P<vid>[^,]*?)\s*,\s*SN:\s*(?P<sn>\S*)")
        .expect("static regex must compile")
});

/// One inventory item in device order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InventoryItem {
    pub name: String,
    pub descr: String,
    pub pid: String,
    pub vid: String,
    pub sn: String,
}

/// Parse all NAME/PID blocks, in the order the device printed them.
///
/// A NAME line without a following PID line still yields an item with
/// empty hardware fields.
pub(crate) fn parse_items(output: &str) -> Vec<InventoryItem> {
    let mut items: Vec<InventoryItem> = Vec::new();

    for line in output.lines() {
        if let Some(caps) = NAME_RE.captures(line) {
            items.push(InventoryItem {
                name: caps["name"].trim().to_owned(),
                descr: caps["descr"].trim().to_owned(),
                ..InventoryItem::default()
            });
        } else if let Some(caps) = PID_RE.captures(line) {
            if let Some(item) = items.last_mut() {
                item.pid = caps["pid"].trim().to_owned();
                item.vid = caps["vid"].trim().to_owned();
                item.sn = caps["sn"].trim().to_owned();
            }
        }
    }

    items
}
