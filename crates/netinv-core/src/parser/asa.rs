// ASA parsers. `show version` has none: its fields are read from raw text.

use serde_json::{Map, Value, json};

use super::ParseError;
use super::inventory::parse_items;

/// `show inventory` → `{NAME: {"descr", "pid", "vid", "sn"}}`.
pub(crate) fn parse_show_inventory(output: &str) -> Result<Value, ParseError> {
    let items: Map<String, Value> = parse_items(output)
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

    if items.is_empty() {
        return Err(ParseError::SchemaEmpty);
    }
    Ok(Value::Object(items))
}
