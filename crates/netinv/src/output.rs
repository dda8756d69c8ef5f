//! Run summary: table, JSON, YAML, or nothing.
//!
//! The CSV report is the product; this is what lands on the terminal.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use netinv_core::{InventoryRecord, InventoryReport};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct RecordRow<'a> {
    #[tabled(rename = "Device")]
    device_name: &'a str,
    #[tabled(rename = "OS")]
    device_os: &'a str,
    #[tabled(rename = "Version")]
    software_version: &'a str,
    #[tabled(rename = "Uptime")]
    uptime: &'a str,
    #[tabled(rename = "Serial")]
    serial_number: &'a str,
}

impl<'a> From<&'a InventoryRecord> for RecordRow<'a> {
    fn from(r: &'a InventoryRecord) -> Self {
        Self {
            device_name: &r.device_name,
            device_os: &r.device_os,
            software_version: &r.software_version,
            uptime: r.uptime.as_deref().unwrap_or("-"),
            serial_number: &r.serial_number,
        }
    }
}

/// Whether stderr should carry color codes.
fn should_color() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Render the report rows in `format`. `None` renders nothing.
pub fn render_records(format: OutputFormat, records: &[InventoryRecord]) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<RecordRow<'_>> = records.iter().map(RecordRow::from).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(records)?,
        OutputFormat::Yaml => serde_yaml::to_string(records)?,
        OutputFormat::None => String::new(),
    })
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// One-line outcome on stderr, so stdout stays machine-readable.
pub fn print_status(report: &InventoryReport, path: &Path) {
    let degraded = report.degraded();
    let mut line = format!(
        "Wrote {} rows ({} of {} devices reachable, {} controller rows) to {}",
        report.records.len(),
        report.devices_connected,
        report.devices_total,
        report.controller_rows,
        path.display()
    );
    if degraded > 0 {
        line.push_str(&format!(", {degraded} degraded"));
    }
    if report.cancelled {
        line.push_str(", run cancelled");
    }

    let mut stderr = io::stderr().lock();
    if should_color() {
        if degraded > 0 || report.cancelled {
            let _ = writeln!(stderr, "{}", line.yellow());
        } else {
            let _ = writeln!(stderr, "{}", line.green());
        }
    } else {
        let _ = writeln!(stderr, "{line}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn records() -> Vec<InventoryRecord> {
        vec![InventoryRecord {
            device_name: "R1".into(),
            device_os: "ios".into(),
            software_version: "16.9.3".into(),
            uptime: None,
            serial_number: "FOC12345".into(),
        }]
    }

    #[test]
    fn table_has_headers_and_placeholder_uptime() {
        let out = render_records(OutputFormat::Table, &records()).unwrap();
        assert!(out.contains("Device"));
        assert!(out.contains("FOC12345"));
        assert!(out.contains(" - "));
    }

    #[test]
    fn json_keeps_null_uptime() {
        let out = render_records(OutputFormat::Json, &records()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["device_name"], "R1");
        assert!(value[0]["uptime"].is_null());
    }

    #[test]
    fn none_renders_nothing() {
        assert!(render_records(OutputFormat::None, &records()).unwrap().is_empty());
    }
}
