// ── CSV report ──
//
// One file per run, named after the run's local start time and the
// testbed. A missing uptime is written as an empty field and read back
// as `None`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::info;

use crate::error::CoreError;
use crate::model::InventoryRecord;

/// Column names, in order.
pub const REPORT_HEADER: [&str; 5] = [
    "device_name",
    "device_os",
    "software_version",
    "uptime",
    "serial_number",
];

/// `<%Y-%m-%d-%H-%M-%S>_<testbed>_network_inventory.csv`
///
/// Characters that cannot appear in a file name are replaced with `_`, so
/// the report always lands directly in the output directory.
pub fn report_file_name(started: &DateTime<Local>, testbed: &str) -> String {
    let testbed: String = testbed
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "{}_{testbed}_network_inventory.csv",
        started.format("%Y-%m-%d-%H-%M-%S")
    )
}

/// Write the header and one row per record.
pub fn write_records<W: Write>(writer: W, records: &[InventoryRecord]) -> Result<(), CoreError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(REPORT_HEADER)?;
    for record in records {
        wtr.write_record([
            record.device_name.as_str(),
            record.device_os.as_str(),
            record.software_version.as_str(),
            record.uptime.as_deref().unwrap_or_default(),
            record.serial_number.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to a new report file in `dir` and return its path.
pub fn write_report(
    dir: &Path,
    testbed: &str,
    started: &DateTime<Local>,
    records: &[InventoryRecord],
) -> Result<PathBuf, CoreError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(started, testbed));
    write_records(File::create(&path)?, records)?;
    info!(path = %path.display(), rows = records.len(), "report written");
    Ok(path)
}

/// Read records back from report CSV.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<InventoryRecord>, CoreError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    rdr.deserialize()
        .map(|row| row.map_err(CoreError::from))
        .collect()
}

pub fn read_report(path: &Path) -> Result<Vec<InventoryRecord>, CoreError> {
    read_records(File::open(path)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record(name: &str, uptime: Option<&str>) -> InventoryRecord {
        InventoryRecord {
            device_name: name.into(),
            device_os: "ios".into(),
            software_version: "16.9.3".into(),
            uptime: uptime.map(Into::into),
            serial_number: "FOC12345".into(),
        }
    }

    #[test]
    fn file_name_from_start_time() {
        let started = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            report_file_name(&started, "lab"),
            "2024-03-07-09-05-01_lab_network_inventory.csv"
        );
    }

    #[test]
    fn file_name_replaces_path_separators() {
        let started = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            report_file_name(&started, "dc1/core\\lab"),
            "2024-03-07-09-05-01_dc1_core_lab_network_inventory.csv"
        );
    }

    #[test]
    fn slash_in_testbed_name_still_writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "site/a", &Local::now(), &[record("R1", None)]).unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_site_a_network_inventory.csv"));
        assert_eq!(read_report(&path).unwrap().len(), 1);
    }

    #[test]
    fn header_and_empty_uptime() {
        let mut out = Vec::new();
        write_records(&mut out, &[record("R1", None)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "device_name,device_os,software_version,uptime,serial_number\r\nR1,ios,16.9.3,,FOC12345\r\n"
        );
    }

    #[test]
    fn empty_report_has_header_only() {
        let mut out = Vec::new();
        write_records(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn report_file_reads_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record("R1", Some("3 weeks, 2 days")),
            record("leaf-101", None),
            InventoryRecord {
                device_name: "fw1".into(),
                device_os: "asa".into(),
                software_version: "Error".into(),
                uptime: None,
                serial_number: "Error".into(),
            },
        ];
        let started = Local::now();

        let path = write_report(dir.path(), "lab", &started, &records).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_lab_network_inventory.csv"));
        assert_eq!(read_report(&path).unwrap(), records);
    }
}
