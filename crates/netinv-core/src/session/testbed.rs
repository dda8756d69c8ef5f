// Testbed loading
//
// YAML description of the devices to inventory. Device order in the file is
// the row order of the report.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use super::CaptureSession;
use crate::error::CoreError;
use crate::model::DeviceOs;

#[derive(Debug, Deserialize)]
struct TestbedFile {
    #[serde(default)]
    testbed: TestbedMeta,
    #[serde(default)]
    devices: IndexMap<String, DeviceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct TestbedMeta {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    os: String,
    #[serde(default)]
    captures: IndexMap<String, PathBuf>,
}

/// One device as described by the testbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub name: String,
    pub os: DeviceOs,
    /// Command → capture file, already resolved against the testbed directory.
    pub captures: IndexMap<String, PathBuf>,
}

/// A loaded testbed.
#[derive(Debug, Clone)]
pub struct Testbed {
    pub name: String,
    pub devices: Vec<DeviceSpec>,
}

impl Testbed {
    /// Load a testbed file. Relative capture paths resolve against the
    /// file's directory; a missing `testbed.name` falls back to the file stem.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::Testbed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let fallback_name = path
            .file_stem()
            .map_or_else(|| "testbed".to_owned(), |s| s.to_string_lossy().into_owned());

        Self::from_yaml(&contents, base_dir, &fallback_name).map_err(|e| match e {
            CoreError::Testbed { message, .. } => CoreError::Testbed {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse testbed YAML.
    pub fn from_yaml(contents: &str, base_dir: &Path, fallback_name: &str) -> Result<Self, CoreError> {
        let file: TestbedFile = serde_yaml::from_str(contents).map_err(|e| CoreError::Testbed {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;

        let devices = file
            .devices
            .into_iter()
            .map(|(name, entry)| DeviceSpec {
                os: DeviceOs::from(entry.os),
                captures: entry
                    .captures
                    .into_iter()
                    .map(|(command, path)| {
                        let path = if path.is_relative() {
                            base_dir.join(path)
                        } else {
                            path
                        };
                        (command, path)
                    })
                    .collect(),
                name,
            })
            .collect::<Vec<_>>();

        let name = file
            .testbed
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_owned());

        debug!(testbed = %name, devices = devices.len(), "testbed loaded");
        Ok(Self { name, devices })
    }

    /// Build one capture session per device.
    pub fn capture_sessions(&self) -> Vec<CaptureSession> {
        self.devices
            .iter()
            .map(|spec| {
                spec.captures.iter().fold(
                    CaptureSession::new(spec.name.clone(), spec.os.clone()),
                    |session, (command, path)| session.with_capture(command, path),
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TESTBED: &str = r"
testbed:
  name: lab
devices:
  R2:
    os: iosxe
    captures:
      show version: captures/R2/show_version.txt
  R1:
    os: ios
    captures:
      show version: /abs/R1/show_version.txt
  fw1:
    os: ASA
";

    #[test]
    fn keeps_file_order_and_resolves_paths() {
        let tb = Testbed::from_yaml(TESTBED, Path::new("/tb"), "fallback").unwrap();

        assert_eq!(tb.name, "lab");
        let names: Vec<_> = tb.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["R2", "R1", "fw1"]);

        assert_eq!(tb.devices[0].os, DeviceOs::IosXe);
        assert_eq!(
            tb.devices[0].captures["show version"],
            PathBuf::from("/tb/captures/R2/show_version.txt")
        );
        assert_eq!(
            tb.devices[1].captures["show version"],
            PathBuf::from("/abs/R1/show_version.txt")
        );
        assert_eq!(tb.devices[2].os, DeviceOs::Asa);
        assert!(tb.devices[2].captures.is_empty());
    }

    #[test]
    fn missing_name_uses_fallback() {
        let tb = Testbed::from_yaml("devices: {}", Path::new("."), "core-lab").unwrap();
        assert_eq!(tb.name, "core-lab");
        assert!(tb.devices.is_empty());
    }

    #[test]
    fn invalid_yaml_is_testbed_error() {
        let err = Testbed::from_yaml("devices: [", Path::new("."), "x").unwrap_err();
        assert!(matches!(err, CoreError::Testbed { .. }));
    }

    #[test]
    fn load_reads_file_and_names_from_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branch.yaml");
        std::fs::write(&path, "devices:\n  sw1:\n    os: nxos\n").unwrap();

        let tb = Testbed::load(&path).unwrap();
        assert_eq!(tb.name, "branch");
        assert_eq!(tb.devices[0].os, DeviceOs::Nxos);
        assert_eq!(tb.capture_sessions().len(), 1);
    }

    #[test]
    fn load_missing_file_is_testbed_error() {
        let err = Testbed::load(Path::new("/nonexistent/tb.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::Testbed { .. }));
    }
}
