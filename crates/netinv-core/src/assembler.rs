// ── Report assembler ──
//
// Drives one inventory run: credentials, device sessions, command
// collection, controller fetches, per-device extraction, and the merge
// into one ordered list of rows. Per-device and per-controller failures
// degrade to sentinel rows or zero rows; only setup failures abort.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::controller::{
    ControllerCredentials, ControllerTarget, CredentialProvider, fetch_controller_inventory,
};
use crate::error::CoreError;
use crate::executor::execute;
use crate::extract::extract;
use crate::model::{
    CommandResult, DeviceOs, InventoryRecord, SENTINEL_ERROR, SENTINEL_UNSUPPORTED,
};
use crate::parser::{ParserRegistry, SHOW_INVENTORY, SHOW_VERSION};
use crate::session::{DeviceSession, Testbed};

/// Default bound on every session call.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bound on each connect, command, and disconnect.
    pub command_timeout: Duration,
    /// Cancelling skips the remaining devices; collected rows are kept.
    pub cancel: CancellationToken,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }
}

/// The rows of one run plus what happened along the way.
#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub testbed: String,
    pub started: DateTime<Local>,
    pub records: Vec<InventoryRecord>,
    pub devices_total: usize,
    pub devices_connected: usize,
    pub controller_rows: usize,
    pub cancelled: bool,
}

impl InventoryReport {
    /// Rows standing in for devices that could not be normalized.
    pub fn degraded(&self) -> usize {
        self.records.iter().filter(|r| r.is_degraded()).count()
    }
}

enum DeviceOutcome {
    Collected {
        show_version: CommandResult,
        show_inventory: CommandResult,
    },
    Failed(CoreError),
    Skipped,
}

/// Runs inventories against a testbed and optional controllers.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    parsers: ParserRegistry,
    controllers: Vec<ControllerTarget>,
    options: RunOptions,
}

impl Assembler {
    pub fn new(options: RunOptions) -> Self {
        Self {
            parsers: ParserRegistry::builtin(),
            controllers: Vec::new(),
            options,
        }
    }

    pub fn with_parsers(mut self, parsers: ParserRegistry) -> Self {
        self.parsers = parsers;
        self
    }

    /// Merge this controller's inventory after the device rows.
    pub fn with_controller(mut self, target: ControllerTarget) -> Self {
        self.controllers.push(target);
        self
    }

    /// Inventory every device of `testbed` from its captures.
    pub async fn run_testbed<P>(
        &self,
        testbed: &Testbed,
        credentials: &P,
    ) -> Result<InventoryReport, CoreError>
    where
        P: CredentialProvider + ?Sized,
    {
        self.run(&testbed.name, testbed.capture_sessions(), credentials)
            .await
    }

    /// Inventory `sessions`, in order, then merge controller inventories.
    pub async fn run<S, P>(
        &self,
        testbed: &str,
        mut sessions: Vec<S>,
        credentials: &P,
    ) -> Result<InventoryReport, CoreError>
    where
        S: DeviceSession,
        P: CredentialProvider + ?Sized,
    {
        let started = Local::now();
        let cancel = &self.options.cancel;

        let controllers = self.resolve_credentials(credentials)?;

        // ── Connect ──
        let mut outcomes: Vec<DeviceOutcome> = Vec::with_capacity(sessions.len());
        for session in &mut sessions {
            if cancel.is_cancelled() {
                outcomes.push(DeviceOutcome::Skipped);
                continue;
            }
            let name = session.name().to_owned();
            match self.bounded(&name, session.connect()).await {
                Ok(()) => {
                    info!(device = %name, "connected");
                    outcomes.push(DeviceOutcome::Skipped);
                }
                Err(e) => outcomes.push(DeviceOutcome::Failed(e)),
            }
        }

        let devices_connected = sessions.iter().filter(|s| s.is_connected()).count();
        if devices_connected == 0 && !sessions.is_empty() && !cancel.is_cancelled() {
            return Err(CoreError::NoReachableDevices {
                testbed: testbed.to_owned(),
            });
        }

        // ── Collect ──
        for (session, outcome) in sessions.iter_mut().zip(outcomes.iter_mut()) {
            if !session.is_connected() {
                continue;
            }
            let name = session.name().to_owned();
            let collected = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(device = %name, "run cancelled, skipping remaining devices");
                    break;
                }
                collected = self.collect(session) => collected,
            };
            *outcome = match collected {
                Ok((show_version, show_inventory)) => DeviceOutcome::Collected {
                    show_version,
                    show_inventory,
                },
                Err(e) => DeviceOutcome::Failed(e),
            };
        }

        // ── Disconnect ──
        for session in &mut sessions {
            if !session.is_connected() {
                continue;
            }
            let name = session.name().to_owned();
            if let Err(e) = self.bounded(&name, session.disconnect()).await {
                warn!(device = %name, error = %e, "disconnect failed");
            }
        }

        // ── Controllers ──
        let mut controller_records = Vec::new();
        for (target, creds) in &controllers {
            if cancel.is_cancelled() {
                break;
            }
            match fetch_controller_inventory(target, creds).await {
                Ok(records) => {
                    info!(controller = %target.address, rows = records.len(), "controller inventory fetched");
                    controller_records.push(records);
                }
                Err(e) => warn!(controller = %target.address, error = %e, "controller inventory unavailable"),
            }
        }

        // ── Extract ──
        let device_records = sessions
            .iter()
            .zip(outcomes)
            .filter_map(|(session, outcome)| device_record(session.name(), session.os(), outcome))
            .collect::<Vec<_>>();

        let (records, controller_rows) = merge(device_records, controller_records);

        Ok(InventoryReport {
            testbed: testbed.to_owned(),
            started,
            records,
            devices_total: sessions.len(),
            devices_connected,
            controller_rows,
            cancelled: cancel.is_cancelled(),
        })
    }

    fn resolve_credentials<P>(
        &self,
        provider: &P,
    ) -> Result<Vec<(ControllerTarget, ControllerCredentials)>, CoreError>
    where
        P: CredentialProvider + ?Sized,
    {
        self.controllers
            .iter()
            .map(|target| Ok((target.clone(), provider.credentials(target)?)))
            .collect()
    }

    async fn collect<S: DeviceSession>(
        &self,
        session: &mut S,
    ) -> Result<(CommandResult, CommandResult), CoreError> {
        let timeout = self.options.command_timeout;
        let show_version = execute(session, &self.parsers, SHOW_VERSION, timeout).await?;
        let show_inventory = execute(session, &self.parsers, SHOW_INVENTORY, timeout).await?;
        Ok((show_version, show_inventory))
    }

    async fn bounded<F>(&self, device: &str, call: F) -> Result<(), CoreError>
    where
        F: Future<Output = Result<(), CoreError>>,
    {
        let timeout = self.options.command_timeout;
        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| CoreError::Timeout {
                target: device.to_owned(),
                timeout_secs: timeout.as_secs(),
            })?
    }
}

fn device_record(name: &str, os: &DeviceOs, outcome: DeviceOutcome) -> Option<InventoryRecord> {
    let error = match outcome {
        DeviceOutcome::Skipped => return None,
        DeviceOutcome::Failed(e) => e,
        DeviceOutcome::Collected {
            show_version,
            show_inventory,
        } => match extract(os, name, &show_version, &show_inventory) {
            Ok(facts) => return Some(facts.into_record(name, os)),
            Err(e) => e,
        },
    };
    Some(degraded_record(name, os, &error))
}

/// Sentinel row for a device that produced no facts.
fn degraded_record(name: &str, os: &DeviceOs, error: &CoreError) -> InventoryRecord {
    if error.is_extraction() {
        warn!(device = %name, os = %os, error = %error, "unable to normalize device output");
    } else {
        warn!(device = %name, error = %error, "unable to collect from device");
    }
    let sentinel = if matches!(error, CoreError::UnsupportedOs { .. }) {
        SENTINEL_UNSUPPORTED
    } else {
        SENTINEL_ERROR
    };
    InventoryRecord::degraded(name, os, sentinel)
}

/// Device rows first, then each controller's rows in controller order.
/// A controller row whose name is already taken is dropped.
fn merge(
    device_records: Vec<InventoryRecord>,
    controller_records: Vec<Vec<InventoryRecord>>,
) -> (Vec<InventoryRecord>, usize) {
    let mut seen: HashSet<String> = device_records
        .iter()
        .map(|r| r.device_name.clone())
        .collect();
    let mut records = device_records;
    let mut added = 0;

    for record in controller_records.into_iter().flatten() {
        if seen.insert(record.device_name.clone()) {
            records.push(record);
            added += 1;
        } else {
            warn!(device = %record.device_name, "duplicate device name from controller, row dropped");
        }
    }

    (records, added)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(name: &str, os: &str) -> InventoryRecord {
        InventoryRecord {
            device_name: name.into(),
            device_os: os.into(),
            software_version: "1.0".into(),
            uptime: None,
            serial_number: "SN".into(),
        }
    }

    #[test]
    fn merge_appends_controllers_in_order() {
        let (records, added) = merge(
            vec![row("R1", "ios")],
            vec![
                vec![row("leaf-101", "apic-N9K"), row("leaf-102", "apic-N9K")],
                vec![row("vedge1", "sdwan-vedge-cloud")],
            ],
        );
        let names: Vec<_> = records.iter().map(|r| r.device_name.as_str()).collect();
        assert_eq!(names, ["R1", "leaf-101", "leaf-102", "vedge1"]);
        assert_eq!(added, 3);
    }

    #[test]
    fn merge_drops_duplicate_names() {
        let (records, added) = merge(
            vec![row("R1", "ios")],
            vec![vec![row("R1", "apic-N9K"), row("spine-201", "apic-N9K")]],
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].device_os, "ios");
        assert_eq!(added, 1);
    }

    #[test]
    fn unsupported_os_row() {
        let outcome = DeviceOutcome::Collected {
            show_version: CommandResult::Raw("JUNOS 21.2R3".into()),
            show_inventory: CommandResult::Raw(String::new()),
        };
        let os = DeviceOs::from("junos");
        let record = device_record("mx1", &os, outcome).unwrap();
        assert_eq!(record, InventoryRecord::degraded("mx1", &os, SENTINEL_UNSUPPORTED));
    }

    #[test]
    fn failed_device_row_and_skipped_device() {
        let os = DeviceOs::Ios;
        let failed = DeviceOutcome::Failed(CoreError::Session {
            device: "R9".into(),
            message: "connection refused".into(),
        });
        assert_eq!(
            device_record("R9", &os, failed),
            Some(InventoryRecord::degraded("R9", &os, SENTINEL_ERROR))
        );
        assert_eq!(device_record("R9", &os, DeviceOutcome::Skipped), None);
    }

    #[test]
    fn extraction_failure_is_an_error_row() {
        let outcome = DeviceOutcome::Collected {
            show_version: CommandResult::Parsed(serde_json::json!({"version": {"version": "15.2"}})),
            show_inventory: CommandResult::Raw(String::new()),
        };
        let os = DeviceOs::Ios;
        assert_eq!(
            device_record("R2", &os, outcome),
            Some(InventoryRecord::degraded("R2", &os, SENTINEL_ERROR))
        );
    }

    #[test]
    fn unsupported_os_error_picks_unsupported_sentinel() {
        let os = DeviceOs::from("junos");
        let err = CoreError::UnsupportedOs { os: "junos".into() };
        assert!(err.is_extraction());
        assert_eq!(
            degraded_record("mx1", &os, &err).serial_number,
            SENTINEL_UNSUPPORTED
        );
    }
}
