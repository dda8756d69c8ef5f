// ── Controller inventory ──
//
// Pulls node inventory from fabric (APIC) and WAN (SD-WAN) controllers and
// normalizes it into report rows. Login or listing failures fail the whole
// fetch; a single node's firmware lookup only degrades that node's row.

use std::collections::HashMap;
use std::fmt;

use netinv_api::{ApicClient, NodeFirmware, SdwanClient, SdwanDevice, TransportConfig, controller_url};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{InventoryRecord, SENTINEL_ERROR, SENTINEL_UNKNOWN};

/// Kind of controller behind an address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    Apic,
    Sdwan,
}

/// A controller to pull inventory from.
#[derive(Debug, Clone)]
pub struct ControllerTarget {
    pub kind: ControllerKind,
    pub address: String,
    pub transport: TransportConfig,
}

impl ControllerTarget {
    pub fn new(kind: ControllerKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
            transport: TransportConfig::default(),
        }
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

impl fmt::Display for ControllerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} controller {}", self.kind, self.address)
    }
}

/// Username and password for one controller.
#[derive(Clone)]
pub struct ControllerCredentials {
    pub username: String,
    pub password: SecretString,
}

impl fmt::Debug for ControllerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Supplies credentials for a controller.
///
/// The CLI prompts interactively; tests and scripted runs use
/// [`StaticCredentials`].
pub trait CredentialProvider {
    fn credentials(&self, target: &ControllerTarget) -> Result<ControllerCredentials, CoreError>;
}

/// Fixed credentials, optionally per controller address.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    fallback: Option<ControllerCredentials>,
    by_address: HashMap<String, ControllerCredentials>,
}

impl StaticCredentials {
    /// The same credentials for every controller.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password: String = password.into();
        Self {
            fallback: Some(ControllerCredentials {
                username: username.into(),
                password: SecretString::from(password),
            }),
            by_address: HashMap::new(),
        }
    }

    /// Credentials for one controller address only.
    pub fn with_address(mut self, address: impl Into<String>, credentials: ControllerCredentials) -> Self {
        self.by_address.insert(address.into(), credentials);
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self, target: &ControllerTarget) -> Result<ControllerCredentials, CoreError> {
        self.by_address
            .get(&target.address)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| CoreError::Credentials {
                target: target.to_string(),
                reason: "no credentials configured".into(),
            })
    }
}

// ── Fetching ─────────────────────────────────────────────────────────

/// Fetch and normalize the node inventory of one controller.
pub async fn fetch_controller_inventory(
    target: &ControllerTarget,
    credentials: &ControllerCredentials,
) -> Result<Vec<InventoryRecord>, CoreError> {
    match target.kind {
        ControllerKind::Apic => fetch_apic_inventory(target, credentials).await,
        ControllerKind::Sdwan => fetch_sdwan_inventory(target, credentials).await,
    }
}

/// Fabric nodes as `(name, "apic-<model>", firmware, None, serial)`.
pub async fn fetch_apic_inventory(
    target: &ControllerTarget,
    credentials: &ControllerCredentials,
) -> Result<Vec<InventoryRecord>, CoreError> {
    let client = ApicClient::new(controller_url(&target.address)?, &target.transport)?;

    info!(controller = %target.address, "logging in to fabric controller");
    client
        .login(&credentials.username, &credentials.password)
        .await?;

    let nodes = client.list_fabric_nodes().await?;
    info!(controller = %target.address, nodes = nodes.len(), "fabric nodes listed");

    let mut records = Vec::with_capacity(nodes.len());
    for node in nodes {
        let software_version = match client.node_firmware(&node.dn).await {
            Ok(NodeFirmware::Running(version)) => version,
            Ok(NodeFirmware::Ambiguous { total_count }) => {
                warn!(node = %node.name, ?total_count, "firmware lookup was ambiguous");
                SENTINEL_UNKNOWN.to_owned()
            }
            Err(e) => {
                warn!(node = %node.name, error = %e, "firmware lookup failed");
                SENTINEL_ERROR.to_owned()
            }
        };

        records.push(InventoryRecord {
            device_os: format!("apic-{}", node.model),
            device_name: node.name,
            software_version,
            uptime: None,
            serial_number: node.serial,
        });
    }

    Ok(records)
}

/// WAN edge and controller devices as
/// `(host-name, "sdwan-<model>", version, uptime, board-serial)`.
pub async fn fetch_sdwan_inventory(
    target: &ControllerTarget,
    credentials: &ControllerCredentials,
) -> Result<Vec<InventoryRecord>, CoreError> {
    let client = SdwanClient::new(controller_url(&target.address)?, &target.transport)?;

    info!(controller = %target.address, "logging in to WAN controller");
    client
        .login(&credentials.username, &credentials.password)
        .await?;

    let listed = client.list_devices().await;

    if let Err(e) = client.logout().await {
        debug!(controller = %target.address, error = %e, "logout failed");
    }

    let devices = listed?;
    info!(controller = %target.address, devices = devices.len(), "WAN devices listed");

    let now_ms = chrono::Utc::now().timestamp_millis();
    Ok(devices
        .into_iter()
        .map(|device| sdwan_record(device, now_ms))
        .collect())
}

fn sdwan_record(device: SdwanDevice, now_ms: i64) -> InventoryRecord {
    InventoryRecord {
        device_os: format!("sdwan-{}", device.device_model),
        device_name: device.host_name,
        software_version: device
            .version
            .unwrap_or_else(|| SENTINEL_UNKNOWN.to_owned()),
        uptime: device
            .uptime_date
            .and_then(|since| format_uptime_since(since, now_ms)),
        serial_number: device
            .board_serial
            .unwrap_or_else(|| SENTINEL_UNKNOWN.to_owned()),
    }
}

/// Elapsed time between two epoch-millisecond stamps as
/// `"{d} days, {h} hours, {m} minutes"`. `None` if `since` is in the future.
pub fn format_uptime_since(since_ms: i64, now_ms: i64) -> Option<String> {
    let elapsed = chrono::Duration::try_milliseconds(now_ms.checked_sub(since_ms)?)?;
    if elapsed < chrono::Duration::zero() {
        return None;
    }
    Some(format!(
        "{} days, {} hours, {} minutes",
        elapsed.num_days(),
        elapsed.num_hours() % 24,
        elapsed.num_minutes() % 60
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn uptime_from_epoch_millis() {
        let now = 1_700_000_000_000;
        let since = now - (3 * DAY + 4 * HOUR + 5 * MINUTE + 59_000);
        assert_eq!(
            format_uptime_since(since, now).as_deref(),
            Some("3 days, 4 hours, 5 minutes")
        );
        assert_eq!(format_uptime_since(now + 1, now), None);
    }

    #[test]
    fn sdwan_record_defaults() {
        let device = SdwanDevice {
            host_name: "vedge1".into(),
            device_model: "vedge-cloud".into(),
            version: None,
            uptime_date: None,
            board_serial: None,
        };
        let record = sdwan_record(device, 0);
        assert_eq!(record.device_os, "sdwan-vedge-cloud");
        assert_eq!(record.software_version, "Unknown");
        assert_eq!(record.serial_number, "Unknown");
        assert_eq!(record.uptime, None);
    }

    #[test]
    fn controller_kind_from_text() {
        assert_eq!("APIC".parse::<ControllerKind>().unwrap(), ControllerKind::Apic);
        assert_eq!(ControllerKind::Sdwan.to_string(), "sdwan");
    }

    #[test]
    fn static_credentials_prefer_address() {
        let creds = StaticCredentials::new("admin", "pw").with_address(
            "apic.lab",
            ControllerCredentials {
                username: "fabric".into(),
                password: SecretString::from("x".to_owned()),
            },
        );
        let apic = ControllerTarget::new(ControllerKind::Apic, "apic.lab");
        let wan = ControllerTarget::new(ControllerKind::Sdwan, "vmanage.lab");
        assert_eq!(creds.credentials(&apic).unwrap().username, "fabric");
        assert_eq!(creds.credentials(&wan).unwrap().username, "admin");
    }

    #[test]
    fn missing_static_credentials() {
        let target = ControllerTarget::new(ControllerKind::Apic, "apic.lab");
        let err = StaticCredentials::default().credentials(&target).unwrap_err();
        assert!(matches!(err, CoreError::Credentials { .. }));
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = ControllerCredentials {
            username: "admin".into(),
            password: SecretString::from("hunter2".to_owned()),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
    }
}
