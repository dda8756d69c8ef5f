//! Configuration for netinv.
//!
//! TOML defaults and named controller profiles, merged with `NETINV_`
//! environment overrides, plus the credential chain (env → keyring →
//! plaintext) the CLI consults before prompting.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use netinv_core::{ControllerKind, ControllerTarget, TlsMode, TransportConfig};

/// Keyring service name for stored controller passwords.
pub const KEYRING_SERVICE: &str = "netinv";
pub const ENV_USERNAME: &str = "NETINV_USERNAME";
pub const ENV_PASSWORD: &str = "NETINV_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles, matched to `--apic-address` /
    /// `--sdwan-address` by kind and address.
    #[serde(default)]
    pub controllers: BTreeMap<String, ControllerProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Seconds allowed for each device command and controller request.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    /// Where report files go; the working directory when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Summary format: "table", "json", "yaml", or "none".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
            output_dir: None,
            format: default_format(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_format() -> String {
    "table".into()
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerProfile {
    pub kind: ControllerKind,

    /// Host, host:port, or base URL, as passed on the command line.
    pub address: String,

    pub username: Option<String>,

    /// Plaintext password (prefer keyring or `NETINV_PASSWORD`).
    pub password: Option<String>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Path to a PEM CA certificate to trust.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Config {
    /// The profile for a controller of `kind` at `address`, if any.
    pub fn profile_for(&self, kind: ControllerKind, address: &str) -> Option<(&str, &ControllerProfile)> {
        let wanted = normalize_address(address);
        self.controllers
            .iter()
            .find(|(_, p)| p.kind == kind && normalize_address(&p.address) == wanted)
            .map(|(name, p)| (name.as_str(), p))
    }

    /// Validate values figment cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.defaults.format.as_str(), "table" | "json" | "yaml" | "none") {
            return Err(ConfigError::Validation {
                field: "defaults.format".into(),
                reason: format!(
                    "expected 'table', 'json', 'yaml', or 'none', got '{}'",
                    self.defaults.format
                ),
            });
        }
        if self.defaults.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        for (name, profile) in &self.controllers {
            if profile.address.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("controllers.{name}.address"),
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}

fn normalize_address(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    address
        .split_once("://")
        .map_or(address, |(_, rest)| rest)
        .to_ascii_lowercase()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netinv", "netinv").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netinv");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the platform path) and the environment.
///
/// A missing file is not an error. Environment keys nest on `__`, so
/// `NETINV_DEFAULTS__TIMEOUT=60` overrides `defaults.timeout`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(
            Env::prefixed("NETINV_")
                .ignore(&["USERNAME", "PASSWORD"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Transport ───────────────────────────────────────────────────────

/// TLS mode from the effective settings. `insecure` wins over a CA file.
pub fn tls_mode(insecure: bool, ca_cert: Option<&Path>) -> TlsMode {
    if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsMode::CustomCa(path.to_path_buf())
    } else {
        TlsMode::System
    }
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub insecure: bool,
    pub ca_cert: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// Build a controller target, layering flags over profile over defaults.
pub fn controller_target(
    config: &Config,
    kind: ControllerKind,
    address: &str,
    overrides: &Overrides,
) -> ControllerTarget {
    let profile = config.profile_for(kind, address).map(|(_, p)| p);

    let insecure = overrides.insecure
        || profile
            .and_then(|p| p.insecure)
            .unwrap_or(config.defaults.insecure);
    let ca_cert = overrides
        .ca_cert
        .as_deref()
        .or_else(|| profile.and_then(|p| p.ca_cert.as_deref()));
    let timeout = overrides
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);

    let transport = TransportConfig {
        tls: tls_mode(insecure, ca_cert),
        timeout: Duration::from_secs(timeout),
        cookie_jar: None,
    };
    ControllerTarget::new(kind, address).with_transport(transport)
}

// ── Credential resolution (without prompting) ───────────────────────

/// Whatever the config and environment know about a controller login.
#[derive(Debug, Default)]
pub struct PartialCredentials {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// Resolve credentials for `target` from config, env, and keyring.
///
/// Username: profile → `NETINV_USERNAME`. Password: `NETINV_PASSWORD` →
/// keyring (`netinv`, `<address>/password`) → plaintext profile value.
pub fn resolve_credentials(config: &Config, target: &ControllerTarget) -> PartialCredentials {
    resolve_credentials_with(
        config,
        target,
        |name| std::env::var(name).ok(),
        |account| {
            keyring::Entry::new(KEYRING_SERVICE, account)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

/// [`resolve_credentials`] with injectable env and keyring lookups.
pub fn resolve_credentials_with<E, K>(
    config: &Config,
    target: &ControllerTarget,
    env: E,
    keyring: K,
) -> PartialCredentials
where
    E: Fn(&str) -> Option<String>,
    K: Fn(&str) -> Option<String>,
{
    let profile = config
        .profile_for(target.kind, &target.address)
        .map(|(_, p)| p);

    let username = profile
        .and_then(|p| p.username.clone())
        .or_else(|| env(ENV_USERNAME));

    let password = env(ENV_PASSWORD)
        .or_else(|| keyring(&keyring_account(&target.address)))
        .or_else(|| profile.and_then(|p| p.password.clone()))
        .map(SecretString::from);

    PartialCredentials { username, password }
}

/// Keyring account for a controller address.
pub fn keyring_account(address: &str) -> String {
    format!("{}/password", normalize_address(address))
}
