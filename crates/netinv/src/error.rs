//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use netinv_config::ConfigError;
use netinv_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TESTBED: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Testbed ──────────────────────────────────────────────────────
    #[error("Could not load testbed {path}")]
    #[diagnostic(
        code(netinv::testbed),
        help(
            "{message}\n\
             A testbed lists devices with their os and capture files:\n  \
             devices:\n    R1:\n      os: ios\n      captures:\n        show version: R1/version.txt"
        )
    )]
    Testbed { path: String, message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("No device in testbed '{testbed}' could be reached")]
    #[diagnostic(
        code(netinv::no_reachable_devices),
        help("Run with -v to see why each device failed to connect.")
    )]
    NoReachableDevices { testbed: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No credentials for {target}")]
    #[diagnostic(
        code(netinv::no_credentials),
        help(
            "{reason}\n\
             Set NETINV_USERNAME and NETINV_PASSWORD, store the password in the keyring \
             (service 'netinv', entry '<address>/password'), or run interactively."
        )
    )]
    Credentials { target: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netinv::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(netinv::config),
        help("Check the config file passed with --config or at the platform config path.")
    )]
    Config { message: String },

    // ── Report ───────────────────────────────────────────────────────
    #[error("Could not write the inventory report")]
    #[diagnostic(code(netinv::report), help("Check that --output-dir exists and is writable."))]
    Report {
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    #[diagnostic(code(netinv::run))]
    Run(CoreError),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(netinv::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(netinv::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Testbed { .. } => exit_code::TESTBED,
            Self::NoReachableDevices { .. } => exit_code::CONNECTION,
            Self::Credentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Testbed { path, message } => CliError::Testbed { path, message },
            CoreError::NoReachableDevices { testbed } => CliError::NoReachableDevices { testbed },
            CoreError::Credentials { target, reason } => CliError::Credentials { target, reason },
            CoreError::Csv(_) | CoreError::Io(_) => CliError::Report { source: err },
            other => CliError::Run(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other @ ConfigError::Figment(_) => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_failure_class() {
        let testbed: CliError = CoreError::Testbed {
            path: "tb.yaml".into(),
            message: "missing".into(),
        }
        .into();
        assert_eq!(testbed.exit_code(), exit_code::TESTBED);

        let unreachable: CliError = CoreError::NoReachableDevices {
            testbed: "lab".into(),
        }
        .into();
        assert_eq!(unreachable.exit_code(), exit_code::CONNECTION);

        let creds: CliError = CoreError::Credentials {
            target: "apic controller apic.lab".into(),
            reason: "not a terminal".into(),
        }
        .into();
        assert_eq!(creds.exit_code(), exit_code::AUTH);

        let other: CliError = CoreError::Session {
            device: "R1".into(),
            message: "closed".into(),
        }
        .into();
        assert_eq!(other.exit_code(), exit_code::GENERAL);
    }
}
