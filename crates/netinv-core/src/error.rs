// ── Core error types ──
//
// Domain errors for one inventory run. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<netinv_api::Error>` impl
// translates transport-layer errors into the variants below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Structured parsing (recoverable: degrade to raw text) ────────
    #[error("No structured parser for '{command}' on device {device} with os {os}")]
    ParserMissing {
        device: String,
        os: String,
        command: String,
    },

    #[error("Parser for '{command}' found no valid data in output from device {device}")]
    SchemaEmpty { device: String, command: String },

    // ── Extraction ───────────────────────────────────────────────────
    #[error("OS '{os}' is not supported by the inventory normalizer")]
    UnsupportedOs { os: String },

    #[error("Expected field '{path}' is missing from the command output")]
    FieldMissing { path: String },

    #[error("'{command}' output must be {expected} for this OS")]
    UnexpectedPayload {
        command: String,
        expected: &'static str,
    },

    // ── Device sessions ──────────────────────────────────────────────
    #[error("Session error on device {device}: {message}")]
    Session { device: String, message: String },

    #[error("{target} did not answer within {timeout_secs}s")]
    Timeout { target: String, timeout_secs: u64 },

    #[error("No device in testbed '{testbed}' could be reached")]
    NoReachableDevices { testbed: String },

    #[error("Failed to load testbed {path}: {message}")]
    Testbed { path: String, message: String },

    // ── Controllers ──────────────────────────────────────────────────
    #[error("Transport error talking to {target}: {reason}")]
    Transport { target: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("Controller API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("No credentials available for {target}: {reason}")]
    Credentials { target: String, reason: String },

    // ── Report output ────────────────────────────────────────────────
    #[error("Report error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Parser failures that degrade to raw-text capture instead of failing
    /// the device.
    pub fn is_parse_fallback(&self) -> bool {
        matches!(self, Self::ParserMissing { .. } | Self::SchemaEmpty { .. })
    }

    /// Extraction failures: the device was reached but its output could not
    /// be normalized.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOs { .. } | Self::FieldMissing { .. } | Self::UnexpectedPayload { .. }
        )
    }

    pub(crate) fn field_missing(path: &[&str]) -> Self {
        Self::FieldMissing {
            path: path.join("."),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netinv_api::Error> for CoreError {
    fn from(err: netinv_api::Error) -> Self {
        match err {
            netinv_api::Error::Authentication { message } => CoreError::AuthFailed { message },
            netinv_api::Error::Transport(ref e) => {
                let target = e
                    .url()
                    .and_then(|u| u.host_str().map(String::from))
                    .unwrap_or_else(|| "<unknown>".into());
                if e.is_timeout() {
                    CoreError::Timeout {
                        target,
                        timeout_secs: 0,
                    }
                } else {
                    CoreError::Transport {
                        target,
                        reason: e.to_string(),
                    }
                }
            }
            netinv_api::Error::InvalidUrl(e) => CoreError::Transport {
                target: "<invalid url>".into(),
                reason: e.to_string(),
            },
            netinv_api::Error::Tls(msg) => CoreError::Transport {
                target: "controller".into(),
                reason: format!("TLS error: {msg}"),
            },
            netinv_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            netinv_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unexpected response body: {message}"),
                status: None,
            },
        }
    }
}
