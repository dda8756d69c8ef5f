// Replay session over captured CLI output.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use super::{DeviceSession, normalize_command};
use crate::error::CoreError;
use crate::model::DeviceOs;

/// A session that answers commands from capture files on disk.
///
/// Each command maps to one text file holding what the device printed.
/// Connecting checks that every listed capture exists; executing a command
/// with no capture is a session error, like a device rejecting it.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    name: String,
    os: DeviceOs,
    captures: IndexMap<String, PathBuf>,
    connected: bool,
}

impl CaptureSession {
    pub fn new(name: impl Into<String>, os: DeviceOs) -> Self {
        Self {
            name: name.into(),
            os,
            captures: IndexMap::new(),
            connected: false,
        }
    }

    /// Register the capture file for `command`.
    pub fn with_capture(mut self, command: &str, path: impl Into<PathBuf>) -> Self {
        self.captures
            .insert(normalize_command(command), path.into());
        self
    }

    fn session_error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Session {
            device: self.name.clone(),
            message: message.into(),
        }
    }
}

impl DeviceSession for CaptureSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn os(&self) -> &DeviceOs {
        &self.os
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), CoreError> {
        if self.captures.is_empty() {
            return Err(self.session_error("no captures configured"));
        }
        for path in self.captures.values() {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(
                    self.session_error(format!("capture {} does not exist", path.display()))
                );
            }
        }
        debug!(device = %self.name, captures = self.captures.len(), "capture session opened");
        self.connected = true;
        Ok(())
    }

    async fn execute(&mut self, command: &str) -> Result<String, CoreError> {
        if !self.connected {
            return Err(self.session_error("not connected"));
        }
        let Some(path) = self.captures.get(&normalize_command(command)) else {
            return Err(self.session_error(format!("no capture for '{command}'")));
        };
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| self.session_error(format!("reading {}: {e}", path.display())))
    }

    async fn disconnect(&mut self) -> Result<(), CoreError> {
        self.connected = false;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn executes_registered_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ver.txt");
        std::fs::write(&path, "Cisco IOS Software, Version 15.2(4)M7").unwrap();

        let mut session = CaptureSession::new("R1", DeviceOs::Ios).with_capture("show version", &path);
        session.connect().await.unwrap();

        let out = session.execute("SHOW   version").await.unwrap();
        assert!(out.contains("15.2(4)M7"));
    }

    #[tokio::test]
    async fn unknown_command_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ver.txt");
        std::fs::write(&path, "x").unwrap();

        let mut session = CaptureSession::new("R1", DeviceOs::Ios).with_capture("show version", &path);
        session.connect().await.unwrap();

        let err = session.execute("show inventory").await.unwrap_err();
        assert!(matches!(err, CoreError::Session { .. }));
    }

    #[tokio::test]
    async fn connect_fails_on_missing_capture() {
        let mut session =
            CaptureSession::new("R1", DeviceOs::Ios).with_capture("show version", "/nonexistent/x.txt");
        assert!(session.connect().await.is_err());
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn execute_requires_connect() {
        let mut session = CaptureSession::new("R1", DeviceOs::Ios);
        assert!(session.execute("show version").await.is_err());
    }
}
