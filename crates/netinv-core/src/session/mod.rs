//! Device sessions and the testbed that describes them.
//!
//! The inventory run only needs four things from a device: identity, OS,
//! a way to run a read-only command, and connect/disconnect. [`DeviceSession`]
//! is that seam. [`CaptureSession`] serves recorded CLI output so inventories
//! can be built offline; live transports implement the same trait.

mod capture;
mod testbed;

pub use capture::CaptureSession;
pub use testbed::{DeviceSpec, Testbed};

use std::future::Future;

use crate::error::CoreError;
use crate::model::DeviceOs;

/// A handle to one CLI-managed device.
pub trait DeviceSession: Send {
    /// Device name, unique within a testbed.
    fn name(&self) -> &str;

    /// The device's OS tag.
    fn os(&self) -> &DeviceOs;

    /// Whether [`connect`](Self::connect) has succeeded and no disconnect followed.
    fn is_connected(&self) -> bool;

    /// Open the session.
    fn connect(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Run a command and return its raw text output.
    fn execute(&mut self, command: &str) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Close the session.
    fn disconnect(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Normalize a command for lookups: lowercase, single spaces.
pub(crate) fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
