// ── Command executor ──
//
// Runs one command on one device and returns structured output when a
// parser exists and finds something, raw text otherwise. Session failures
// and timeouts are not retried.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::CommandResult;
use crate::parser::ParserRegistry;
use crate::session::DeviceSession;

/// Run `command` on `session`, bounded by `timeout`.
pub async fn execute<S: DeviceSession>(
    session: &mut S,
    parsers: &ParserRegistry,
    command: &str,
    timeout: Duration,
) -> Result<CommandResult, CoreError> {
    let device = session.name().to_owned();
    let os = session.os().clone();

    info!(device = %device, "running '{command}'");

    if !parsers.has_parser(&os, command) {
        warn!(
            device = %device,
            os = %os,
            "no structured parser for '{command}', capturing raw output"
        );
    }

    let output = tokio::time::timeout(timeout, session.execute(command))
        .await
        .map_err(|_| CoreError::Timeout {
            target: device.clone(),
            timeout_secs: timeout.as_secs(),
        })??;

    match parsers.parse(&device, &os, command, &output) {
        Ok(tree) => Ok(CommandResult::Parsed(tree)),
        Err(CoreError::ParserMissing { .. }) => Ok(CommandResult::Raw(output)),
        Err(e @ CoreError::SchemaEmpty { .. }) => {
            warn!(device = %device, "{e}, capturing raw output");
            Ok(CommandResult::Raw(output))
        }
        Err(e) => Err(e),
    }
}
