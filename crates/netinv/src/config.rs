//! CLI-aware configuration: flags layered over the config file.

use std::path::PathBuf;
use std::time::Duration;

use netinv_config::{Config, Overrides, controller_target, load_config};
use netinv_core::{ControllerKind, ControllerTarget};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a run needs once flags and config are merged.
#[derive(Debug)]
pub struct Settings {
    pub config: Config,
    pub command_timeout: Duration,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub controllers: Vec<ControllerTarget>,
}

pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let config = load_config(global.config.as_deref())?;

    let timeout = global.timeout.unwrap_or(config.defaults.timeout);
    if timeout == 0 {
        return Err(CliError::Validation {
            field: "--timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let format = match global.format {
        Some(format) => format,
        None => parse_format(&config.defaults.format)?,
    };

    let output_dir = global
        .output_dir
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let overrides = Overrides {
        insecure: global.insecure,
        ca_cert: global.ca_cert.clone(),
        timeout: global.timeout,
    };

    let requested = [
        (ControllerKind::Apic, global.apic_address.as_deref()),
        (ControllerKind::Sdwan, global.sdwan_address.as_deref()),
    ];
    let controllers = requested
        .into_iter()
        .filter_map(|(kind, address)| Some((kind, address?.trim())))
        .filter(|(_, address)| !address.is_empty())
        .map(|(kind, address)| controller_target(&config, kind, address, &overrides))
        .collect();

    Ok(Settings {
        config,
        command_timeout: Duration::from_secs(timeout),
        output_dir,
        format,
        controllers,
    })
}

fn parse_format(value: &str) -> Result<OutputFormat, CliError> {
    match value {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "yaml" => Ok(OutputFormat::Yaml),
        "none" => Ok(OutputFormat::None),
        other => Err(CliError::Validation {
            field: "defaults.format".into(),
            reason: format!("unknown format '{other}'"),
        }),
    }
}
