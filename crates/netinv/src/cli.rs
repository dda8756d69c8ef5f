//! Clap derive structures for the `netinv` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netinv -- hardware and software inventory for network devices
#[derive(Debug, Parser)]
#[command(
    name = "netinv",
    version,
    about = "Collect network device inventory into a CSV report",
    long_about = "Runs `show version` and `show inventory` on every device in a testbed,\n\
        normalizes software version, uptime, and chassis serial per OS, optionally\n\
        merges fabric (APIC) and SD-WAN controller inventories, and writes\n\
        <timestamp>_<testbed>_network_inventory.csv.",
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Testbed YAML describing the devices to inventory
    #[arg(value_name = "TESTBED", required = true)]
    pub testbed: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Fabric (APIC) controller to merge into the report
    #[arg(long, value_name = "ADDR", env = "NETINV_APIC_ADDRESS")]
    pub apic_address: Option<String>,

    /// SD-WAN controller to merge into the report
    #[arg(long, value_name = "ADDR", env = "NETINV_SDWAN_ADDRESS")]
    pub sdwan_address: Option<String>,

    /// Directory for the CSV report (default: current directory)
    #[arg(long, value_name = "DIR", env = "NETINV_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Per-command and per-request timeout in seconds
    #[arg(long, value_name = "SECS", env = "NETINV_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Accept self-signed controller certificates
    #[arg(long, short = 'k', env = "NETINV_INSECURE")]
    pub insecure: bool,

    /// PEM CA certificate to trust for controller connections
    #[arg(long, value_name = "PEM")]
    pub ca_cert: Option<PathBuf>,

    /// Summary printed after the report is written
    #[arg(long, short = 'f', value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Config file (default: platform config dir)
    #[arg(long, value_name = "PATH", env = "NETINV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output Format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// No summary, only the report file
    None,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
