mod cli;
mod config;
mod error;
mod output;
mod prompt;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use netinv_core::{Assembler, RunOptions, Testbed, write_report};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::prompt::PromptCredentials;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(Command::Completions(args)) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "netinv", &mut std::io::stdout());
        return Ok(());
    }

    let Some(testbed_path) = cli.testbed else {
        return Err(CliError::Validation {
            field: "TESTBED".into(),
            reason: "a testbed file is required".into(),
        });
    };

    let settings = config::resolve(&cli.global)?;
    let testbed = Testbed::load(&testbed_path)?;
    info!(
        testbed = %testbed.name,
        devices = testbed.devices.len(),
        controllers = settings.controllers.len(),
        "starting inventory"
    );

    let cancel = CancellationToken::new();
    spawn_ctrl_c(cancel.clone());

    let options = RunOptions {
        command_timeout: settings.command_timeout,
        cancel,
    };
    let assembler = settings
        .controllers
        .iter()
        .cloned()
        .fold(Assembler::new(options), Assembler::with_controller);

    let credentials = PromptCredentials::new(&settings.config);
    let report = assembler.run_testbed(&testbed, &credentials).await?;

    let path = write_report(
        &settings.output_dir,
        &report.testbed,
        &report.started,
        &report.records,
    )?;

    output::print_output(&output::render_records(settings.format, &report.records)?);
    output::print_status(&report, &path);
    Ok(())
}

/// Cancel the run on the first ctrl-c; a second one kills the process.
fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing with the devices collected so far");
            cancel.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
