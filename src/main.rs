//! shelf: export a Calibre library into a static, browsable catalog.

mod cli;
mod commands;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use shelf_config::Config;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive())))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let outcome = run(cli, &mut std::io::stdout().lock());
    exit_code(outcome, &mut std::io::stderr())
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Export(args) => commands::export(args, config, out),
        Command::List(args) => commands::list(args, config, out),
        Command::Open(args) => commands::open(args, config, out),
    }
}

/// Success is exit code 0. A failure prints the error tree to `err` and
/// exits with code 1.
fn exit_code(outcome: Result<()>, err: &mut impl Write) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}
