//! `aacmd` - drive an Alnitak-compatible flat panel from the command line.
//!
//! ```text
//! aacmd <port> <CMD> [<CMD> ...]
//! ```
//!
//! Prints one acknowledgment line on stdout, then lingers for three seconds
//! unless `S` was among the commands. Exit status is 1 for usage errors and
//! connection failures, 0 otherwise (including failed device operations,
//! which show up only as a missing acknowledgment).

use std::io::{self, Write};
use std::process::ExitCode;

use aacmd::{logging, Interpreter, Outcome, VERSION};
use anyhow::{Context, Result};
use clap::Parser;
use hardware::alnitak::FlatMan;
use tracing::{error, info};

const USAGE: &str = "\
Usage: aacmd <port> <CMD> [<CMD> ...]

Commands (case insensitive, applied in order):
  L       turn the light on
  D       turn the light off
  Bnnn    set brightness to nnn, 1-255
  G       get brightness from the device
  V       print the aacmd version
  O       open (acknowledged only)
  C       close (acknowledged only)
  P       product id (acknowledged only)
  F       firmware (acknowledged only)
  S       silent: exit immediately instead of after 3 seconds

Examples:
  aacmd <port> L B200 S    turn the panel on at brightness 200
  aacmd <port> D S         turn the panel off
  aacmd <port> V           version: x.x.x
";

/// Alnitak-compatible flat panel command shim
#[derive(Parser, Debug)]
#[command(name = "aacmd")]
#[command(disable_help_flag = true)]
struct Args {
    /// Serial port of the panel; a bare number means COM<n> on Windows
    port: String,

    /// Commands to run, in order
    #[arg(required = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("aacmd: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    // The run proceeds without a log if the file can't be opened.
    if let Err(e) = logging::init() {
        eprintln!("aacmd: logging disabled: {e:#}");
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            error!("Invalid invocation: {:?}", e.kind());
            return Ok(usage());
        }
    };

    info!(
        "aacmd {} port={} commands={:?}",
        VERSION, args.port, args.commands
    );

    info!("Connecting to flat panel on {}...", args.port);
    let panel = match FlatMan::connect(&args.port) {
        Ok(panel) => panel,
        Err(e) => {
            error!("{}", e);
            eprintln!("could not connect to flat panel on {}: {e}", args.port);
            return Ok(ExitCode::FAILURE);
        }
    };

    let outcome = match Interpreter::new(panel).run(&args.commands) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Usage error: {}", e);
            return Ok(usage());
        }
    };

    emit(&outcome)?;

    info!("Done, exiting in {:?}", outcome.exit_delay);
    std::thread::sleep(outcome.exit_delay);

    Ok(ExitCode::SUCCESS)
}

fn emit(outcome: &Outcome) -> Result<()> {
    let line = outcome.acknowledgment.line();
    info!("Acknowledgment: {:?}", line);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(line.as_bytes())
        .context("failed to write acknowledgment")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn usage() -> ExitCode {
    eprint!("{USAGE}");
    ExitCode::FAILURE
}
