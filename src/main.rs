//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use pmake::engine::EngineError;
use pmake::makefile::MakefileError;
use pmake::{cli::Cli, runner};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
    match runner::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

/// Log the failure and render diagnostics through miette.
fn report(err: anyhow::Error) {
    tracing::error!("pmake failed: {err:#}");
    let diagnostic = match err.downcast::<MakefileError>() {
        Ok(makefile_err) => miette::Report::new(makefile_err),
        Err(other) => match other.downcast::<EngineError>() {
            Ok(engine_err) => miette::Report::new(engine_err),
            Err(_) => return,
        },
    };
    drop(writeln!(io::stderr(), "{diagnostic:?}"));
}
