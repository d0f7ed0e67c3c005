//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the Makefile, optionally prints it, and evaluates the requested
//! target with the selected strategy. Actions themselves are launched by the
//! [`ActionRunner`] implementations in [`process`].

mod error;
pub mod process;

pub use error::ActionError;
pub use process::{ActionRunner, DryRunRunner, ProcessRunner};

use crate::cli::Cli;
use crate::engine::Engine;
use crate::graph::BuildGraph;
use crate::staleness::DiskModTimes;
use crate::{makefile, render};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// Execute the parsed [`Cli`].
///
/// # Errors
///
/// Returns an error if the Makefile cannot be loaded, the requested target is
/// unknown, or any action fails.
pub fn run(cli: &Cli) -> Result<()> {
    let workdir = cli.directory.as_deref().map(utf8_path).transpose()?;
    let makefile_path = utf8_path(&cli.makefile_path())?;
    let graph = makefile::from_path(&makefile_path)?;
    debug!(makefile = %makefile_path, targets = graph.len(), "loaded makefile");

    if cli.print {
        print_rules(&graph).context("writing rules to stdout")?;
    }

    let times = workdir
        .clone()
        .map_or_else(DiskModTimes::new, DiskModTimes::rooted);
    let process = workdir.map_or_else(ProcessRunner::new, ProcessRunner::in_dir);
    let runner: &dyn ActionRunner = if cli.dry_run {
        &DryRunRunner
    } else {
        &process
    };

    let mut engine = Engine::new(&graph, runner, &times);
    if let Some(limit) = cli.jobs {
        engine = engine.with_job_limit(limit);
    }
    let strategy = cli.strategy();
    info!(target_name = cli.target.as_deref().unwrap_or("<default>"), ?strategy, "building");
    engine.evaluate(cli.target.as_deref(), strategy)?;
    Ok(())
}

fn print_rules(graph: &BuildGraph) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(render::render(graph).as_bytes())?;
    out.flush()
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|raw| anyhow::anyhow!("path {} is not valid UTF-8", raw.display()))
}

