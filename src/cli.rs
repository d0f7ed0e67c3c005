//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure. Settings fall back to
//! `PMAKE_`-prefixed environment variables when their flags are omitted.

use crate::engine::Strategy;
use crate::makefile::DEFAULT_MAKEFILE;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Maximum number of jobs accepted by the CLI.
const MAX_JOBS: usize = 64;

fn parse_jobs(s: &str) -> Result<NonZeroUsize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("{s} is not a valid number"))?;
    if (1..=MAX_JOBS).contains(&value) {
        NonZeroUsize::new(value).ok_or_else(|| format!("jobs must be between 1 and {MAX_JOBS}"))
    } else {
        Err(format!("jobs must be between 1 and {MAX_JOBS}"))
    }
}

/// A small make: rebuild stale targets from a Makefile, sequentially or with
/// one worker per prerequisite.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the Makefile to read.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_MAKEFILE,
        env = "PMAKE_FILE"
    )]
    pub file: PathBuf,

    /// Run as if started in this directory.
    ///
    /// The Makefile, target files, and actions are all resolved here.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Evaluate each target's prerequisites in parallel.
    #[arg(short, long)]
    pub parallel: bool,

    /// Cap how many targets may run actions at once in parallel mode.
    ///
    /// Values must be between 1 and 64. Unlimited when omitted.
    #[arg(short, long, value_name = "N", value_parser = parse_jobs, env = "PMAKE_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Print the parsed rules in Makefile syntax before building.
    #[arg(short = 'o', long = "print")]
    pub print: bool,

    /// Echo the commands that would run without running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Target to build; defaults to the first target in the Makefile.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,
}

impl Cli {
    /// Evaluation strategy selected by `--parallel`.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        Strategy::from_parallel_flag(self.parallel)
    }

    /// Makefile path with `--directory` applied.
    #[must_use]
    pub fn makefile_path(&self) -> PathBuf {
        self.directory
            .as_ref()
            .map_or_else(|| self.file.clone(), |dir| dir.join(&self.file))
    }
}
