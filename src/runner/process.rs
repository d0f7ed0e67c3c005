//! Action execution as child processes.
//!
//! Every action is echoed to stdout before it runs. [`ProcessRunner`] then
//! launches it with inherited standard streams and blocks until it exits;
//! [`DryRunRunner`] stops after the echo.

use super::error::ActionError;
use crate::graph::Action;
use camino::Utf8PathBuf;
use std::io::{self, Write};
use std::process::Command;
use tracing::{debug, info};

/// Runs one action to completion.
pub trait ActionRunner: Sync {
    /// Execute `action`, blocking until it finishes.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the action cannot be launched or exits
    /// unsuccessfully.
    fn run(&self, action: &Action) -> Result<(), ActionError>;
}

/// Write the command line to stdout. Output failures never abort the build.
fn echo(action: &Action) {
    let mut out = io::stdout().lock();
    drop(writeln!(out, "{action}"));
    drop(out.flush());
}

/// Launches actions as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    workdir: Option<Utf8PathBuf>,
}

impl ProcessRunner {
    /// Run actions in the current working directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { workdir: None }
    }

    /// Run actions inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workdir: Some(dir.into()),
        }
    }
}

impl ActionRunner for ProcessRunner {
    fn run(&self, action: &Action) -> Result<(), ActionError> {
        echo(action);
        let mut cmd = Command::new(action.program());
        cmd.args(action.arguments());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        info!(command = %action, "running action");
        let status = cmd.status().map_err(|source| ActionError::Launch {
            command: action.to_string(),
            source,
        })?;
        debug!(command = %action, %status, "action finished");
        if status.success() {
            Ok(())
        } else {
            Err(ActionError::Failed {
                command: action.to_string(),
                status,
            })
        }
    }
}

/// Echoes actions without launching them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl ActionRunner for DryRunRunner {
    fn run(&self, action: &Action) -> Result<(), ActionError> {
        echo(action);
        Ok(())
    }
}
