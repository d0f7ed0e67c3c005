//! Error types for the runner module.

// The miette/thiserror derives trip `unused_assignments` on some toolchains
// and not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while running a single action.
#[derive(Debug, Error, Diagnostic)]
pub enum ActionError {
    /// The program could not be started.
    #[error("failed to launch `{command}`")]
    #[diagnostic(
        code(pmake::action::launch),
        help("check that the program exists and is on PATH")
    )]
    Launch {
        /// The command line, joined by spaces.
        command: String,
        /// Underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// The program ran and reported failure.
    #[error("`{command}` failed with {status}")]
    #[diagnostic(code(pmake::action::failed))]
    Failed {
        /// The command line, joined by spaces.
        command: String,
        /// Exit status reported by the child.
        status: ExitStatus,
    },
}

impl ActionError {
    /// The command line that failed.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::Launch { command, .. } | Self::Failed { command, .. } => command,
        }
    }
}
