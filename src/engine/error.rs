//! Error types for graph evaluation.

// The miette/thiserror derives trip `unused_assignments` on some toolchains
// and not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::runner::ActionError;
use crate::staleness::StatError;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Errors that abort an evaluation.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    /// The requested target is not in the graph.
    #[error("unknown target `{name}`")]
    #[diagnostic(
        code(pmake::engine::unknown_target),
        help("run with --print to list the declared targets")
    )]
    UnknownTarget {
        /// The requested name.
        name: String,
    },

    /// No target was requested and the graph is empty.
    #[error("no targets to build")]
    #[diagnostic(code(pmake::engine::no_targets))]
    NoTargets,

    /// A target depends on itself, directly or indirectly.
    #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
    #[diagnostic(code(pmake::engine::cycle))]
    Cycle {
        /// Target names around the loop; the first name is repeated last.
        cycle: Vec<String>,
    },

    /// A modification time could not be read.
    #[error(transparent)]
    #[diagnostic(code(pmake::engine::stat))]
    Stat(#[from] StatError),

    /// One of a target's actions failed.
    #[error("building `{target}` failed")]
    #[diagnostic(code(pmake::engine::action))]
    Action {
        /// Target whose action failed.
        target: String,
        /// The action failure.
        #[source]
        #[diagnostic_source]
        source: ActionError,
    },

    /// A worker thread could not be started.
    #[error("could not start a worker for `{target}`")]
    #[diagnostic(code(pmake::engine::spawn))]
    Spawn {
        /// Prerequisite the worker would have evaluated.
        target: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked.
    #[error("worker evaluating `{target}` panicked")]
    #[diagnostic(code(pmake::engine::panic))]
    WorkerPanicked {
        /// Prerequisite the worker was evaluating.
        target: String,
    },
}
