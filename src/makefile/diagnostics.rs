//! Makefile diagnostics with source spans.
//!
//! Syntax problems are reported as [`MakefileError`] values carrying the
//! offending line so `miette` can render the source with a label under it.

// The miette/thiserror derives trip `unused_assignments` on some toolchains
// and not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use super::lines::SyntaxError;
use crate::graph::GraphError;
use camino::Utf8PathBuf;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt;
use std::io;
use thiserror::Error;

/// Display name of a Makefile used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileName(String);

impl MakefileName {
    /// Wrap a display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MakefileName {
    fn default() -> Self {
        Self::new("Makefile")
    }
}

impl fmt::Display for MakefileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What went wrong on a particular line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineProblem {
    /// The line could not be classified.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The line was classified but could not be linked into the graph.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LineProblem {
    fn hint(&self, text: &str) -> Option<String> {
        match self {
            Self::Syntax(SyntaxError::MissingColon) if text.starts_with(' ') => {
                Some("actions must be indented with a tab character, not spaces".into())
            }
            Self::Syntax(SyntaxError::MissingColon) => {
                Some("declare targets as `name : prerequisites`".into())
            }
            Self::Syntax(SyntaxError::MultipleTargets { .. }) => {
                Some("declare each target on its own line".into())
            }
            Self::Syntax(SyntaxError::MissingTargetName) => None,
            Self::Graph(GraphError::OrphanAction { .. }) => {
                Some("add a `target :` line above the first action".into())
            }
            Self::Graph(_) => None,
        }
    }
}

/// Errors raised while loading a Makefile.
#[derive(Debug, Error, Diagnostic)]
pub enum MakefileError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    #[diagnostic(code(pmake::makefile::read))]
    Read {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line is malformed.
    #[error("{name}:{line}: {problem}")]
    #[diagnostic(code(pmake::makefile::syntax))]
    Syntax {
        /// Display name of the Makefile.
        name: MakefileName,
        /// One-based line number.
        line: usize,
        /// The specific problem.
        problem: LineProblem,
        /// Full Makefile text.
        #[source_code]
        src: NamedSource<String>,
        /// Location of the offending line.
        #[label("here")]
        span: SourceSpan,
        /// Suggested fix.
        #[help]
        help: Option<String>,
    },
}

impl MakefileError {
    /// The line-level problem, if this is a syntax error.
    #[must_use]
    pub const fn problem(&self) -> Option<&LineProblem> {
        match self {
            Self::Syntax { problem, .. } => Some(problem),
            Self::Read { .. } => None,
        }
    }

    /// One-based line number of a syntax error.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            Self::Read { .. } => None,
        }
    }
}

/// Location of one line inside the Makefile text.
#[derive(Debug, Clone, Copy)]
pub(super) struct LineSpan {
    pub(super) number: usize,
    pub(super) offset: usize,
    pub(super) len: usize,
}

pub(super) fn syntax_error(
    name: &MakefileName,
    source: &str,
    at: LineSpan,
    text: &str,
    problem: LineProblem,
) -> MakefileError {
    let help = problem.hint(text);
    MakefileError::Syntax {
        name: name.clone(),
        line: at.number,
        problem,
        src: NamedSource::new(name.as_str(), source.to_owned()),
        span: SourceSpan::from((at.offset, at.len)),
        help,
    }
}
