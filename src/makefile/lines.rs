//! Line classification for Makefile text.

use crate::graph::Declaration;
use thiserror::Error;

/// Why a line could not be read as a declaration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A non-action line without a `:` separator.
    #[error("expected `target : prerequisites`, found no `:`")]
    MissingColon,
    /// Nothing precedes the `:`.
    #[error("target line does not name a target")]
    MissingTargetName,
    /// More than one word precedes the `:`.
    #[error("expected one target before `:`, found `{found}`")]
    MultipleTargets {
        /// The words found before the colon.
        found: String,
    },
}

/// A single classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank or comment line; never opens or closes a target.
    Ignored,
    /// `name : prereq ...`
    Header {
        /// Target name.
        name: &'a str,
        /// Prerequisite names, possibly empty.
        prerequisites: Vec<&'a str>,
    },
    /// Tab-indented command words.
    Action(Vec<&'a str>),
}

impl Line<'_> {
    /// Convert into a graph declaration, or `None` for ignored lines.
    #[must_use]
    pub fn into_declaration(self) -> Option<Declaration> {
        match self {
            Self::Ignored => None,
            Self::Header {
                name,
                prerequisites,
            } => Some(Declaration::target(name, prerequisites)),
            Self::Action(words) => Some(Declaration::action(words)),
        }
    }
}

/// Whether the line is empty or a comment once leading tabs and spaces are
/// removed.
///
/// ```
/// use pmake::makefile::is_comment_or_blank;
///
/// assert!(is_comment_or_blank("\t  # note"));
/// assert!(is_comment_or_blank(" \t "));
/// assert!(!is_comment_or_blank("app : main.o"));
/// ```
#[must_use]
pub fn is_comment_or_blank(line: &str) -> bool {
    let rest = line.trim_start_matches([' ', '\t']);
    rest.is_empty() || rest.starts_with('#')
}

/// Whether the line is an action line (starts with a tab).
#[must_use]
pub fn is_action_line(line: &str) -> bool {
    line.starts_with('\t')
}

/// Classify one line with its terminator already removed.
///
/// # Errors
///
/// Returns [`SyntaxError`] when a header line is malformed.
pub fn classify(line: &str) -> Result<Line<'_>, SyntaxError> {
    if is_comment_or_blank(line) {
        return Ok(Line::Ignored);
    }
    if is_action_line(line) {
        return Ok(Line::Action(line.split_ascii_whitespace().collect()));
    }
    let (head, tail) = line.split_once(':').ok_or(SyntaxError::MissingColon)?;
    let mut names = head.split_ascii_whitespace();
    let name = names.next().ok_or(SyntaxError::MissingTargetName)?;
    if names.next().is_some() {
        return Err(SyntaxError::MultipleTargets {
            found: head.trim().to_owned(),
        });
    }
    Ok(Line::Header {
        name,
        prerequisites: tail.split_ascii_whitespace().collect(),
    })
}
