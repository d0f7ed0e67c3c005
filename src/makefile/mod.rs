//! Makefile loading.
//!
//! A Makefile is a sequence of target headers (`name : prereq ...`), each
//! followed by tab-indented action lines. Blank lines and `#` comments are
//! skipped anywhere. Loading classifies every line, links the resulting
//! [`Declaration`]s into a [`BuildGraph`], and reports the first malformed line
//! as a [`MakefileError`] pointing at its source.
//!
//! ```
//! use pmake::makefile;
//!
//! let src = "app : main.o\n\tcc -o app main.o\n\n# objects\nmain.o : main.c\n\tcc -c main.c\n";
//! let graph = makefile::from_str(src).expect("parse");
//! assert_eq!(graph.len(), 3);
//! ```

mod diagnostics;
mod lines;

pub use diagnostics::{LineProblem, MakefileError, MakefileName};
pub use lines::{Line, SyntaxError, classify, is_action_line, is_comment_or_blank};

use crate::graph::{BuildGraph, Declaration, GraphBuilder};
use camino::Utf8Path;
use diagnostics::{LineSpan, syntax_error};
use std::fs;
use tracing::{Level, debug, enabled, warn};

/// Default Makefile name looked up when none is given.
pub const DEFAULT_MAKEFILE: &str = "Makefile";

/// Read and parse the Makefile at `path`.
///
/// # Errors
///
/// Returns [`MakefileError::Read`] when the file cannot be read and
/// [`MakefileError::Syntax`] for malformed lines.
pub fn from_path(path: &Utf8Path) -> Result<BuildGraph, MakefileError> {
    let source = fs::read_to_string(path).map_err(|source| MakefileError::Read {
        path: path.to_owned(),
        source,
    })?;
    from_str_named(&source, &MakefileName::new(path.as_str()))
}

/// Parse Makefile text using the default display name.
///
/// # Errors
///
/// Returns [`MakefileError::Syntax`] for malformed lines.
pub fn from_str(source: &str) -> Result<BuildGraph, MakefileError> {
    from_str_named(source, &MakefileName::default())
}

/// Parse Makefile text, naming it `name` in diagnostics.
///
/// # Errors
///
/// Returns [`MakefileError::Syntax`] for malformed lines.
pub fn from_str_named(source: &str, name: &MakefileName) -> Result<BuildGraph, MakefileError> {
    let mut builder = GraphBuilder::new();
    let mut parsed: Vec<Declaration> = Vec::new();
    for (at, text) in split_lines(source) {
        let classified = classify(text)
            .map(Line::into_declaration)
            .map_err(|err| syntax_error(name, source, at, text, err.into()))?;
        let Some(declaration) = classified else {
            continue;
        };
        if enabled!(Level::DEBUG) {
            parsed.push(declaration.clone());
        }
        builder
            .push(declaration)
            .map_err(|err| syntax_error(name, source, at, text, err.into()))?;
    }
    log_declarations(name, &parsed);
    let graph = builder.finish();
    if graph.is_empty() {
        warn!(makefile = %name, "makefile declares no targets");
    }
    Ok(graph)
}

/// Yield each line without its terminator, paired with its location.
fn split_lines(source: &str) -> impl Iterator<Item = (LineSpan, &str)> {
    let mut offset = 0;
    source
        .split_inclusive('\n')
        .enumerate()
        .map(move |(idx, raw)| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let trimmed = text.strip_suffix('\r').unwrap_or(text);
            let at = LineSpan {
                number: idx + 1,
                offset,
                len: trimmed.len(),
            };
            offset += raw.len();
            (at, trimmed)
        })
}

fn log_declarations(name: &MakefileName, parsed: &[Declaration]) {
    if parsed.is_empty() {
        return;
    }
    match serde_json::to_string_pretty(parsed) {
        Ok(json) => debug!("declarations in {name}:\n{json}"),
        Err(err) => debug!(error = %err, "could not serialise declarations"),
    }
}
