//! Makefile rendering.
//!
//! This module converts a [`BuildGraph`] back into Makefile text. Only
//! targets that appeared as headers are written; targets known solely as
//! prerequisites show up inside their dependents' headers. Reading the output
//! back yields an equivalent graph.

use crate::graph::{BuildGraph, Target};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Render `graph` as Makefile text.
///
/// # Examples
///
/// ```
/// use pmake::{makefile, render};
///
/// let graph = makefile::from_str("app : main.o\n\tcc -o app main.o\n").expect("parse");
/// assert_eq!(render::render(&graph), "app : main.o\n\tcc -o app main.o\n");
/// ```
#[must_use]
pub fn render(graph: &BuildGraph) -> String {
    DisplayGraph(graph).to_string()
}

/// Wrapper struct to display a whole graph.
struct DisplayGraph<'a>(&'a BuildGraph);

impl Display for DisplayGraph<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let declared = self.0.targets().filter(|(_, t)| t.is_declared());
        for (_, target) in declared {
            write!(
                f,
                "{}",
                DisplayTarget {
                    graph: self.0,
                    target,
                }
            )?;
        }
        Ok(())
    }
}

/// Wrapper struct to display one target with its actions.
struct DisplayTarget<'a> {
    graph: &'a BuildGraph,
    target: &'a Target,
}

impl Display for DisplayTarget<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} :", self.target.name())?;
        if !self.target.prerequisites().is_empty() {
            let names = self
                .target
                .prerequisites()
                .iter()
                .map(|id| self.graph.target(*id).name())
                .join(" ");
            write!(f, " {names}")?;
        }
        writeln!(f)?;
        for action in self.target.actions() {
            writeln!(f, "\t{action}")?;
        }
        Ok(())
    }
}
