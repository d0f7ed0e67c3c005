//! Graph construction from classified declarations.

use super::{Action, BuildGraph, TargetId};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// One classified Makefile line that contributes to the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// `name : prereq ...`; opens (or reopens) a target.
    Target {
        /// Target name.
        name: String,
        /// Prerequisite names in the order written.
        prerequisites: Vec<String>,
    },
    /// A command belonging to the most recently opened target.
    Action {
        /// Program followed by its arguments.
        args: Vec<String>,
    },
}

impl Declaration {
    /// Convenience constructor for a target header.
    pub fn target<I, S>(name: impl Into<String>, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Target {
            name: name.into(),
            prerequisites: prerequisites.into_iter().map(Into::into).collect(),
        }
    }

    /// Convenience constructor for an action line.
    pub fn action<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Action {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors raised while linking declarations into a graph.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An action appeared before any target header.
    #[error("action `{action}` appears before any target")]
    #[diagnostic(
        code(pmake::graph::orphan_action),
        help("indent actions with a tab beneath a `target : prerequisites` line")
    )]
    OrphanAction {
        /// The offending command text.
        action: String,
    },

    /// An action declaration carried no words.
    #[error("action for `{target}` has no command")]
    #[diagnostic(code(pmake::graph::empty_action))]
    EmptyAction {
        /// Target the action was attached to.
        target: String,
    },

    /// A target or prerequisite name was empty.
    #[error("target names must not be empty")]
    #[diagnostic(code(pmake::graph::empty_name))]
    EmptyName,
}

/// Incrementally links declarations into a [`BuildGraph`].
///
/// Feeding declarations one at a time lets callers attach source locations to
/// any [`GraphError`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: BuildGraph,
    current: Option<TargetId>,
}

impl GraphBuilder {
    /// Start with an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one declaration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for orphaned or empty actions and empty names.
    pub fn push(&mut self, declaration: Declaration) -> Result<(), GraphError> {
        match declaration {
            Declaration::Target {
                name,
                prerequisites,
            } => self.declare_target(&name, &prerequisites),
            Declaration::Action { args } => self.attach_action(args),
        }
    }

    /// Consume the builder, yielding the finished graph.
    #[must_use]
    pub fn finish(self) -> BuildGraph {
        self.graph
    }

    fn declare_target(&mut self, name: &str, prerequisites: &[String]) -> Result<(), GraphError> {
        if name.is_empty() || prerequisites.iter().any(String::is_empty) {
            return Err(GraphError::EmptyName);
        }
        let id = self.graph.intern(name);
        let links: Vec<TargetId> = prerequisites
            .iter()
            .map(|prereq| self.graph.intern(prereq))
            .collect();
        debug!(name, prerequisites = links.len(), "declared target");
        if let Some(target) = self.graph.target_mut(id) {
            target.declared = true;
            target.prerequisites.extend(links);
        }
        self.current = Some(id);
        Ok(())
    }

    fn attach_action(&mut self, args: Vec<String>) -> Result<(), GraphError> {
        let Some(id) = self.current else {
            return Err(GraphError::OrphanAction {
                action: args.join(" "),
            });
        };
        let Some(target) = self.graph.target_mut(id) else {
            return Err(GraphError::OrphanAction {
                action: args.join(" "),
            });
        };
        let action = Action::new(args).ok_or_else(|| GraphError::EmptyAction {
            target: target.name.clone(),
        })?;
        target.actions.push(action);
        Ok(())
    }
}

impl BuildGraph {
    /// Link a complete declaration sequence into a graph.
    ///
    /// Target names are interned on first sight, whether as a header or as a
    /// prerequisite, so every reference resolves to a single target.
    /// Redeclaring a target appends to its prerequisites and actions.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] encountered.
    pub fn build<I>(declarations: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let mut builder = GraphBuilder::new();
        for declaration in declarations {
            builder.push(declaration)?;
        }
        Ok(builder.finish())
    }
}
