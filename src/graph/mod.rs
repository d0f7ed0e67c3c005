//! In-memory dependency graph.
//!
//! A [`BuildGraph`] owns every [`Target`] declared or referenced by a
//! Makefile. Targets live in an insertion-ordered arena keyed by name, so a
//! name always resolves to exactly one target and the first declared target is
//! cheap to find. Prerequisite links are [`TargetId`] indices into that arena:
//! a target refers to its prerequisites, it never owns them.
//!
//! ```
//! use pmake::graph::{BuildGraph, Declaration};
//!
//! let graph = BuildGraph::build([
//!     Declaration::target("app", ["main.o"]),
//!     Declaration::action(["cc", "-o", "app", "main.o"]),
//! ])
//! .expect("valid declarations");
//! let app = graph.lookup("app").expect("app is declared");
//! assert_eq!(graph.default_target(), Some(app));
//! assert_eq!(graph.len(), 2);
//! ```

mod builder;

pub use builder::{Declaration, GraphBuilder, GraphError};

use indexmap::IndexMap;
use std::fmt;

/// Index of a [`Target`] inside a [`BuildGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    /// Position of the target in first-seen order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One external command attached to a target.
///
/// The argument vector is never empty: the first word names the program and
/// the rest are its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    args: Vec<String>,
}

impl Action {
    /// Build an action from its words, returning `None` for an empty vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use pmake::graph::Action;
    ///
    /// let action = Action::new(["rm", "-f", "app"]).expect("non-empty");
    /// assert_eq!(action.program(), "rm");
    /// assert_eq!(action.to_string(), "rm -f app");
    /// assert!(Action::new(Vec::<String>::new()).is_none());
    /// ```
    #[must_use]
    pub fn new<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = words.into_iter().map(Into::into).collect();
        if args.is_empty() {
            None
        } else {
            Some(Self { args })
        }
    }

    /// Program name followed by its arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program to launch.
    #[must_use]
    pub fn program(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }

    /// Arguments passed to [`Action::program`].
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// A named build unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    name: String,
    declared: bool,
    prerequisites: Vec<TargetId>,
    actions: Vec<Action>,
}

impl Target {
    fn new(name: String) -> Self {
        Self {
            name,
            declared: false,
            prerequisites: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Target name; also the file path checked for staleness.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prerequisite links in declaration order. Repeated names yield repeated
    /// links.
    #[must_use]
    pub fn prerequisites(&self) -> &[TargetId] {
        &self.prerequisites
    }

    /// Actions in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Whether the target appeared as a header, rather than only as another
    /// target's prerequisite.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.declared
    }

    /// A target that was never given prerequisites or actions.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.prerequisites.is_empty() && self.actions.is_empty()
    }
}

/// Arena of targets indexed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildGraph {
    targets: IndexMap<String, Target>,
}

impl BuildGraph {
    /// Resolve a target name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TargetId> {
        self.targets.get_index_of(name).map(TargetId)
    }

    /// Fetch a target by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn target(&self, id: TargetId) -> &Target {
        self.get(id)
            .unwrap_or_else(|| panic!("target id {} is out of range", id.0))
    }

    /// Fetch a target by id, returning `None` for foreign ids.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get_index(id.0).map(|(_, target)| target)
    }

    /// All targets in first-seen order.
    pub fn targets(&self) -> impl ExactSizeIterator<Item = (TargetId, &Target)> {
        self.targets
            .values()
            .enumerate()
            .map(|(idx, target)| (TargetId(idx), target))
    }

    /// The first target seen, built when no target is requested.
    #[must_use]
    pub fn default_target(&self) -> Option<TargetId> {
        (!self.targets.is_empty()).then_some(TargetId(0))
    }

    /// Number of distinct targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the graph holds no targets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Return the id for `name`, creating an empty placeholder when absent.
    fn intern(&mut self, name: &str) -> TargetId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let (idx, _) = self
            .targets
            .insert_full(name.to_owned(), Target::new(name.to_owned()));
        TargetId(idx)
    }

    fn target_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.targets.get_index_mut(id.0).map(|(_, target)| target)
    }
}
