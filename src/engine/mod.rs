//! Graph evaluation.
//!
//! The [`Engine`] walks a [`BuildGraph`] depth first, prerequisites before
//! dependents, and runs a target's actions when the staleness check says it is
//! out of date. Two strategies share that contract:
//!
//! - [`Strategy::Sequential`] evaluates prerequisites one after another on the
//!   calling thread.
//! - [`Strategy::Parallel`] evaluates every prerequisite of a target on its own
//!   scoped thread, joins them all, and only then considers the target itself.
//!
//! Neither strategy memoises: a prerequisite shared by two parents is
//! evaluated once per path that reaches it. Each walk carries the chain of
//! targets it is inside, so a dependency cycle is reported as
//! [`EngineError::Cycle`] instead of recursing forever.

mod cycle;
mod error;
mod parallel;
mod sequential;
mod slots;

pub use error::EngineError;

use crate::graph::{BuildGraph, TargetId};
use crate::runner::ActionRunner;
use crate::staleness::{self, ModTimes, Staleness};
use slots::JobSlots;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// How prerequisites are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One prerequisite at a time on the calling thread.
    #[default]
    Sequential,
    /// One scoped thread per prerequisite at every level.
    Parallel,
}

impl Strategy {
    /// Pick a strategy from the `--parallel` flag.
    #[must_use]
    pub const fn from_parallel_flag(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Evaluates targets of one graph.
pub struct Engine<'a> {
    graph: &'a BuildGraph,
    runner: &'a dyn ActionRunner,
    times: &'a dyn ModTimes,
    slots: Option<JobSlots>,
}

impl<'a> Engine<'a> {
    /// Create an engine that runs actions with `runner` and reads file times
    /// from `times`.
    #[must_use]
    pub fn new(
        graph: &'a BuildGraph,
        runner: &'a dyn ActionRunner,
        times: &'a dyn ModTimes,
    ) -> Self {
        Self {
            graph,
            runner,
            times,
            slots: None,
        }
    }

    /// Allow at most `limit` targets to run their actions at the same time.
    ///
    /// Without a limit the parallel strategy runs as many as the graph's
    /// fan-out allows.
    #[must_use]
    pub fn with_job_limit(mut self, limit: NonZeroUsize) -> Self {
        self.slots = Some(JobSlots::new(limit));
        self
    }

    /// Resolve `name`, or the first declared target when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownTarget`] for names not in the graph and
    /// [`EngineError::NoTargets`] when defaulting on an empty graph.
    pub fn resolve(&self, name: Option<&str>) -> Result<TargetId, EngineError> {
        match name {
            Some(requested) => {
                self.graph
                    .lookup(requested)
                    .ok_or_else(|| EngineError::UnknownTarget {
                        name: requested.to_owned(),
                    })
            }
            None => self.graph.default_target().ok_or(EngineError::NoTargets),
        }
    }

    /// Evaluate `name` (or the default target) with `strategy`.
    ///
    /// The target is resolved before anything runs, so an unknown name fails
    /// without side effects.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] raised; no further actions start once
    /// one has been reported on the failing path.
    pub fn evaluate(&self, name: Option<&str>, strategy: Strategy) -> Result<(), EngineError> {
        let root = self.resolve(name)?;
        self.evaluate_target(root, strategy)
    }

    /// Evaluate an already resolved target.
    ///
    /// # Errors
    ///
    /// See [`Engine::evaluate`].
    pub fn evaluate_target(&self, root: TargetId, strategy: Strategy) -> Result<(), EngineError> {
        debug!(target_name = self.name(root), ?strategy, "evaluating");
        match strategy {
            Strategy::Sequential => self.evaluate_sequential(root, &mut Vec::new()),
            Strategy::Parallel => self.evaluate_parallel(root, &[]),
        }
    }

    fn name(&self, id: TargetId) -> &str {
        self.graph.target(id).name()
    }

    /// Fail if entering `id` from `path` would close a cycle.
    fn enter(&self, path: &[TargetId], id: TargetId) -> Result<(), EngineError> {
        cycle::closed_by(self.graph, path, id).map_or(Ok(()), |found| {
            Err(EngineError::Cycle { cycle: found })
        })
    }

    /// Check `id` against its direct prerequisites and run its actions when
    /// it is stale. Called once every prerequisite has been evaluated.
    fn rebuild_if_stale(&self, id: TargetId) -> Result<(), EngineError> {
        let target = self.graph.target(id);
        let verdict = staleness::assess(self.graph, id, self.times)?;
        match verdict {
            Staleness::UpToDate => {
                debug!(target_name = target.name(), "up to date");
                return Ok(());
            }
            Staleness::Missing if !target.is_declared() => {
                warn!(target_name = target.name(), "no rule to make missing file; treating as stale");
            }
            Staleness::Missing => debug!(target_name = target.name(), "target file missing"),
            Staleness::PrerequisiteMissing(prereq) => warn!(
                target_name = target.name(),
                prerequisite = self.name(prereq),
                "prerequisite was not created by its actions"
            ),
            Staleness::PrerequisiteNewer(prereq) => debug!(
                target_name = target.name(),
                prerequisite = self.name(prereq),
                "prerequisite is newer"
            ),
        }
        if target.actions().is_empty() {
            return Ok(());
        }
        let _slot = self.slots.as_ref().map(JobSlots::acquire);
        for action in target.actions() {
            self.runner
                .run(action)
                .map_err(|source| EngineError::Action {
                    target: target.name().to_owned(),
                    source,
                })?;
        }
        Ok(())
    }
}
