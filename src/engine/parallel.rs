//! Fan-out evaluation with one scoped thread per prerequisite.
//!
//! A target spawns a worker for each prerequisite without waiting between
//! spawns, then joins all of them. Siblings are never cancelled: every worker
//! runs to completion and only the target's own rebuild is skipped when any of
//! them failed. The first failure in prerequisite order is the one reported.

use super::{Engine, EngineError};
use crate::graph::TargetId;
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::debug;

type Outcome = Result<(), EngineError>;

impl Engine<'_> {
    pub(super) fn evaluate_parallel(&self, id: TargetId, path: &[TargetId]) -> Outcome {
        self.enter(path, id)?;
        let prerequisites = self.graph.target(id).prerequisites();
        if !prerequisites.is_empty() {
            let mut lineage = path.to_vec();
            lineage.push(id);
            thread::scope(|scope| self.fan_out(scope, prerequisites, &lineage))?;
        }
        self.rebuild_if_stale(id)
    }

    fn fan_out<'scope>(
        &'scope self,
        scope: &'scope Scope<'scope, '_>,
        prerequisites: &[TargetId],
        lineage: &'scope [TargetId],
    ) -> Outcome {
        let mut workers: Vec<(TargetId, ScopedJoinHandle<'scope, Outcome>)> =
            Vec::with_capacity(prerequisites.len());
        let mut spawn_failure = None;
        for &prereq in prerequisites {
            let spawned = thread::Builder::new()
                .name(format!("pmake-{}", prereq.index()))
                .spawn_scoped(scope, move || self.evaluate_parallel(prereq, lineage));
            match spawned {
                Ok(handle) => workers.push((prereq, handle)),
                Err(source) => {
                    spawn_failure = Some(EngineError::Spawn {
                        target: self.name(prereq).to_owned(),
                        source,
                    });
                    break;
                }
            }
        }

        let mut first_failure = None;
        for (prereq, handle) in workers {
            let outcome = handle.join().unwrap_or_else(|_| {
                Err(EngineError::WorkerPanicked {
                    target: self.name(prereq).to_owned(),
                })
            });
            if let Err(err) = outcome {
                if first_failure.is_some() {
                    debug!(prerequisite = self.name(prereq), error = %err, "further prerequisite failure");
                } else {
                    first_failure = Some(err);
                }
            }
        }
        first_failure.or(spawn_failure).map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{Engine, EngineError, Strategy};
    use crate::graph::{Action, BuildGraph, Declaration};
    use crate::runner::{ActionError, ActionRunner};
    use crate::staleness::ModTimes;
    use rstest::rstest;
    use std::io;
    use std::sync::Mutex;
    use std::time::SystemTime;

    struct NothingExists;

    impl ModTimes for NothingExists {
        fn modified(&self, _name: &str) -> io::Result<Option<SystemTime>> {
            Ok(None)
        }
    }

    /// Fails any action whose program is `fail`; records the rest.
    #[derive(Default)]
    struct FailOn(Mutex<Vec<String>>);

    impl ActionRunner for FailOn {
        fn run(&self, action: &Action) -> Result<(), ActionError> {
            if action.program() == "fail" {
                return Err(ActionError::Launch {
                    command: action.to_string(),
                    source: io::Error::other("refused"),
                });
            }
            self.0.lock().expect("lock").push(action.to_string());
            Ok(())
        }
    }

    #[rstest]
    fn failed_sibling_does_not_cancel_others_but_blocks_parent() {
        let graph = BuildGraph::build([
            Declaration::target("top", ["bad", "good"]),
            Declaration::action(["link", "top"]),
            Declaration::target("bad", Vec::<String>::new()),
            Declaration::action(["fail", "bad"]),
            Declaration::target("good", Vec::<String>::new()),
            Declaration::action(["make", "good"]),
        ])
        .expect("graph");
        let runner = FailOn::default();
        let err = Engine::new(&graph, &runner, &NothingExists)
            .evaluate(None, Strategy::Parallel)
            .expect_err("sibling failure");
        assert!(matches!(err, EngineError::Action { target, .. } if target == "bad"));
        assert_eq!(runner.0.into_inner().expect("lock"), ["make good"]);
    }

    #[rstest]
    fn first_failure_follows_prerequisite_order() {
        let graph = BuildGraph::build([
            Declaration::target("top", ["one", "two"]),
            Declaration::target("one", Vec::<String>::new()),
            Declaration::action(["fail", "one"]),
            Declaration::target("two", Vec::<String>::new()),
            Declaration::action(["fail", "two"]),
        ])
        .expect("graph");
        let runner = FailOn::default();
        let err = Engine::new(&graph, &runner, &NothingExists)
            .evaluate(None, Strategy::Parallel)
            .expect_err("failure");
        assert!(matches!(err, EngineError::Action { target, .. } if target == "one"));
    }

    /// Panics on any action whose program is `boom`; records the rest.
    #[derive(Default)]
    struct Boom(Mutex<Vec<String>>);

    impl ActionRunner for Boom {
        fn run(&self, action: &Action) -> Result<(), ActionError> {
            assert!(action.program() != "boom", "worker blew up");
            self.0.lock().expect("lock").push(action.to_string());
            Ok(())
        }
    }

    #[rstest]
    fn panicking_worker_is_reported_and_sibling_still_runs() {
        let graph = BuildGraph::build([
            Declaration::target("top", ["a", "b"]),
            Declaration::action(["link", "top"]),
            Declaration::target("a", Vec::<String>::new()),
            Declaration::action(["boom", "a"]),
            Declaration::target("b", Vec::<String>::new()),
            Declaration::action(["make", "b"]),
        ])
        .expect("graph");
        let runner = Boom::default();
        let err = Engine::new(&graph, &runner, &NothingExists)
            .evaluate(None, Strategy::Parallel)
            .expect_err("worker panic");
        assert!(
            matches!(&err, EngineError::WorkerPanicked { target } if target == "a"),
            "got {err:?}"
        );
        assert_eq!(runner.0.into_inner().expect("lock"), ["make b"]);
    }
}
