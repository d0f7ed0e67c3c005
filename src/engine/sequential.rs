//! Depth-first evaluation on the calling thread.

use super::{Engine, EngineError};
use crate::graph::TargetId;

impl Engine<'_> {
    /// Evaluate every prerequisite of `id` in order, then `id` itself.
    ///
    /// `path` holds the targets whose evaluation is in progress above `id`.
    pub(super) fn evaluate_sequential(
        &self,
        id: TargetId,
        path: &mut Vec<TargetId>,
    ) -> Result<(), EngineError> {
        self.enter(path, id)?;
        path.push(id);
        for &prereq in self.graph.target(id).prerequisites() {
            self.evaluate_sequential(prereq, path)?;
        }
        path.pop();
        self.rebuild_if_stale(id)
    }
}
