//! Re-entry detection along the current evaluation path.
//!
//! Both strategies carry the chain of targets currently being evaluated. A
//! target that appears again on its own chain closes a dependency cycle.

use crate::graph::{BuildGraph, TargetId};

/// Return the cycle closed by entering `next`, if any.
///
/// The loop is listed starting from its lexicographically smallest name and
/// ends by repeating that name, so the same loop reads identically whichever
/// target the walk entered it from.
pub(super) fn closed_by(
    graph: &BuildGraph,
    path: &[TargetId],
    next: TargetId,
) -> Option<Vec<String>> {
    let start = path.iter().position(|id| *id == next)?;
    let members: Vec<&str> = path
        .iter()
        .skip(start)
        .map(|id| graph.target(*id).name())
        .collect();
    let smallest = members
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| **name)
        .map_or(0, |(at, _)| at);
    let cycle = members
        .iter()
        .cycle()
        .skip(smallest)
        .take(members.len() + 1)
        .map(|name| (*name).to_owned())
        .collect();
    Some(cycle)
}
