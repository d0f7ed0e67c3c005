//! Rebuild decisions based on file modification times.
//!
//! A target must be rebuilt when its file is missing, when any direct
//! prerequisite's file is missing, or when any direct prerequisite's file was
//! modified strictly later than the target's. Only direct prerequisites are
//! compared; deeper staleness is handled by evaluating prerequisites first.

use crate::graph::{BuildGraph, TargetId};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::{self, ErrorKind};
use std::time::SystemTime;
use thiserror::Error;

/// Source of file modification times.
pub trait ModTimes: Sync {
    /// Modification time of the file named `name`, or `None` when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns any I/O failure other than the file being absent.
    fn modified(&self, name: &str) -> io::Result<Option<SystemTime>>;
}

/// Reads modification times from disk, resolving relative names against an
/// optional root directory.
#[derive(Debug, Clone, Default)]
pub struct DiskModTimes {
    root: Option<Utf8PathBuf>,
}

impl DiskModTimes {
    /// Resolve names against the process working directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Resolve relative names against `root`.
    #[must_use]
    pub fn rooted(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, name: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(name);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_owned(),
        }
    }
}

impl ModTimes for DiskModTimes {
    fn modified(&self, name: &str) -> io::Result<Option<SystemTime>> {
        match fs::metadata(self.resolve(name)) {
            Ok(meta) => meta.modified().map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Outcome of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The target's own file does not exist.
    Missing,
    /// A prerequisite's file does not exist.
    PrerequisiteMissing(TargetId),
    /// A prerequisite's file is newer than the target's.
    PrerequisiteNewer(TargetId),
    /// The target's file exists and no prerequisite is newer.
    UpToDate,
}

impl Staleness {
    /// Whether the target's actions must run.
    #[must_use]
    pub const fn is_stale(self) -> bool {
        !matches!(self, Self::UpToDate)
    }
}

/// Failure to read a modification time.
#[derive(Debug, Error)]
#[error("cannot read modification time of `{name}`")]
pub struct StatError {
    /// Name of the file that could not be inspected.
    pub name: String,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

/// Decide whether `id` must be rebuilt and why.
///
/// Prerequisites are checked in declaration order and the first stale one is
/// reported.
///
/// # Errors
///
/// Returns [`StatError`] when a modification time cannot be read for a reason
/// other than the file being absent.
pub fn assess<T>(graph: &BuildGraph, id: TargetId, times: &T) -> Result<Staleness, StatError>
where
    T: ModTimes + ?Sized,
{
    let target = graph.target(id);
    let Some(built) = stat(times, target.name())? else {
        return Ok(Staleness::Missing);
    };
    for &prereq in target.prerequisites() {
        match stat(times, graph.target(prereq).name())? {
            None => return Ok(Staleness::PrerequisiteMissing(prereq)),
            Some(changed) if changed > built => return Ok(Staleness::PrerequisiteNewer(prereq)),
            Some(_) => {}
        }
    }
    Ok(Staleness::UpToDate)
}

/// Whether `id` must be rebuilt.
///
/// # Errors
///
/// See [`assess`].
pub fn needs_rebuild<T>(graph: &BuildGraph, id: TargetId, times: &T) -> Result<bool, StatError>
where
    T: ModTimes + ?Sized,
{
    assess(graph, id, times).map(Staleness::is_stale)
}

fn stat<T>(times: &T, name: &str) -> Result<Option<SystemTime>, StatError>
where
    T: ModTimes + ?Sized,
{
    times.modified(name).map_err(|source| StatError {
        name: name.to_owned(),
        source,
    })
}
