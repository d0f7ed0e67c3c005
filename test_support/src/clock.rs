//! In-memory modification times.
//!
//! # Examples
//!
//! ```rust
//! use pmake::staleness::ModTimes;
//! use test_support::FakeTimes;
//!
//! let times = FakeTimes::new().with("main.o", 2);
//! assert!(times.modified("main.o").expect("lookup").is_some());
//! assert!(times.modified("app").expect("lookup").is_none());
//! ```

use pmake::staleness::ModTimes;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

/// A [`ModTimes`] backed by a map from name to seconds past the epoch.
///
/// Names never added behave as missing files.
#[derive(Debug, Default)]
pub struct FakeTimes {
    files: Mutex<BTreeMap<String, SystemTime>>,
}

impl FakeTimes {
    /// Start with no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` with a modification time `secs` after the epoch.
    #[must_use]
    pub fn with(self, name: &str, secs: u64) -> Self {
        self.set(name, secs);
        self
    }

    /// Create or re-date `name`.
    pub fn set(&self, name: &str, secs: u64) {
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), stamp);
    }
}

impl ModTimes for FakeTimes {
    fn modified(&self, name: &str) -> io::Result<Option<SystemTime>> {
        Ok(self
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied())
    }
}
