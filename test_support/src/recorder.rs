//! An action runner that records instead of spawning.

use pmake::graph::Action;
use pmake::runner::{ActionError, ActionRunner};
use std::io;
use std::sync::{Mutex, PoisonError};

/// Records every action it is asked to run, in the order the calls arrive.
///
/// Actions whose program matches the configured failing program are recorded
/// and then reported as a launch failure.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    log: Mutex<Vec<String>>,
    failing: Option<String>,
}

impl RecordingRunner {
    /// A runner on which every action succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner on which actions invoking `program` fail.
    #[must_use]
    pub fn failing_on(program: &str) -> Self {
        Self {
            log: Mutex::default(),
            failing: Some(program.to_owned()),
        }
    }

    /// Commands seen so far, each joined with single spaces.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `command` was run.
    #[must_use]
    pub fn count(&self, command: &str) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }
}

impl ActionRunner for RecordingRunner {
    fn run(&self, action: &Action) -> Result<(), ActionError> {
        let command = action.to_string();
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());
        if self.failing.as_deref() == Some(action.program()) {
            return Err(ActionError::Launch {
                command,
                source: io::Error::other("configured to fail"),
            });
        }
        Ok(())
    }
}
