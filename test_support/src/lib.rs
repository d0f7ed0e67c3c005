//! Test utilities shared by the pmake integration tests.
//!
//! Helpers here build scratch workspaces holding a Makefile and dated files,
//! stand in for the filesystem clock, and record the actions an engine asks to
//! run instead of spawning them.

pub mod clock;
pub mod recorder;
pub mod workspace;

pub use clock::FakeTimes;
pub use recorder::RecordingRunner;
pub use workspace::{Workspace, fake_program};
