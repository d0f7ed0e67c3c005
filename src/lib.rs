//! pmake core library.
//!
//! This library reads Makefiles into an in-memory dependency graph and
//! rebuilds stale targets by running their actions as child processes, either
//! sequentially or with one worker per prerequisite.
//!
//! ```no_run
//! use pmake::engine::{Engine, Strategy};
//! use pmake::runner::ProcessRunner;
//! use pmake::staleness::DiskModTimes;
//!
//! let graph = pmake::makefile::from_str("app : main.c\n\tcc -o app main.c\n")?;
//! Engine::new(&graph, &ProcessRunner::new(), &DiskModTimes::new())
//!     .evaluate(Some("app"), Strategy::Sequential)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod engine;
pub mod graph;
pub mod makefile;
pub mod render;
pub mod runner;
pub mod staleness;
