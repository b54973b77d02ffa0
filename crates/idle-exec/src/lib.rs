//! idle-exec — runs the `idle` CLI to completion or forced termination
//! and reports the result as a single structured outcome.

pub mod outcome;
pub mod runner;

pub use outcome::{ExecOutcome, ExecReport, SpawnFailure};
pub use runner::{run, ExecRequest, ResolvedExec, DEFAULT_TIMEOUT_MS, IDLE_PATH_ENV};
