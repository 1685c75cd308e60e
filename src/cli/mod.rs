//! Command Line Interface (CLI) layer for MONOCAST.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that replays raw frame dumps
//! through a capture session into an output directory.
//!
//! If you are embedding MONOCAST into another application, prefer using
//! the high-level `monocast::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
