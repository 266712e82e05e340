//! Support library for the `clion` binary.
//!
//! Exposes the command pipeline and logging setup so integration tests can
//! drive a full run without spawning a subprocess.

pub mod cli;
pub mod logging;
