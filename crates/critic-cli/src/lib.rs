//! Library half of the `critic` command line tool.
//!
//! Holds the run configuration and the command runners so they can be tested
//! without spawning the binary.
pub mod commands;
pub mod config;
pub mod util;
