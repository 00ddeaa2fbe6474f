//! typeforge command line.

pub mod cli;
pub mod progress;
