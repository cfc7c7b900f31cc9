//! Subcommand implementations.

pub mod config;
pub mod location;
pub mod predict;
pub mod soil;

mod common;

pub use common::CoordArgs;
