//! CLI command implementations
//!
//! This module contains implementations of the commands supported by
//! the CLI application using the Command pattern.

pub mod command_traits;
pub mod merge_command;

pub use command_traits::{Command, CommandFactory};
pub use merge_command::{ConfigSource, MergeCommand, RunState};

use clap::ArgMatches;

use crate::raster::errors::VegmapResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// The binary exposes a single operation, the merge run; all pipeline
/// tuning arrives through the environment rather than arguments.
pub struct VegmapCommandFactory;

impl VegmapCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        VegmapCommandFactory
    }
}

impl Default for VegmapCommandFactory {
    fn default() -> Self {
        VegmapCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for VegmapCommandFactory {
    fn create_command(&self, _args: &ArgMatches, logger: &'a Logger) -> VegmapResult<Box<dyn Command + 'a>> {
        Ok(Box::new(MergeCommand::new(logger)))
    }
}
