//! Command pattern interfaces
//!
//! This module defines the Command pattern interfaces for the CLI
//! application, keeping argument parsing separate from execution.

use crate::raster::errors::VegmapResult;
use crate::utils::logger::Logger;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> VegmapResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create the Command instance matching the CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A boxed command ready to execute, or an error
    fn create_command(
        &self,
        args: &clap::ArgMatches,
        logger: &'a Logger,
    ) -> VegmapResult<Box<dyn Command + 'a>>;
}
