use std::path::{Path, PathBuf};

use log::info;

use crate::commands::MergeCommand;
use crate::config::RunConfig;
use crate::discovery;
use crate::raster::errors::VegmapResult;
use crate::utils::logger::Logger;

/// Main interface to the vegmap library
pub struct VegMap {
    logger: Logger,
}

impl VegMap {
    /// Create a new VegMap instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "vegmap.log"
    ///
    /// # Returns
    /// A VegMap instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> VegmapResult<Self> {
        let log_path = log_file.unwrap_or("vegmap.log");
        let logger = Logger::new(log_path)?;
        Ok(VegMap { logger })
    }

    /// Run the full merge pipeline with the given configuration
    ///
    /// Discovers the tiles under the configured sub-region, accumulates
    /// their green masks, renders the presence map and writes it under
    /// the output root.
    ///
    /// # Arguments
    /// * `config` - Configuration for this run
    ///
    /// # Returns
    /// The path of the written result image, or an error
    pub fn run(&self, config: RunConfig) -> VegmapResult<PathBuf> {
        info!(
            "Starting merge run for sub-region '{}'",
            config.sub_region
        );
        MergeCommand::with_config(config, &self.logger).run()
    }

    /// List the tile paths a run over the given root would process
    ///
    /// # Arguments
    /// * `root` - Directory to search
    ///
    /// # Returns
    /// All matching tile paths in deterministic order
    pub fn discover(&self, root: &Path) -> VegmapResult<Vec<PathBuf>> {
        discovery::find_matching_paths(root)
    }
}
