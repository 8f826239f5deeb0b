//! Tile merge command
//!
//! This module implements the end-to-end pipeline run: discover tiles
//! under the configured sub-region, fold their green masks into the
//! accumulator, render the presence map and persist it. Any failure
//! aborts the run; partial results are never written.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use log::{error, info};

use crate::commands::command_traits::Command;
use crate::config::{RunConfig, ThresholdPolicy};
use crate::discovery;
use crate::raster::errors::{VegmapError, VegmapResult};
use crate::raster::{Accumulator, GreenMaskExtractor, MaskOutcome, ThresholdRenderer};
use crate::utils::logger::{now_stamp, Logger};
use crate::utils::progress::ProgressTracker;

/// Where the run configuration comes from
pub enum ConfigSource {
    /// Resolve from the environment at run start
    Environment,
    /// Use an explicitly supplied configuration
    Explicit(RunConfig),
}

/// Phases of one pipeline run
///
/// `Failed` is terminal and reachable from `Discovering` (missing root)
/// and `Accumulating` (decode failure); the remaining states advance
/// strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Discovering,
    Accumulating,
    Rendering,
    Done,
    Failed,
}

/// Command running the full merge pipeline
pub struct MergeCommand<'a> {
    /// Configuration source for this run
    source: ConfigSource,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> MergeCommand<'a> {
    /// Create a merge command that resolves its configuration from the
    /// environment when the run starts
    pub fn new(logger: &'a Logger) -> Self {
        MergeCommand {
            source: ConfigSource::Environment,
            logger,
        }
    }

    /// Create a merge command with an explicit configuration
    pub fn with_config(config: RunConfig, logger: &'a Logger) -> Self {
        MergeCommand {
            source: ConfigSource::Explicit(config),
            logger,
        }
    }

    /// Run the pipeline and return the written output path
    pub fn run(&self) -> VegmapResult<PathBuf> {
        let mut state = RunState::Idle;
        match self.run_pipeline(&mut state) {
            Ok(path) => Ok(path),
            Err(e) => {
                error!("Run aborted in state {:?}: {}", state, e);
                self.advance(&mut state, RunState::Failed);
                Err(e)
            }
        }
    }

    fn advance(&self, state: &mut RunState, next: RunState) {
        info!("Run state: {:?} -> {:?}", *state, next);
        *state = next;
    }

    fn run_pipeline(&self, state: &mut RunState) -> VegmapResult<PathBuf> {
        // Configuration is resolved on the Idle -> Discovering transition
        let config = match &self.source {
            ConfigSource::Environment => RunConfig::from_env()?,
            ConfigSource::Explicit(config) => config.clone(),
        };
        self.advance(state, RunState::Discovering);

        let scoped_root = config.scoped_image_root();
        info!("Searching tiles under {}", scoped_root.display());
        let paths = discovery::find_matching_paths(&scoped_root)?;
        info!("Discovered {} candidate tiles", paths.len());

        self.advance(state, RunState::Accumulating);
        let extractor = GreenMaskExtractor::new(config.reference_edge);
        let mut accumulator = Accumulator::new();

        let progress = ProgressTracker::new(paths.len() as u64, "Merging tiles");
        for path in &paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                progress.set_message(name);
            }
            self.merge_tile(path, &extractor, &mut accumulator)?;
            progress.increment(1);
        }
        progress.finish();

        info!(
            "Accepted {} of {} discovered tiles",
            accumulator.accepted_count(),
            paths.len()
        );

        self.advance(state, RunState::Rendering);
        if let ThresholdPolicy::Fraction(fraction) = &config.threshold {
            info!("Threshold percent: {}", fraction);
        }
        let threshold = config.threshold.resolve(accumulator.accepted_count());
        info!("Threshold value: {}", threshold);

        let renderer = ThresholdRenderer::new(config.reference_edge);
        let output_image = renderer.render(accumulator.counts(), threshold);

        let output_path = self.persist(&config, &output_image)?;
        self.advance(state, RunState::Done);
        Ok(output_path)
    }

    /// Decode one tile and fold its mask into the accumulator
    ///
    /// A tile that fails to decode is fatal for the whole run; a tile
    /// whose height disagrees with the reference edge is logged and
    /// skipped.
    fn merge_tile(
        &self,
        path: &Path,
        extractor: &GreenMaskExtractor,
        accumulator: &mut Accumulator,
    ) -> VegmapResult<()> {
        let decode_failure =
            |e: String| VegmapError::DecodeFailure(path.to_path_buf(), e);

        let image = ImageReader::open(path)
            .map_err(|e| decode_failure(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_failure(e.to_string()))?
            .decode()
            .map_err(|e| decode_failure(e.to_string()))?;

        match extractor.extract(&image) {
            MaskOutcome::Accepted(mask) => {
                accumulator.accumulate(&mask)?;
                info!("merged successfully: {}", path.display());
            }
            MaskOutcome::Skipped { height } => {
                info!(
                    "Skipping {}: height {} does not match reference {}",
                    path.display(),
                    height,
                    extractor.reference_height()
                );
            }
        }

        Ok(())
    }

    /// Write the rendered map under the output root
    fn persist(&self, config: &RunConfig, output_image: &RgbImage) -> VegmapResult<PathBuf> {
        fs::create_dir_all(&config.output_root).map_err(|e| {
            VegmapError::PersistenceFailure(config.output_root.clone(), e.to_string())
        })?;

        let file_name = format!("result_{}_{}.jpg", config.sub_region, now_stamp());
        let output_path = config.output_root.join(file_name);
        info!("{}", output_path.display());

        output_image
            .save(&output_path)
            .map_err(|e| VegmapError::PersistenceFailure(output_path.clone(), e.to_string()))?;

        self.logger.log("Merge run successful")?;
        Ok(output_path)
    }
}

impl<'a> Command for MergeCommand<'a> {
    fn execute(&self) -> VegmapResult<()> {
        self.run().map(|_| ())
    }
}
