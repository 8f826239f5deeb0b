//! Per-pixel green observation accumulation
//!
//! This module maintains the running count of green observations across
//! all accepted tiles of one run. Accumulation is commutative and
//! associative, so tiles may be folded in any order, or in independent
//! partial accumulators merged at the end.

use crate::raster::errors::{VegmapError, VegmapResult};
use crate::raster::mask::GreenMask;

/// Integer grid holding, per pixel, the number of accepted tiles in
/// which that pixel was green
pub struct CountGrid {
    width: u32,
    height: u32,
    counts: Vec<u32>,
}

impl CountGrid {
    fn from_mask(mask: &GreenMask) -> Self {
        CountGrid {
            width: mask.width(),
            height: mask.height(),
            counts: mask.cells().iter().map(|&g| g as u32).collect(),
        }
    }

    /// Grid width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Observation count for the pixel at (x, y)
    pub fn count_at(&self, x: u32, y: u32) -> u32 {
        self.counts[(y * self.width + x) as usize]
    }
}

/// Accumulates green masks for one run
///
/// The count grid is created lazily from the first accepted mask and
/// mutated additively for every later one. Skipped tiles never reach
/// this type.
pub struct Accumulator {
    grid: Option<CountGrid>,
    accepted: u32,
}

impl Accumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Accumulator {
            grid: None,
            accepted: 0,
        }
    }

    /// Fold one accepted mask into the running counts
    ///
    /// # Arguments
    /// * `mask` - A mask from a full-resolution tile
    ///
    /// # Returns
    /// An error when the mask's dimensions disagree with the already
    /// established grid; the run must abort rather than produce a map
    /// built from misaligned tiles.
    pub fn accumulate(&mut self, mask: &GreenMask) -> VegmapResult<()> {
        match &mut self.grid {
            None => {
                self.grid = Some(CountGrid::from_mask(mask));
            }
            Some(grid) => {
                if mask.width() != grid.width || mask.height() != grid.height {
                    return Err(VegmapError::GenericError(format!(
                        "Mask dimensions {}x{} do not match accumulated grid {}x{}",
                        mask.width(),
                        mask.height(),
                        grid.width,
                        grid.height
                    )));
                }
                for (count, &green) in grid.counts.iter_mut().zip(mask.cells()) {
                    *count += green as u32;
                }
            }
        }
        self.accepted += 1;
        Ok(())
    }

    /// Merge another accumulator into this one
    ///
    /// Supports partial accumulation: independent accumulators built
    /// over disjoint tile subsets combine into the same grid a single
    /// sequential fold would have produced.
    pub fn merge(&mut self, other: Accumulator) -> VegmapResult<()> {
        let Some(other_grid) = other.grid else {
            return Ok(());
        };

        match &mut self.grid {
            None => {
                self.grid = Some(other_grid);
            }
            Some(grid) => {
                if other_grid.width != grid.width || other_grid.height != grid.height {
                    return Err(VegmapError::GenericError(format!(
                        "Cannot merge accumulator grid {}x{} into {}x{}",
                        other_grid.width, other_grid.height, grid.width, grid.height
                    )));
                }
                for (count, other_count) in grid.counts.iter_mut().zip(other_grid.counts) {
                    *count += other_count;
                }
            }
        }
        self.accepted += other.accepted;
        Ok(())
    }

    /// Number of masks folded in so far
    pub fn accepted_count(&self) -> u32 {
        self.accepted
    }

    /// The accumulated counts, or `None` when no mask was ever accepted
    pub fn counts(&self) -> Option<&CountGrid> {
        self.grid.as_ref()
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator::new()
    }
}
