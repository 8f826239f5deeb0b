//! Threshold rendering
//!
//! Turns the accumulated observation counts into the final black/white
//! presence map: black where a pixel was green in at least the threshold
//! number of accepted tiles, white everywhere else.

use image::{Rgb, RgbImage};
use log::info;

use crate::raster::accumulate::CountGrid;
use crate::raster::constants::output;

/// Renders accumulated counts into the output raster
pub struct ThresholdRenderer {
    /// Edge length in pixels of the output image
    reference_edge: u32,
}

impl ThresholdRenderer {
    /// Create a renderer producing images of the given edge length
    pub fn new(reference_edge: u32) -> Self {
        ThresholdRenderer { reference_edge }
    }

    /// Render the presence map
    ///
    /// # Arguments
    /// * `counts` - The accumulated counts, or `None` when no tile was accepted
    /// * `threshold` - Minimum observation count for "present"
    ///
    /// # Returns
    /// A freshly allocated image, reference edge squared, restricted to
    /// pure black and pure white pixels. With no observations at all the
    /// map is deterministically all white, whatever the threshold.
    pub fn render(&self, counts: Option<&CountGrid>, threshold: i64) -> RgbImage {
        let edge = self.reference_edge;
        let mut output_image = RgbImage::from_pixel(edge, edge, Rgb(output::ABSENT));

        let Some(grid) = counts else {
            info!("No accepted tiles, rendering all-absent map");
            return output_image;
        };

        info!(
            "Rendering {}x{} map with threshold {}",
            edge, edge, threshold
        );

        for y in 0..edge.min(grid.height()) {
            for x in 0..edge.min(grid.width()) {
                if grid.count_at(x, y) as i64 >= threshold {
                    output_image.put_pixel(x, y, Rgb(output::PRESENT));
                }
            }
        }

        output_image
    }
}
