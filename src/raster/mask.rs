//! Green mask extraction
//!
//! This module turns a decoded tile into a boolean grid marking the
//! pixels whose hue falls inside the green band, gated by the tile's
//! height against the reference edge length.

use image::DynamicImage;
use log::info;

use crate::raster::constants::green_band;
use crate::raster::hsv::rgb_to_hsv;

/// Boolean grid congruent with the source tile, true where the pixel
/// sits inside the green hue band
pub struct GreenMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl GreenMask {
    /// Grid width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) was classified green
    pub fn is_green(&self, x: u32, y: u32) -> bool {
        self.data[(y * self.width + x) as usize]
    }

    /// Number of green pixels in the mask
    pub fn green_count(&self) -> usize {
        self.data.iter().filter(|&&g| g).count()
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.data
    }

    /// Build a mask directly from row-major cell values
    pub fn from_cells(width: u32, height: u32, data: Vec<bool>) -> Self {
        debug_assert_eq!((width * height) as usize, data.len());
        GreenMask {
            width,
            height,
            data,
        }
    }
}

/// Outcome of one extraction attempt
pub enum MaskOutcome {
    /// The tile was full resolution and produced a mask
    Accepted(GreenMask),
    /// The tile height disagreed with the reference edge; it is excluded
    /// from accumulation without error
    Skipped {
        /// The offending tile height
        height: u32,
    },
}

/// Extracts green masks from decoded tiles
pub struct GreenMaskExtractor {
    /// Expected tile height in pixels
    reference_height: u32,
}

impl GreenMaskExtractor {
    /// Create an extractor gated on the given reference edge length
    pub fn new(reference_height: u32) -> Self {
        GreenMaskExtractor { reference_height }
    }

    /// The height a tile must have to be accepted
    pub fn reference_height(&self) -> u32 {
        self.reference_height
    }

    /// Extract the green mask from a decoded tile
    ///
    /// # Arguments
    /// * `image` - The decoded tile
    ///
    /// # Returns
    /// `MaskOutcome::Accepted` with the mask, or `MaskOutcome::Skipped`
    /// when the tile is not full resolution
    pub fn extract(&self, image: &DynamicImage) -> MaskOutcome {
        let rgb = image.to_rgb8();
        let width = rgb.width();
        let height = rgb.height();

        info!("height: {}, width: {}", height, width);

        // Only the height decides eligibility; provider tiles are square
        // so the width never disagrees on real inputs.
        if height != self.reference_height {
            return MaskOutcome::Skipped { height };
        }

        let mut data = Vec::with_capacity((width * height) as usize);
        for pixel in rgb.pixels() {
            let (hue, _, _) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
            data.push(hue >= green_band::HUE_LOW && hue <= green_band::HUE_HIGH);
        }

        MaskOutcome::Accepted(GreenMask {
            width,
            height,
            data,
        })
    }
}
