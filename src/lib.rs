pub mod config;
pub mod discovery;
pub mod raster;
pub mod commands;
pub mod utils;
pub mod api;

pub use crate::api::VegMap;

pub use config::{RunConfig, ThresholdPolicy};
pub use discovery::find_matching_paths;
pub use raster::errors::{VegmapError, VegmapResult};
pub use raster::{Accumulator, CountGrid, GreenMask, GreenMaskExtractor, MaskOutcome, ThresholdRenderer};
