//! Run configuration
//!
//! Configuration is read from the environment exactly once, at run
//! start, into an explicit value object that the rest of the pipeline
//! receives by reference. Defaults live here as named constants instead
//! of scattered fallback lookups.

use std::env;
use std::path::PathBuf;

use crate::raster::constants::{reference, threshold};
use crate::raster::errors::{VegmapError, VegmapResult};

/// Environment variable naming the tile search root
pub const IMAGE_DIR_KEY: &str = "IMAGE_DIR";

/// Environment variable naming the output root
pub const OUTPUT_DIR_KEY: &str = "OUTPUT_DIR";

/// Environment variable naming the sub-region; mandatory
pub const SUBDIR_KEY: &str = "SUBDIR";

/// Environment variable carrying an absolute threshold override
pub const THRESHOLD_KEY: &str = "THRESHOLD";

/// Environment variable carrying the threshold fraction
pub const THRESHOLD_PERCENT_KEY: &str = "THRESHOLD_PERCENT";

/// Directory appended to the working directory when IMAGE_DIR is unset
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Directory appended to the working directory when OUTPUT_DIR is unset
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// How the presence threshold is derived
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdPolicy {
    /// Use this integer directly
    Absolute(i64),
    /// Use floor(accepted tile count * fraction)
    Fraction(f64),
}

impl ThresholdPolicy {
    /// Resolve the policy into the integer threshold the renderer consumes
    ///
    /// # Arguments
    /// * `accepted_tiles` - Number of tiles that passed the size gate
    pub fn resolve(&self, accepted_tiles: u32) -> i64 {
        match self {
            ThresholdPolicy::Absolute(value) => *value,
            ThresholdPolicy::Fraction(fraction) => {
                (accepted_tiles as f64 * fraction).floor() as i64
            }
        }
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base path searched for tiles
    pub image_root: PathBuf,
    /// Base path for the result image
    pub output_root: PathBuf,
    /// Sub-region scoping the search; appended to the image root
    pub sub_region: String,
    /// Threshold derivation policy
    pub threshold: ThresholdPolicy,
    /// Expected tile height in pixels; also the output edge length
    pub reference_edge: u32,
}

impl RunConfig {
    /// Resolve the configuration from the environment
    ///
    /// # Returns
    /// The resolved configuration, or an error when the mandatory
    /// sub-region is missing or a value does not parse
    pub fn from_env() -> VegmapResult<Self> {
        let sub_region = env::var(SUBDIR_KEY)
            .map_err(|_| VegmapError::MissingConfiguration(SUBDIR_KEY))?;

        let cwd = env::current_dir()?;

        let image_root = match env::var(IMAGE_DIR_KEY) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => cwd.join(DEFAULT_IMAGES_DIR),
        };

        let output_root = match env::var(OUTPUT_DIR_KEY) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => cwd.join(DEFAULT_RESULTS_DIR),
        };

        let threshold = Self::threshold_from_env()?;

        Ok(RunConfig {
            image_root,
            output_root,
            sub_region,
            threshold,
            reference_edge: reference::EDGE_LENGTH,
        })
    }

    // An absolute THRESHOLD wins over THRESHOLD_PERCENT when both are set.
    fn threshold_from_env() -> VegmapResult<ThresholdPolicy> {
        if let Ok(value) = env::var(THRESHOLD_KEY) {
            let absolute = value.parse::<i64>().map_err(|_| {
                VegmapError::GenericError(format!(
                    "Invalid {} value '{}'. Expected an integer",
                    THRESHOLD_KEY, value
                ))
            })?;
            return Ok(ThresholdPolicy::Absolute(absolute));
        }

        match env::var(THRESHOLD_PERCENT_KEY) {
            Ok(value) => {
                let fraction = value.parse::<f64>().map_err(|_| {
                    VegmapError::GenericError(format!(
                        "Invalid {} value '{}'. Expected a number",
                        THRESHOLD_PERCENT_KEY, value
                    ))
                })?;
                Ok(ThresholdPolicy::Fraction(fraction))
            }
            Err(_) => Ok(ThresholdPolicy::Fraction(threshold::DEFAULT_FRACTION)),
        }
    }

    /// The image root scoped to the configured sub-region
    pub fn scoped_image_root(&self) -> PathBuf {
        self.image_root.join(&self.sub_region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use std::sync::Mutex;

    lazy_static! {
        // Environment mutation is process-global; serialize these tests.
        static ref ENV_LOCK: Mutex<()> = Mutex::new(());
    }

    fn clear_env() {
        for key in [
            IMAGE_DIR_KEY,
            OUTPUT_DIR_KEY,
            SUBDIR_KEY,
            THRESHOLD_KEY,
            THRESHOLD_PERCENT_KEY,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_missing_sub_region_fails() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let result = RunConfig::from_env();
        assert!(matches!(
            result,
            Err(VegmapError::MissingConfiguration(SUBDIR_KEY))
        ));
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var(SUBDIR_KEY, "yeong-am");

        let config = RunConfig::from_env().unwrap();
        let cwd = env::current_dir().unwrap();
        assert_eq!(config.image_root, cwd.join(DEFAULT_IMAGES_DIR));
        assert_eq!(config.output_root, cwd.join(DEFAULT_RESULTS_DIR));
        assert_eq!(config.sub_region, "yeong-am");
        assert_eq!(config.threshold, ThresholdPolicy::Fraction(0.6));
        assert_eq!(config.reference_edge, reference::EDGE_LENGTH);
        assert_eq!(config.scoped_image_root(), cwd.join("images").join("yeong-am"));

        clear_env();
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var(SUBDIR_KEY, "naju");
        env::set_var(IMAGE_DIR_KEY, "/data/tiles");
        env::set_var(OUTPUT_DIR_KEY, "/data/out");
        env::set_var(THRESHOLD_PERCENT_KEY, "0.8");

        let config = RunConfig::from_env().unwrap();
        assert_eq!(config.image_root, PathBuf::from("/data/tiles"));
        assert_eq!(config.output_root, PathBuf::from("/data/out"));
        assert_eq!(config.threshold, ThresholdPolicy::Fraction(0.8));

        clear_env();
    }

    #[test]
    fn test_absolute_threshold_wins() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var(SUBDIR_KEY, "naju");
        env::set_var(THRESHOLD_KEY, "4");
        env::set_var(THRESHOLD_PERCENT_KEY, "0.8");

        let config = RunConfig::from_env().unwrap();
        assert_eq!(config.threshold, ThresholdPolicy::Absolute(4));

        clear_env();
    }

    #[test]
    fn test_unparseable_values_fail() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var(SUBDIR_KEY, "naju");
        env::set_var(THRESHOLD_PERCENT_KEY, "most of them");

        assert!(RunConfig::from_env().is_err());

        env::remove_var(THRESHOLD_PERCENT_KEY);
        env::set_var(THRESHOLD_KEY, "several");
        assert!(RunConfig::from_env().is_err());

        clear_env();
    }
}
