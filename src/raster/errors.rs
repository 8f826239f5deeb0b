//! Custom error types for the vegetation mapping pipeline

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Pipeline-specific error types
#[derive(Debug)]
pub enum VegmapError {
    /// I/O error
    IoError(io::Error),
    /// A mandatory configuration key was not provided
    MissingConfiguration(&'static str),
    /// The tile search root does not exist
    RootNotFound(PathBuf),
    /// A matched tile could not be decoded into a raster
    DecodeFailure(PathBuf, String),
    /// The result image could not be written
    PersistenceFailure(PathBuf, String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for VegmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VegmapError::IoError(e) => write!(f, "I/O error: {}", e),
            VegmapError::MissingConfiguration(key) => {
                write!(f, "Missing mandatory configuration: {}", key)
            }
            VegmapError::RootNotFound(path) => {
                write!(f, "Image root not found: {}", path.display())
            }
            VegmapError::DecodeFailure(path, detail) => {
                write!(f, "Failed to decode tile {}: {}", path.display(), detail)
            }
            VegmapError::PersistenceFailure(path, detail) => {
                write!(f, "Failed to write result {}: {}", path.display(), detail)
            }
            VegmapError::GenericError(msg) => write!(f, "Pipeline error: {}", msg),
        }
    }
}

impl std::error::Error for VegmapError {}

impl From<io::Error> for VegmapError {
    fn from(error: io::Error) -> Self {
        VegmapError::IoError(error)
    }
}

impl From<String> for VegmapError {
    fn from(msg: String) -> Self {
        VegmapError::GenericError(msg)
    }
}

/// Result type for pipeline operations
pub type VegmapResult<T> = Result<T, VegmapError>;
