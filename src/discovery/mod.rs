//! Tile discovery
//!
//! This module walks the image root recursively and collects every file
//! whose name matches the Sentinel-2 true-color tile convention: the
//! marker `TCI`, optionally followed by word characters, then the `.jp2`
//! extension. Matching is case-sensitive and searches anywhere in the
//! file name, so `T52SCG_20200605_TCI_10m.jp2` and `foo.TCI.jp2` both
//! match while `foo.tci.jp2` does not.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::raster::errors::{VegmapError, VegmapResult};

lazy_static! {
    /// File name pattern identifying a true-color composite tile
    static ref TILE_PATTERN: Regex =
        Regex::new(r"TCI[A-Za-z0-9_]*\.jp2").expect("tile pattern must compile");
}

/// Whether a file name identifies a true-color tile
pub fn is_tile_name(file_name: &str) -> bool {
    TILE_PATTERN.is_match(file_name)
}

/// Recursively collect all tile paths under the given root
///
/// Entries are visited in lexicographic order per directory level, so
/// two scans of the same tree return the same sequence. Finding nothing
/// is not an error; a missing root is.
///
/// # Arguments
/// * `root` - Directory to search
///
/// # Returns
/// All matching paths, or `RootNotFound` when the root is not a directory
pub fn find_matching_paths(root: &Path) -> VegmapResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(VegmapError::RootNotFound(root.to_path_buf()));
    }

    let mut result = Vec::new();
    walk_directory(root, &mut result)?;
    Ok(result)
}

fn walk_directory(dir: &Path, result: &mut Vec<PathBuf>) -> VegmapResult<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_directory(&path, result)?;
        } else if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if is_tile_name(file_name) {
                info!("Find {}", path.display());
                result.push(path);
            }
        }
    }

    Ok(())
}
