use std::fs;
use std::path::{Path, PathBuf};

use crate::{Bitmap, Result, ShadowError};

pub(crate) fn is_bmp_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("bmp"))
        .unwrap_or(false)
}

/// All `*.bmp` files directly inside `dir`, sorted by path.
pub fn discover_bitmaps(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| {
        log::error!("Error reading shadow directory {dir:?}: {source}");
        ShadowError::ReadError { source }
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_bmp_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Loads every bitmap in `dir` whose pixel buffer matches `dimensions`.
///
/// Files that fail to parse or have other dimensions are skipped with a
/// warning. Without `dimensions` the first loadable bitmap sets them.
pub(crate) fn load_matching_bitmaps(
    dir: &Path,
    mut dimensions: Option<(usize, usize)>,
) -> Result<Vec<(PathBuf, Bitmap)>> {
    let mut bitmaps = Vec::new();
    for path in discover_bitmaps(dir)? {
        let bitmap = match Bitmap::open(&path) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::warn!("Skipping {path:?}: {e}");
                continue;
            }
        };
        let found = bitmap.carrier().dimensions();
        match dimensions {
            Some(expected) if expected != found => {
                log::warn!(
                    "Skipping {path:?}: {}x{} pixels, expected {}x{}",
                    found.0,
                    found.1,
                    expected.0,
                    expected.1
                );
            }
            _ => {
                dimensions = Some(found);
                bitmaps.push((path, bitmap));
            }
        }
    }

    Ok(bitmaps)
}
