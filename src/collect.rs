//! collect.rs
//!
//! Resolves the CLI target into a de-duplicated, deterministic list of
//! files to annotate.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{GtscribeError, Result};

/// A file target is used as-is; a directory is walked recursively for
/// files with the given extension, de-duplicated by resolved path and
/// sorted. Zero candidates is an error.
pub fn collect_targets(target: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if target.is_file() {
        files.push(target.to_path_buf());
    } else if target.is_dir() {
        let mut seen = HashSet::new();
        for entry in WalkDir::new(target)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                continue;
            }
            // Symlinked duplicates collapse onto their resolved path.
            let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            if seen.insert(resolved.clone()) {
                files.push(resolved);
            }
        }
        files.sort();
    }

    if files.is_empty() {
        return Err(GtscribeError::NoMatchingFiles {
            target: target.to_path_buf(),
            ext: ext.to_string(),
        });
    }
    Ok(files)
}
