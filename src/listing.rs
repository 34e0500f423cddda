//! Directory listing shown after each rename.

use crate::renamer::{RenameError, RenameResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Order of a directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Returns the names of the immediate entries of `path`, sorted.
///
/// Files and directories are both listed. Names that are not valid UTF-8
/// are shown lossily.
///
/// # Errors
///
/// Returns `RenameError::ListFailed` if the directory cannot be read.
pub fn list_directory(path: &Path, order: SortOrder) -> RenameResult<Vec<String>> {
    let entries = fs::read_dir(path).map_err(|e| RenameError::ListFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RenameError::ListFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        names.push(entry.file_name().to_string_lossy().to_string());
    }

    names.sort();
    if order == SortOrder::Descending {
        names.reverse();
    }

    Ok(names)
}
