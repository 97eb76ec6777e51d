//! Filesystem loading: walk a directory tree and build a [`Registry`] from
//! every `.sql` file found.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, SqlSetError};
use crate::registry::Registry;
use crate::token::SOURCE_EXTENSION;

/// Options controlling which files are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Extension of source files, without the dot (matched case-insensitively).
    pub extension: String,
    /// Directory names to skip (exact match). Empty by default, so every
    /// source reachable from the root is loaded.
    pub exclude_dir_names: Vec<String>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: SOURCE_EXTENSION.to_string(),
            exclude_dir_names: Vec::new(),
            follow_links: false,
        }
    }
}

impl LoadOptions {
    /// Read options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SqlSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| SqlSetError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

/// One file read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// File name, used to derive the default collection id.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Read every matching file below `root`, in file-name order per directory.
pub fn collect_sources(root: &Path, options: &LoadOptions) -> Result<Vec<Source>> {
    let exclude_dirs: BTreeSet<&str> = options
        .exclude_dir_names
        .iter()
        .map(String::as_str)
        .collect();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !exclude_dirs.contains(name.as_ref())
        });

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !options.matches_extension(entry.path()) {
            continue;
        }

        let path = entry.path();
        let content = std::fs::read_to_string(path).map_err(|source| SqlSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "read source");
        sources.push(Source {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: path.to_path_buf(),
            content,
        });
    }

    Ok(sources)
}

/// Build a registry from every matching file below `root`.
///
/// Parse errors name the offending file by its path relative to `root`.
pub fn load_dir(root: &Path, options: &LoadOptions) -> Result<Registry> {
    let sources = collect_sources(root, options)?;
    let named = sources.into_iter().map(|source| {
        let display = source
            .path
            .strip_prefix(root)
            .unwrap_or(&source.path)
            .to_string_lossy()
            .into_owned();
        (display, source.content)
    });

    Registry::from_sources_with_extension(named, &options.extension)
}
