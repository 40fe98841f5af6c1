//! # File Discovery
//!
//! Enumerates initializer files under a directory, filtered by a glob-style
//! pattern matched against the path relative to that directory. Supported
//! glob syntax: `**/` (any number of directories, including none), `*`
//! (anything within one path segment), and `?` (one character within a
//! segment). Everything else matches literally.
//!
//! Enumeration order is not part of the contract, but entries are sorted by
//! file name so runs are reproducible on a given tree.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::InitializerError;

/// Return every file under `directory` whose relative path matches
/// `file_match`.
///
/// A directory that does not exist yields an empty list rather than an
/// error, mirroring a glob with no matches.
pub fn discover_files(directory: &Path, file_match: &str) -> Result<Vec<PathBuf>, InitializerError> {
    let pattern = compile_pattern(file_match)?;

    if !directory.is_dir() {
        debug!(directory = %directory.display(), "initializer directory does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(directory).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| InitializerError::Discovery { source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(directory).unwrap_or(entry.path());
        if pattern.is_match(&relative.to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    debug!(
        directory = %directory.display(),
        pattern = file_match,
        count = files.len(),
        "discovered initializer files"
    );

    Ok(files)
}

/// Compile a glob pattern into an anchored regex over relative paths.
pub(crate) fn compile_pattern(file_match: &str) -> Result<Regex, InitializerError> {
    let mut regex = String::from("^");
    let mut chars = file_match.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        // `**/` also matches zero directories
                        chars.next();
                        regex.push_str("(?:.*/)?");
                    } else {
                        regex.push_str(".*");
                    }
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|source| InitializerError::InvalidPattern {
        pattern: file_match.to_string(),
        source,
    })
}
