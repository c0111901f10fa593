use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::HelperConfig;

/// Expand glob patterns into a list of file paths
///
/// If a pattern doesn't contain glob characters (*, ?, [, ]),
/// treat it as a literal path.
pub fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            files.extend(expand_glob(pattern)?);
        } else {
            let path = PathBuf::from(pattern);
            if !path.exists() {
                anyhow::bail!("File not found: {}", pattern);
            }
            files.push(path);
        }
    }

    Ok(files)
}

/// Files in the configured content directory, one level deep
pub fn content_files(config: &HelperConfig) -> Result<Vec<PathBuf>> {
    let pattern = config.content_glob();
    tracing::debug!(pattern = %pattern, "enumerating content files");
    expand_glob(&pattern)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;

    let mut files = Vec::new();
    for path in paths {
        let path = path.with_context(|| format!("Failed to read glob match for: {}", pattern))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        tracing::warn!("No files matched pattern: {}", pattern);
    }

    Ok(files)
}
