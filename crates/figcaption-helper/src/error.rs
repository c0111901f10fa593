//! Error types for file access and configuration loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading or rewriting a single document.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read, or its replacement could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("File is not valid UTF-8: {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The rewritten temp file could not be moved over the original.
    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl FileError {
    /// The document the error refers to
    pub fn path(&self) -> &Path {
        match self {
            FileError::Io { path, .. }
            | FileError::Decode { path, .. }
            | FileError::Persist { path, .. } => path,
        }
    }
}

/// Errors raised while loading `figcaption-helper.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
