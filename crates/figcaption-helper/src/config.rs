//! Where the rewrite passes look for documents.
//!
//! Settings come from `figcaption-helper.toml` when present, e.g.
//!
//! ```toml
//! content-dir = "content/blog"
//! pattern = "*.md"
//! ```
//!
//! and every missing key falls back to its default.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "figcaption-helper.toml";
pub const DEFAULT_CONTENT_DIR: &str = "content/blog";
pub const DEFAULT_PATTERN: &str = "*.md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HelperConfig {
    /// Directory holding the Markdown documents
    pub content_dir: PathBuf,
    /// File name pattern matched inside `content_dir` (not recursive)
    pub pattern: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl HelperConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `figcaption-helper.toml`
    /// in the working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                match fs::read_to_string(default_path) {
                    Ok(text) => Self::from_toml_str(&text, default_path),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
                    Err(source) => Err(ConfigError::Read {
                        path: default_path.to_path_buf(),
                        source,
                    }),
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        tracing::debug!(config = ?config, origin = %origin.display(), "loaded config");
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, content_dir: Option<PathBuf>, pattern: Option<String>) -> Self {
        if let Some(content_dir) = content_dir {
            self.content_dir = content_dir;
        }
        if let Some(pattern) = pattern {
            self.pattern = pattern;
        }
        self
    }

    /// Glob matching the documents, with the directory part escaped
    pub fn content_glob(&self) -> String {
        let dir = glob::Pattern::escape(&self.content_dir.to_string_lossy());
        if dir.is_empty() {
            self.pattern.clone()
        } else {
            format!("{}/{}", dir.trim_end_matches('/'), self.pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = HelperConfig::default();
        assert_eq!(config.content_dir, PathBuf::from("content/blog"));
        assert_eq!(config.pattern, "*.md");
        assert_eq!(config.content_glob(), "content/blog/*.md");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("figcaption-helper.toml");
        fs::write(&path, "content-dir = \"posts\"\n").unwrap();

        let config = HelperConfig::load(Some(&path)).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("posts"));
        assert_eq!(config.pattern, "*.md");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("figcaption-helper.toml");
        fs::write(&path, "recursive = true\n").unwrap();

        let err = HelperConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let err = HelperConfig::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = HelperConfig::default()
            .with_overrides(Some(PathBuf::from("drafts")), Some("*.markdown".to_string()));
        assert_eq!(config.content_glob(), "drafts/*.markdown");
    }

    #[test]
    fn test_glob_metacharacters_in_dir_are_escaped() {
        let config = HelperConfig::default().with_overrides(Some(PathBuf::from("posts[1]")), None);
        assert_eq!(config.content_glob(), "posts[[]1[]]/*.md");
    }
}
