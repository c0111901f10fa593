use anyhow::{Result, anyhow};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::file_io::{read_file, write_file};

/// Location information for a match (both 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub row: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Convert a byte offset into a row/column pair
    pub fn from_offset(content: &str, offset: usize) -> Self {
        let before = &content[..offset];
        let row = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { row, column }
    }
}

/// A single place in a document that a rule would rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub offset: usize,
    pub message: String,
}

/// Output of applying a rule to a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub replacements: usize,
}

impl Rewrite {
    /// Build the rewritten text from non-overlapping, ascending replacements.
    pub fn splice<I>(content: &str, replacements: I) -> Self
    where
        I: IntoIterator<Item = (Range<usize>, String)>,
    {
        let mut result = String::with_capacity(content.len());
        let mut last = 0;
        let mut count = 0;

        for (span, replacement) in replacements {
            result.push_str(&content[last..span.start]);
            result.push_str(&replacement);
            last = span.end;
            count += 1;
        }
        result.push_str(&content[last..]);

        Self {
            content: result,
            replacements: count,
        }
    }

    pub fn is_changed_from(&self, original: &str) -> bool {
        self.content != original
    }
}

/// Result of checking a file for a specific rule.
/// Each CheckResult represents a single match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub rule_name: String,
    pub file_path: String,
    pub has_issue: bool,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// Result of converting a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    pub rule_name: String,
    pub file_path: String,
    pub fixes_applied: usize,
    /// True when the file content differs after the rule ran
    pub changed: bool,
    pub message: Option<String>,
}

/// A rewrite pass over blog Markdown
pub trait Rule {
    /// The name of this rule (e.g., "figure-shortcode")
    fn name(&self) -> &str;

    /// A short description of what this rule rewrites
    fn description(&self) -> &str;

    /// Label printed before the name of every file the rule rewrote
    fn progress_label(&self) -> &str;

    /// Closing line printed after a batch, if the rule has one
    fn summary(&self, files_modified: usize) -> Option<String>;

    /// Every place in `content` the rule would rewrite
    fn find(&self, content: &str) -> Vec<Finding>;

    /// Apply the rule to every match in `content`
    fn rewrite(&self, content: &str) -> Rewrite;

    /// Check a file for matches.
    /// Returns one CheckResult per match found.
    fn check(&self, file_path: &Path, _verbose: bool) -> Result<Vec<CheckResult>> {
        let content = read_file(file_path)?;

        let results = self
            .find(&content)
            .into_iter()
            .map(|finding| CheckResult {
                rule_name: self.name().to_string(),
                file_path: file_path.to_string_lossy().to_string(),
                has_issue: true,
                message: Some(finding.message),
                location: Some(SourceLocation::from_offset(&content, finding.offset)),
            })
            .collect();

        Ok(results)
    }

    /// Convert a file.
    /// If neither in_place nor check_mode is set, the converted content is
    /// returned in the message field.
    fn convert(
        &self,
        file_path: &Path,
        in_place: bool,
        check_mode: bool,
        _verbose: bool,
    ) -> Result<ConvertResult> {
        let content = read_file(file_path)?;
        let rewrite = self.rewrite(&content);
        let changed = rewrite.is_changed_from(&content);

        let message = if !changed {
            tracing::debug!(rule = self.name(), file = %file_path.display(), "no matches");
            None
        } else if check_mode {
            Some(format!("Would apply {} rewrite(s)", rewrite.replacements))
        } else if in_place {
            write_file(file_path, &rewrite.content)?;
            tracing::info!(
                rule = self.name(),
                file = %file_path.display(),
                replacements = rewrite.replacements,
                "rewrote file"
            );
            Some(format!("Applied {} rewrite(s)", rewrite.replacements))
        } else {
            Some(rewrite.content.clone())
        };

        Ok(ConvertResult {
            rule_name: self.name().to_string(),
            file_path: file_path.to_string_lossy().to_string(),
            fixes_applied: rewrite.replacements,
            changed,
            message,
        })
    }
}

/// Registry of all available rules, kept in pipeline order
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule + Send + Sync>>,
}

impl RuleRegistry {
    /// Create a new registry and register all known rules
    pub fn new() -> Result<Self> {
        let mut registry = Self { rules: Vec::new() };

        // Each rule consumes the previous rule's output
        registry.register(Arc::new(
            crate::conversions::figure_shortcode::FigureShortcodeConverter::new()?,
        ));
        registry.register(Arc::new(
            crate::conversions::caption_quotes::CaptionQuoteNormalizer::new()?,
        ));
        registry.register(Arc::new(
            crate::conversions::simplify_captions::CaptionSimplifier::new()?,
        ));

        Ok(registry)
    }

    fn register(&mut self, rule: Arc<dyn Rule + Send + Sync>) {
        self.rules.push(rule);
    }

    /// Get a rule by name, or return an error if not found
    pub fn get(&self, name: &str) -> Result<Arc<dyn Rule + Send + Sync>> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown rule: {}", name))
    }

    /// Get all registered rules in pipeline order
    pub fn all(&self) -> Vec<Arc<dyn Rule + Send + Sync>> {
        self.rules.clone()
    }

    /// Resolve rule names, keeping pipeline order. "all" selects every rule.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Arc<dyn Rule + Send + Sync>>> {
        if names.iter().any(|name| name == "all") {
            return Ok(self.all());
        }

        for name in names {
            self.get(name)?;
        }

        Ok(self
            .rules
            .iter()
            .filter(|rule| names.iter().any(|name| name == rule.name()))
            .cloned()
            .collect())
    }

    /// List all rule names in pipeline order
    pub fn list_names(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.name().to_string()).collect()
    }
}
