//! Running rules over many files.
//!
//! A failing file is reported on the error stream and skipped; the rest of
//! the batch still runs.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::HelperConfig;
use crate::rule::{Rule, RuleRegistry};
use crate::utils::file_io::{read_file, write_file};
use crate::utils::glob_expand::content_files;

/// A file that could not be processed
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files_seen: usize,
    /// Files rewritten on disk
    pub modified: Vec<PathBuf>,
    /// Files whose content a rule changed, written or not
    pub changed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn files_modified(&self) -> usize {
        self.modified.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.has_failures() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// What to do with content a rule changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rewrite the file
    InPlace,
    /// Report only
    Check,
    /// Print the rewritten content
    Stdout,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .to_string()
}

fn report_failure<E: Write>(err: &mut E, path: &Path, error: &anyhow::Error) -> io::Result<()> {
    writeln!(
        err,
        "{} Error processing {}: {:#}",
        "✗".red(),
        path.display(),
        error
    )
}

/// Run one rule over `files`, rewriting changed files in place.
///
/// Prints `<label>: <file name>` for every rewritten file and the rule's
/// summary line at the end.
pub fn run_pass<O: Write, E: Write>(
    rule: &dyn Rule,
    files: &[PathBuf],
    out: &mut O,
    err: &mut E,
) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();

    for path in files {
        report.files_seen += 1;

        match rule.convert(path, true, false, false) {
            Ok(result) if result.changed => {
                writeln!(out, "{}: {}", rule.progress_label(), display_name(path))?;
                report.changed.push(path.clone());
                report.modified.push(path.clone());
            }
            Ok(_) => {}
            Err(error) => {
                report_failure(err, path, &error)?;
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    if let Some(summary) = rule.summary(report.files_modified()) {
        writeln!(out, "{}", summary)?;
    }

    tracing::info!(
        rule = rule.name(),
        files = report.files_seen,
        modified = report.files_modified(),
        failed = report.failures.len(),
        "pass finished"
    );

    Ok(report)
}

/// Entry point shared by the single-pass binaries: run `rule_name` over the
/// configured content directory.
pub fn run_standalone(rule_name: &str) -> Result<ExitCode> {
    crate::logging::init_tracing(false)?;

    let config = HelperConfig::load(None)?;
    let registry = RuleRegistry::new()?;
    let rule = registry.get(rule_name)?;
    let files = content_files(&config)?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let report = run_pass(rule.as_ref(), &files, &mut stdout.lock(), &mut stderr.lock())?;

    Ok(report.exit_code())
}

/// Replacements made by one rule inside a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleApplication {
    pub rule_name: String,
    pub replacements: usize,
}

/// Apply `rules` in order, each to the previous rule's output.
/// Rules that matched nothing are left out of the returned list.
pub fn apply_pipeline(
    rules: &[Arc<dyn Rule + Send + Sync>],
    content: &str,
) -> (String, Vec<RuleApplication>) {
    let mut current = content.to_string();
    let mut applied = Vec::new();

    for rule in rules {
        let rewrite = rule.rewrite(&current);
        if rewrite.is_changed_from(&current) {
            applied.push(RuleApplication {
                rule_name: rule.name().to_string(),
                replacements: rewrite.replacements,
            });
            current = rewrite.content;
        }
    }

    (current, applied)
}

/// Run several rules over `files`, reading and writing each file once.
pub fn run_pipeline<O: Write, E: Write>(
    rules: &[Arc<dyn Rule + Send + Sync>],
    files: &[PathBuf],
    mode: OutputMode,
    verbose: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut modified_by_rule = vec![0usize; rules.len()];

    for path in files {
        report.files_seen += 1;
        if verbose {
            writeln!(out, "Processing: {}", path.display())?;
        }

        let outcome = read_file(path).map_err(anyhow::Error::from).and_then(|content| {
            let (rewritten, applied) = apply_pipeline(rules, &content);
            if mode == OutputMode::InPlace && !applied.is_empty() {
                write_file(path, &rewritten)?;
            }
            Ok((rewritten, applied))
        });

        let (rewritten, applied) = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                report_failure(err, path, &error)?;
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
                continue;
            }
        };

        // Unchanged documents are still echoed so the output is complete
        if mode == OutputMode::Stdout {
            write!(out, "{}", rewritten)?;
        }

        if applied.is_empty() {
            continue;
        }
        report.changed.push(path.clone());
        if mode == OutputMode::InPlace {
            report.modified.push(path.clone());
        }

        for application in &applied {
            let Some(index) = rules
                .iter()
                .position(|rule| rule.name() == application.rule_name)
            else {
                continue;
            };
            modified_by_rule[index] += 1;
            let rule = &rules[index];

            match mode {
                OutputMode::InPlace => {
                    writeln!(out, "{}: {}", rule.progress_label(), display_name(path))?;
                }
                OutputMode::Check => {
                    writeln!(
                        out,
                        "  Would fix {} - {} rewrite(s) in {}",
                        rule.name().cyan(),
                        application.replacements,
                        path.display()
                    )?;
                }
                OutputMode::Stdout => {}
            }
        }
    }

    if mode == OutputMode::InPlace {
        for (rule, count) in rules.iter().zip(&modified_by_rule) {
            if let Some(summary) = rule.summary(*count) {
                writeln!(out, "{}", summary)?;
            }
        }
    }

    Ok(report)
}
