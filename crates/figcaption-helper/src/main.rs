use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use figcaption_helper::batch::{OutputMode, run_pipeline};
use figcaption_helper::logging::init_tracing;
use figcaption_helper::rule::{CheckResult, RuleRegistry};
use figcaption_helper::utils::glob_expand::{content_files, expand_globs};
use figcaption_helper::HelperConfig;

#[derive(Parser)]
#[command(name = "figcaption-helper")]
#[command(about = "Helper tool for turning figcaption Markdown into Hugo figure shortcodes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./figcaption-helper.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content directory used when no files are given
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// File pattern inside the content directory
    #[arg(long, global = true)]
    pattern: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every place a rule would rewrite
    Check {
        /// Input files or glob patterns (defaults to the content directory)
        files: Vec<String>,

        /// Rules to check (defaults to "all")
        #[arg(short = 'r', long = "rule", default_values_t = vec!["all".to_string()])]
        rule: Vec<String>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Output results as JSONL
        #[arg(long)]
        json: bool,

        /// Save detailed results to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite files, applying rules in pipeline order
    Convert {
        /// Input files or glob patterns (defaults to the content directory)
        files: Vec<String>,

        /// Rules to apply (defaults to "all")
        #[arg(short = 'r', long = "rule", default_values_t = vec!["all".to_string()])]
        rule: Vec<String>,

        /// Check mode: show what would be changed without modifying files
        #[arg(short, long, conflicts_with = "stdout")]
        check: bool,

        /// Print converted content instead of editing files
        #[arg(long)]
        stdout: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all available rules
    ListRules,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let verbose = matches!(
        cli.command,
        Commands::Check { verbose: true, .. } | Commands::Convert { verbose: true, .. }
    );
    init_tracing(verbose)?;

    let config = HelperConfig::load(cli.config.as_deref())?.with_overrides(cli.dir, cli.pattern);
    let registry = RuleRegistry::new()?;

    match cli.command {
        Commands::Check {
            files,
            rule: rule_names,
            verbose,
            json,
            output,
        } => {
            let file_paths = resolve_files(&config, &files)?;
            let rules = registry.resolve(&rule_names)?;

            let mut all_results = Vec::new();
            let mut failed = false;

            for file_path in file_paths {
                if verbose && !json {
                    println!("Checking: {}", file_path.display());
                }

                for rule in &rules {
                    match rule.check(&file_path, verbose && !json) {
                        Ok(results) => {
                            for result in results {
                                if !json {
                                    let location = result.location.map_or_else(
                                        || result.file_path.clone(),
                                        |l| format!("{}:{}:{}", result.file_path, l.row, l.column),
                                    );
                                    println!(
                                        "  {} {} [{}] {}",
                                        "✗".red(),
                                        location,
                                        rule.name().cyan(),
                                        result.message.as_deref().unwrap_or_default()
                                    );
                                }
                                all_results.push(result);
                            }
                        }
                        Err(e) => {
                            failed = true;
                            eprintln!("  {} Error checking {}: {:#}", "✗".red(), rule.name(), e);
                        }
                    }
                }
            }

            if json {
                for result in &all_results {
                    println!("{}", serde_json::to_string(result)?);
                }
            } else {
                print_check_summary(&all_results);
            }

            if let Some(output_path) = output {
                let mut output_str = String::new();
                for result in &all_results {
                    output_str.push_str(&serde_json::to_string(result)?);
                    output_str.push('\n');
                }
                std::fs::write(output_path, output_str)?;
            }

            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Commands::Convert {
            files,
            rule: rule_names,
            check,
            stdout,
            verbose,
        } => {
            let file_paths = resolve_files(&config, &files)?;
            let rules = registry.resolve(&rule_names)?;

            let mode = if check {
                OutputMode::Check
            } else if stdout {
                OutputMode::Stdout
            } else {
                OutputMode::InPlace
            };

            let out = io::stdout();
            let err = io::stderr();
            let report = run_pipeline(
                &rules,
                &file_paths,
                mode,
                verbose,
                &mut out.lock(),
                &mut err.lock(),
            )?;

            Ok(report.exit_code())
        }

        Commands::ListRules => {
            println!("{}", "Available rules (in pipeline order):".bold());
            for name in registry.list_names() {
                let rule = registry.get(&name)?;
                println!("  {} - {}", name.cyan(), rule.description());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_files(config: &HelperConfig, files: &[String]) -> Result<Vec<PathBuf>> {
    if files.is_empty() {
        content_files(config)
    } else {
        expand_globs(files)
    }
}

fn print_check_summary(results: &[CheckResult]) {
    use std::collections::{BTreeMap, HashSet};

    let files_with_matches: HashSet<&str> = results.iter().map(|r| r.file_path.as_str()).collect();

    let mut matches_by_rule: BTreeMap<&str, (usize, HashSet<&str>)> = BTreeMap::new();
    for result in results {
        let entry = matches_by_rule
            .entry(result.rule_name.as_str())
            .or_insert_with(|| (0, HashSet::new()));
        entry.0 += 1;
        entry.1.insert(result.file_path.as_str());
    }

    println!("\n{}", "=== Summary ===".bold());
    println!(
        "Files to rewrite:    {} {}",
        files_with_matches.len(),
        if files_with_matches.is_empty() {
            "✓".green()
        } else {
            "✗".red()
        }
    );

    if !matches_by_rule.is_empty() {
        println!("\n{}", "Matches by rule:".bold());
        for (rule_name, (count, files)) in &matches_by_rule {
            println!(
                "  {}: {} match(es) in {} file(s)",
                rule_name.cyan(),
                count,
                files.len()
            );
        }
    }

    println!("\nTotal matches found: {}", results.len());
}
