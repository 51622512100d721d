/*!
 * Configuration handling for concat and opt
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::filter::default_ignore_file;
use crate::format::OutputFormat;
use crate::report::ReportFormat;
use crate::tokenizer::Model;
use crate::types::ExtensionSet;

/// Command-line arguments for concat
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "concat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenates project files for LLM context",
    long_about = "Concatenates project files and copies the result to the clipboard, a file or stdout.\nDesigned for easily grabbing project context for LLMs."
)]
pub struct Args {
    /// Directory to snapshot
    #[clap(default_value = ".")]
    pub directory: PathBuf,

    /// Include files with this extension (e.g. 'py', 'js'). Repeatable or comma-separated
    #[clap(
        short = 'p',
        long = "pattern",
        value_delimiter = ',',
        required_unless_present = "generate"
    )]
    pub patterns: Vec<String>,

    /// Ignore files or directories matching this gitignore-style pattern
    #[clap(short = 'i', long = "ignore", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Write the snapshot to a file instead of the clipboard
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Include a directory tree at the top of the output
    #[clap(short, long)]
    pub tree: bool,

    /// Delimit files with <file path="..."> tags instead of Markdown headers
    #[clap(short = 'x', long)]
    pub xml: bool,

    /// Print the snapshot to stdout instead of the clipboard
    #[clap(short, long)]
    pub stdout: bool,

    /// Exclude test files (e.g. _test.go, .spec.ts, test_*.py)
    #[clap(short = 'n', long)]
    pub no_tests: bool,

    /// Do not read the repository .gitignore file
    #[clap(long)]
    pub no_gitignore: bool,

    /// Read ignore rules from this file instead of <DIRECTORY>/.gitignore
    #[clap(long, conflicts_with = "no_gitignore")]
    pub gitignore_path: Option<PathBuf>,

    /// Style of the end-of-run report printed to stderr
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence logs, progress and the report
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Command-line arguments for opt
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "opt",
    version = env!("CARGO_PKG_VERSION"),
    about = "Stream optimizer for LLM context",
    long_about = "Refines text streams for LLM consumption.\nHandles cost estimation, whitespace compaction and license stripping."
)]
pub struct OptArgs {
    /// Reduce whitespace to save tokens
    #[clap(short, long)]
    pub compact: bool,

    /// Strip copyright/license headers from every file
    #[clap(long)]
    pub strip_headers: bool,

    /// Estimate tokens (printed to stderr)
    #[clap(long, visible_alias = "dry-run")]
    pub cost: bool,

    /// Print output to stdout instead of the clipboard
    #[clap(short, long)]
    pub stdout: bool,

    /// Count tokens exactly with this model's encoding
    #[clap(long, value_enum)]
    pub model: Option<Model>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence logs
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Validated settings for one concat run
#[derive(Clone, Debug)]
pub struct Config {
    /// Traversal root
    pub target_dir: PathBuf,

    /// Requested extensions, leading dots removed
    pub extensions: Vec<String>,

    /// User ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Output file, if any
    pub output_file: Option<PathBuf>,

    /// Whether the snapshot starts with a directory tree
    pub include_tree: bool,

    /// Per-file delimiter style
    pub output_format: OutputFormat,

    /// Force stdout as the sink
    pub print_to_stdout: bool,

    /// Skip files named like tests
    pub exclude_tests: bool,

    /// Whether the repository ignore file is consulted
    pub respect_gitignore: bool,

    /// Ignore file read instead of `<target_dir>/.gitignore`
    pub gitignore_path: Option<PathBuf>,

    /// End-of-run report style
    pub report_format: ReportFormat,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let extensions = ExtensionSet::new(&args.patterns)
            .sorted()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            target_dir: args.directory,
            extensions,
            ignore_patterns: args
                .ignore
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            output_file: args.output,
            include_tree: args.tree,
            output_format: OutputFormat::from_xml_flag(args.xml),
            print_to_stdout: args.stdout,
            exclude_tests: args.no_tests,
            respect_gitignore: !args.no_gitignore,
            gitignore_path: args.gitignore_path,
            report_format: args.report,
        }
    }

    /// Defaults for a snapshot of the current directory with `extensions`
    pub fn for_extensions(extensions: &[&str]) -> Self {
        Self {
            target_dir: PathBuf::from("."),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            ignore_patterns: Vec::new(),
            output_file: None,
            include_tree: false,
            output_format: OutputFormat::Markdown,
            print_to_stdout: false,
            exclude_tests: false,
            respect_gitignore: true,
            gitignore_path: None,
            report_format: ReportFormat::Summary,
        }
    }

    /// Validate the configuration before any traversal
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.extensions.is_empty(),
            Config,
            "You must specify at least one file type to include with -p"
        );

        ensure!(
            self.target_dir.is_dir(),
            Config,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        if let Some(parent) = self.output_file.as_deref().and_then(Path::parent) {
            ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        if let Some(path) = &self.gitignore_path {
            ensure!(
                path.is_file(),
                Config,
                "Custom .gitignore file not found: {}",
                path.display()
            );
        }

        Ok(())
    }

    /// Ignore file to layer on top of the built-in rules, if any
    pub fn ignore_file(&self) -> Option<PathBuf> {
        if !self.respect_gitignore {
            return None;
        }

        Some(
            self.gitignore_path
                .clone()
                .unwrap_or_else(|| default_ignore_file(&self.target_dir)),
        )
    }

    /// Anchored pattern matching the output file when it lies inside the
    /// traversal root, so a snapshot never ingests a previous one
    pub fn output_exclusion_pattern(&self) -> Option<String> {
        let output = self.output_file.as_deref()?;
        let root = fs::canonicalize(&self.target_dir).ok()?;

        let file_name = output.file_name()?;
        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => env::current_dir().ok()?,
        };
        let absolute = fs::canonicalize(parent).ok()?.join(file_name);

        let relative = absolute.strip_prefix(&root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| escape_glob(&c.as_os_str().to_string_lossy()))
            .collect();

        Some(format!("/{}", parts.join("/")))
    }
}

/// Escape gitignore glob metacharacters so a name matches literally
fn escape_glob(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
