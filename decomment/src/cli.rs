// decomment/src/cli.rs
//! This file defines the command-line interface (CLI) for the decomment application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "decomment",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip comments from source files without touching strings",
    long_about = "decomment removes comments, and only comments, from Python, JavaScript/TypeScript (including JSX/TSX), CSS/SCSS, PHP and HTML/Blade/Jinja files. String, regex and template-literal content that merely looks like a comment is left byte-for-byte intact.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for the decomment crates)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Explicitly disable debug logging, even if RUST_LOG is set to DEBUG
    #[arg(long = "disable-debug", global = true, help = "Disable debug logging, overriding RUST_LOG.")]
    pub disable_debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `decomment` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Removes comments from a file or a directory tree, rewriting files in place.
    #[command(about = "Remove comments from a file or directory, rewriting files in place.")]
    Strip(StripCommand),

    /// Counts removable comments without writing anything.
    #[command(about = "Count removable comments per file without writing anything.")]
    Scan(ScanCommand),

    /// Strips stdin and writes the result to stdout.
    #[command(about = "Strip comments from stdin and write the result to stdout.")]
    Filter(FilterCommand),
}

/// Options that shape the comment engine itself.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Path to a configuration file (YAML), merged over the built-in defaults.
    #[arg(long = "config", value_name = "FILE", help = "Path to a configuration file (YAML).")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "keep-directive",
        value_name = "REGEX",
        help = "Keep comments matching this regex (repeatable)."
    )]
    pub keep_directives: Vec<String>,

    #[arg(long = "no-php", help = "Never call the PHP interpreter; use the built-in fallback scanner.")]
    pub no_php: bool,

    #[arg(
        long = "php-binary",
        value_name = "PATH",
        env = "DECOMMENT_PHP",
        help = "PHP interpreter used to tokenize PHP files."
    )]
    pub php_binary: Option<String>,

    #[arg(long = "php-timeout-ms", value_name = "MS", help = "Time limit for one PHP tokenizer call.")]
    pub php_timeout_ms: Option<u64>,
}

/// Options that decide which files under the target are visited.
#[derive(Args, Debug, Clone, Default)]
pub struct ExcludeArgs {
    #[arg(
        long = "exclude",
        value_name = "GLOB",
        help = "Glob matched against the relative path (repeatable)."
    )]
    pub excludes: Vec<String>,

    #[arg(
        long = "exclude-regex",
        value_name = "REGEX",
        help = "Regex searched in the relative path (repeatable)."
    )]
    pub exclude_regexes: Vec<String>,

    #[arg(long, short = 'j', value_name = "N", help = "Number of worker threads.")]
    pub jobs: Option<usize>,
}

/// Options for the whitespace cleanup applied after stripping.
#[derive(Args, Debug, Clone, Default)]
pub struct WhitespaceArgs {
    #[arg(
        long = "collapse-blank-lines",
        value_name = "N",
        allow_negative_numbers = true,
        help = "Max consecutive blank lines kept (default: 2). Use -1 to disable."
    )]
    pub collapse_blank_lines: Option<i64>,

    #[arg(long = "no-whitespace", help = "Do not trim trailing spaces or collapse blank lines.")]
    pub no_whitespace: bool,
}

/// Arguments for the `strip` command.
#[derive(Parser, Debug)]
pub struct StripCommand {
    /// File or directory to process.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    #[arg(long = "dry-run", help = "Report the files that would change without writing them.")]
    pub dry_run: bool,

    #[arg(long, short = 'D', help = "Print a unified diff of every change.")]
    pub diff: bool,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub exclude: ExcludeArgs,

    #[command(flatten)]
    pub whitespace: WhitespaceArgs,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// File or directory to inspect.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub exclude: ExcludeArgs,

    /// Print the report as JSON to stdout.
    #[arg(long = "json-stdout", help = "Print the scan report to stdout as JSON.")]
    pub json_stdout: bool,

    /// Exit with a non-zero code if the total number of removable comments exceeds this threshold.
    #[arg(
        long = "fail-over-threshold",
        value_name = "N",
        help = "Exit with a non-zero code if more than N removable comments are found."
    )]
    pub fail_over_threshold: Option<usize>,
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterCommand {
    /// Grammar of the input, given as a file extension such as `py` or `blade.php`.
    #[arg(long = "ext", value_name = "EXT", help = "File extension that selects the grammar (e.g. py, tsx, blade.php).")]
    pub ext: String,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub whitespace: WhitespaceArgs,
}
