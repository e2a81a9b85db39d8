//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Default report output path, shared with the config merge.
pub const DEFAULT_OUTPUT: &str = "storepulse_report.md";

/// StorePulse - store performance dashboard pipeline
///
/// Load the five retail CSV tables (sales scenario, competitor master,
/// store master, customer master, item master), compute the market
/// distribution, competitor counts, and the top-vs-bottom store
/// comparison, and render them as a Markdown or JSON report.
///
/// Examples:
///   storepulse --data-dir ./fixtures/sample_data
///   storepulse --data-dir ./data --view top-bottom --comparison-n 5
///   storepulse --data-dir ./data --format json --output report.json
///   storepulse --data-dir ./data --dry-run
///   storepulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the input CSV tables
    ///
    /// File names are configurable via .storepulse.toml; the defaults
    /// match the dataset export file names.
    #[arg(
        short,
        long,
        default_value = ".",
        value_name = "DIR",
        env = "STOREPULSE_DATA_DIR"
    )]
    pub data_dir: PathBuf,

    /// Dashboard view to render
    ///
    /// `all` renders every section; the other values render a single
    /// section, mirroring the dashboard's visualization toggle.
    #[arg(long, default_value = "all", value_name = "VIEW")]
    pub view: View,

    /// Output file path for the report
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .storepulse.toml in the current
    /// directory, then in the data directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of stores in the top performing group
    #[arg(long, value_name = "COUNT")]
    pub top_n: Option<usize>,

    /// Number of stores in the bottom performing group
    #[arg(long, value_name = "COUNT")]
    pub bottom_n: Option<usize>,

    /// Number of stores on each side of the top-vs-bottom comparison
    #[arg(long, value_name = "COUNT")]
    pub comparison_n: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: check which input files are present and exit
    ///
    /// Nothing is loaded or computed.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .storepulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Dashboard view selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    /// Store counts by market, split into all/top/bottom groups
    MarketDistribution,
    /// Competitor store counts by market
    CompetitorCount,
    /// Top-vs-bottom store sales comparison
    TopBottom,
    /// All three sections (default)
    #[default]
    All,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate the data directory
        if !self.data_dir.exists() {
            return Err(format!(
                "Data directory does not exist: {}",
                self.data_dir.display()
            ));
        }
        if !self.data_dir.is_dir() {
            return Err(format!(
                "Data path is not a directory: {}",
                self.data_dir.display()
            ));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate group sizes if provided
        if self.top_n == Some(0) {
            return Err("--top-n must be at least 1".to_string());
        }
        if self.bottom_n == Some(0) {
            return Err("--bottom-n must be at least 1".to_string());
        }
        if self.comparison_n == Some(0) {
            return Err("--comparison-n must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
