//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.storepulse.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input table file names.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "storepulse_report.md".to_string()
}

/// File names of the five input tables, resolved against the data
/// directory. Defaults match the dataset export file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Sales scenario table.
    #[serde(default = "default_scenario_file")]
    pub scenario: String,

    /// Competitor master table.
    #[serde(default = "default_competitor_file")]
    pub competitor: String,

    /// Store master table.
    #[serde(default = "default_store_file")]
    pub store: String,

    /// Customer master table.
    #[serde(default = "default_customer_file")]
    pub customer: String,

    /// Item master table.
    #[serde(default = "default_item_file")]
    pub item: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            scenario: default_scenario_file(),
            competitor: default_competitor_file(),
            store: default_store_file(),
            customer: default_customer_file(),
            item: default_item_file(),
        }
    }
}

fn default_scenario_file() -> String {
    "Scenario3_Data.csv".to_string()
}

fn default_competitor_file() -> String {
    "Competitor_Master.csv".to_string()
}

fn default_store_file() -> String {
    "Store_Master.csv".to_string()
}

fn default_customer_file() -> String {
    "Customer_Master.csv".to_string()
}

fn default_item_file() -> String {
    "Item_Master.csv".to_string()
}

/// Aggregation pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of stores in the top performing group.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of stores in the bottom performing group.
    ///
    /// Deliberately larger than `top_n` by default; see DESIGN.md.
    #[serde(default = "default_bottom_n")]
    pub bottom_n: usize,

    /// Number of stores on each side of the top-vs-bottom comparison.
    #[serde(default = "default_comparison_n")]
    pub comparison_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            bottom_n: default_bottom_n(),
            comparison_n: default_comparison_n(),
        }
    }
}

fn default_top_n() -> usize {
    crate::analysis::DEFAULT_TOP_N
}

fn default_bottom_n() -> usize {
    crate::analysis::DEFAULT_BOTTOM_N
}

fn default_comparison_n() -> usize {
    crate::analysis::DEFAULT_COMPARISON_N
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the metadata section in the report.
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Include the per-store rows of the top-vs-bottom comparison.
    /// When false, only the totals and the difference line are rendered.
    #[serde(default = "default_true")]
    pub include_comparison_detail: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_comparison_detail: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".storepulse.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Try to load configuration from the data directory.
    pub fn load_from_data_dir(data_dir: &Path) -> Result<Option<Self>> {
        let config_path = data_dir.join(".storepulse.toml");

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Pipeline sizes - only override if explicitly provided via CLI
        if let Some(top_n) = args.top_n {
            self.pipeline.top_n = top_n;
        }
        if let Some(bottom_n) = args.bottom_n {
            self.pipeline.bottom_n = bottom_n;
        }
        if let Some(comparison_n) = args.comparison_n {
            self.pipeline.comparison_n = comparison_n;
        }

        // Output - only override when it differs from the clap default
        if let Some(output) = args.output.to_str() {
            if output != crate::cli::DEFAULT_OUTPUT {
                self.general.output = output.to_string();
            }
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "storepulse_report.md");
        assert_eq!(config.inputs.scenario, "Scenario3_Data.csv");
        assert_eq!(config.pipeline.top_n, 7);
        assert_eq!(config.pipeline.bottom_n, 10);
        assert_eq!(config.pipeline.comparison_n, 7);
        assert!(config.report.include_metadata);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[inputs]
scenario = "sales.csv"
store = "stores.csv"

[pipeline]
top_n = 5
bottom_n = 5

[report]
include_comparison_detail = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.inputs.scenario, "sales.csv");
        assert_eq!(config.inputs.store, "stores.csv");
        // Unset inputs keep their defaults
        assert_eq!(config.inputs.competitor, "Competitor_Master.csv");
        assert_eq!(config.pipeline.top_n, 5);
        assert_eq!(config.pipeline.bottom_n, 5);
        assert_eq!(config.pipeline.comparison_n, 7);
        assert!(!config.report.include_comparison_detail);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[inputs]"));
        assert!(toml_str.contains("[pipeline]"));
        assert!(toml_str.contains("[report]"));
    }
}
