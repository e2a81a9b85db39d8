//! StorePulse - Store Performance Dashboard Pipeline
//!
//! A CLI tool that loads the five retail CSV tables (sales scenario,
//! competitor master, store master, customer master, item master),
//! runs the aggregation pipeline, and renders the derived tables as a
//! Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing input, schema error, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{Report, ReportMetadata};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("StorePulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the dashboard pipeline
    match run_dashboard(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .storepulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".storepulse.toml");

    if path.exists() {
        eprintln!("⚠️  .storepulse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .storepulse.toml")?;

    println!("✅ Created .storepulse.toml with default settings.");
    println!("   Edit it to customize input file names, group sizes, and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete dashboard workflow. Returns exit code (0).
fn run_dashboard(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Resolve the input tables against the data directory
    let paths = loader::DatasetPaths::from_config(&args.data_dir, &config.inputs);

    // Handle --dry-run: probe input files and exit
    if args.dry_run {
        return handle_dry_run(&paths);
    }

    // Step 1: Load the dataset
    println!("📥 Loading input tables from: {}", args.data_dir.display());
    let mut cache = loader::DatasetCache::new();
    let dataset = cache.load(&paths)?;
    info!(
        "Loaded {} sales rows, {} stores, {} competitors",
        dataset.sales.len(),
        dataset.stores.len(),
        dataset.competitors.len()
    );

    // Step 2: Run the aggregation pipeline
    println!("📊 Computing dashboard tables...");
    let summary = analysis::summarize_store_sales(&dataset.sales);
    let joined = analysis::join_with_store_master(&summary, &dataset.stores);
    let market_distribution = analysis::compute_market_distribution(
        &joined,
        config.pipeline.top_n,
        config.pipeline.bottom_n,
    );
    let competitor_counts = analysis::compute_competitor_distribution(&dataset.competitors);
    let comparison =
        analysis::top_bottom_store_comparison(&summary, config.pipeline.comparison_n);

    // Step 3: Build the report
    println!("📝 Generating report...");

    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        data_dir: args.data_dir.display().to_string(),
        generated_at: Utc::now(),
        sales_rows: dataset.sales.len(),
        store_rows: dataset.stores.len(),
        competitor_rows: dataset.competitors.len(),
        customer_rows: dataset.customers.len(),
        item_rows: dataset.items.len(),
        duration_seconds: duration,
    };

    let dashboard = Report {
        metadata,
        market_distribution,
        competitor_counts,
        comparison,
    };

    // Step 4: Generate and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&dashboard, args.view, &config.report)
        }
    };

    // args.output wins over the config value when explicitly set;
    // merge_with_args already folded it into the config
    let output_path = std::path::Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let markets = dashboard
        .market_distribution
        .iter()
        .map(|row| row.market.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    println!("\n📈 Dashboard Summary:");
    println!("   Stores with sales: {}", summary.len());
    println!("   Markets: {}", markets);
    println!(
        "   Competitor markets: {}",
        dashboard.competitor_counts.len()
    );
    println!("   {}", dashboard.comparison.callout());
    println!(
        "\n✅ Report saved to: {} ({:.3}s)",
        output_path.display(),
        duration
    );

    Ok(0)
}

/// Handle --dry-run: probe the input files, print what was found, exit.
fn handle_dry_run(paths: &loader::DatasetPaths) -> Result<i32> {
    println!("\n🔍 Dry run: checking input files (nothing is loaded)...\n");

    let statuses = loader::probe_inputs(paths);
    let mut missing = 0;

    for status in &statuses {
        match status.size {
            Some(size) => {
                println!(
                    "   📄 {} - {} ({} bytes)",
                    status.table,
                    status.path.display(),
                    size
                );
            }
            None => {
                missing += 1;
                println!(
                    "   ⚠️  {} - {} (missing)",
                    status.table,
                    status.path.display()
                );
            }
        }
    }

    if missing > 0 {
        println!(
            "\n   {} of {} input tables missing.",
            missing,
            statuses.len()
        );
    }

    println!("\n✅ Dry run complete. No tables were loaded.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location, then the data directory
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .storepulse.toml");
            Ok(config)
        }
        Ok(None) => match Config::load_from_data_dir(&args.data_dir) {
            Ok(Some(config)) => {
                info!("Found .storepulse.toml in data directory");
                Ok(config)
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Ok(Config::default())
            }
            Err(e) => {
                warn!("Failed to load config: {}", e);
                Ok(Config::default())
            }
        },
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
