//! Markdown report generation.
//!
//! This module renders the derived dashboard tables as a Markdown
//! report, section per view, plus a JSON alternative.

use crate::cli::View;
use crate::config::ReportConfig;
use crate::models::{
    format_count, CompetitorCountRow, MarketDistributionRow, Report, ReportMetadata, StoreGroup,
    StoreSales, TopBottomComparison,
};
use anyhow::Result;
use std::collections::HashMap;

/// Generate a complete Markdown report for the selected view.
pub fn generate_markdown_report(report: &Report, view: View, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# StorePulse Report\n\n");

    // Metadata section
    if config.include_metadata {
        output.push_str(&generate_metadata_section(&report.metadata));
    }

    // Dashboard sections, gated by the selected view
    if matches!(view, View::MarketDistribution | View::All) {
        output.push_str(&generate_distribution_section(&report.market_distribution));
    }

    if matches!(view, View::CompetitorCount | View::All) {
        output.push_str(&generate_competitor_section(&report.competitor_counts));
    }

    if matches!(view, View::TopBottom | View::All) {
        output.push_str(&generate_comparison_section(
            &report.comparison,
            config.include_comparison_detail,
        ));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Data Directory:** {}\n", metadata.data_dir));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Sales Rows:** {}\n", metadata.sales_rows));
    section.push_str(&format!("- **Stores:** {}\n", metadata.store_rows));
    section.push_str(&format!(
        "- **Competitors:** {}\n",
        metadata.competitor_rows
    ));
    section.push_str(&format!("- **Customers:** {}\n", metadata.customer_rows));
    section.push_str(&format!("- **Items:** {}\n", metadata.item_rows));
    section.push_str(&format!(
        "- **Computation Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the store distribution section.
///
/// The long-format triples are pivoted to one row per market with a
/// column per group.
fn generate_distribution_section(rows: &[MarketDistributionRow]) -> String {
    let mut section = String::new();

    section.push_str("## Store Distribution by Market\n\n");

    if rows.is_empty() {
        section.push_str("No stores with sales were found in the input data.\n\n");
        return section;
    }

    let mut markets: Vec<&str> = Vec::new();
    let mut counts: HashMap<(&str, StoreGroup), u64> = HashMap::new();
    for row in rows {
        if !markets.contains(&row.market.as_str()) {
            markets.push(row.market.as_str());
        }
        counts.insert((row.market.as_str(), row.group), row.count);
    }

    section.push_str("| Market | All Stores | Top Performing Stores | Bottom Performing Stores |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for market in markets {
        let cells: Vec<String> = StoreGroup::ALL
            .iter()
            .map(|group| {
                counts
                    .get(&(market, *group))
                    .copied()
                    .unwrap_or(0)
                    .to_string()
            })
            .collect();
        section.push_str(&format!("| {} | {} |\n", market, cells.join(" | ")));
    }
    section.push('\n');

    section
}

/// Generate the competitor count section.
fn generate_competitor_section(rows: &[CompetitorCountRow]) -> String {
    let mut section = String::new();

    section.push_str("## Competitor Store Count by Market\n\n");

    if rows.is_empty() {
        section.push_str("No competitor stores were found in the input data.\n\n");
        return section;
    }

    section.push_str("| Market | Competitor Stores |\n");
    section.push_str("|:---|:---:|\n");

    for row in rows {
        section.push_str(&format!("| {} | {} |\n", row.market, row.count));
    }
    section.push('\n');

    section
}

/// Generate the top-vs-bottom comparison section.
fn generate_comparison_section(comparison: &TopBottomComparison, detail: bool) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Top {} vs Bottom {} Store Sales\n\n",
        comparison.top.len(),
        comparison.bottom.len()
    ));

    if comparison.top.is_empty() {
        section.push_str("No store sales were found in the input data.\n\n");
        return section;
    }

    if detail {
        section.push_str("### Top Performing Stores\n\n");
        section.push_str(&generate_store_table(&comparison.top));

        section.push_str("### Bottom Performing Stores\n\n");
        section.push_str(&generate_store_table(&comparison.bottom));
    }

    let top_total: u64 = comparison.top.iter().map(|row| row.units_sold).sum();
    let bottom_total: u64 = comparison.bottom.iter().map(|row| row.units_sold).sum();

    section.push_str(&format!(
        "**Top group total:** {} units | **Bottom group total:** {} units\n\n",
        format_count(top_total as i64),
        format_count(bottom_total as i64)
    ));
    section.push_str(&format!("> 💡 **{}**\n\n", comparison.callout()));

    section
}

/// Generate a store id / units sold table.
fn generate_store_table(rows: &[StoreSales]) -> String {
    let mut table = String::new();

    table.push_str("| Store ID | Units Sold |\n");
    table.push_str("|:---|---:|\n");

    for row in rows {
        table.push_str(&format!(
            "| {} | {} |\n",
            row.store_id,
            format_count(row.units_sold as i64)
        ));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by StorePulse*\n");

    footer
}

/// Generate a JSON report.
///
/// JSON output always carries the full report; view selection is a
/// Markdown presentation concern.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
