//! Data models for the dashboard pipeline.
//!
//! This module contains the typed row schemas for the five input tables
//! and the derived tables produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store grouping used by the market distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StoreGroup {
    /// Every store with sales, regardless of rank.
    #[serde(rename = "All Stores")]
    All,
    /// Stores in the top-n by units sold.
    #[serde(rename = "Top Performing Stores")]
    Top,
    /// Stores in the bottom-n by units sold.
    #[serde(rename = "Bottom Performing Stores")]
    Bottom,
}

impl StoreGroup {
    /// All groups in presentation order.
    pub const ALL: [StoreGroup; 3] = [StoreGroup::All, StoreGroup::Top, StoreGroup::Bottom];

    /// Returns the group label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            StoreGroup::All => "All Stores",
            StoreGroup::Top => "Top Performing Stores",
            StoreGroup::Bottom => "Bottom Performing Stores",
        }
    }
}

impl fmt::Display for StoreGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the sales scenario table.
///
/// Extra scenario columns in the CSV are ignored during decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Store identifier (foreign key into the store master).
    pub store_id: u32,
    /// Units sold in this record. Non-negative by construction.
    pub units_sold: u64,
}

/// One row of the store master table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Store identifier (unique key).
    pub store_id: u32,
    /// Market label the store belongs to.
    pub store_market: String,
}

/// One row of the competitor master table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorRecord {
    /// Market label the competitor operates in.
    pub comp_market: String,
}

/// One row of the customer master table.
///
/// Loaded and counted, but not consumed by any current computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer identifier.
    #[allow(dead_code)] // Kept for future customer-level views
    pub customer_id: u32,
}

/// One row of the item master table.
///
/// Loaded and counted, but not consumed by any current computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item identifier.
    #[allow(dead_code)] // Kept for future item-level views
    pub item_id: u32,
}

/// Total units sold for one store (store sales summary row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSales {
    pub store_id: u32,
    pub units_sold: u64,
}

/// A summary row joined to the store master.
///
/// `market` is `None` when the store id has no match in the store master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMarketRow {
    pub store_id: u32,
    pub units_sold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}

/// One cell of the market distribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDistributionRow {
    pub market: String,
    pub group: StoreGroup,
    pub count: u64,
}

/// Competitor store count for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorCountRow {
    pub market: String,
    pub count: u64,
}

/// Top-k and bottom-k store selections with their sales gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopBottomComparison {
    /// Top-k stores, descending by units sold.
    pub top: Vec<StoreSales>,
    /// Bottom-k stores, ascending by units sold.
    pub bottom: Vec<StoreSales>,
    /// `sum(top units) - sum(bottom units)`.
    pub difference: i64,
}

impl TopBottomComparison {
    /// Returns the human-readable difference callout, e.g.
    /// "Difference: 12,345 units".
    pub fn callout(&self) -> String {
        format!("Difference: {} units", format_count(self.difference))
    }
}

/// Formats an integer with thousands separators.
pub fn format_count(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Metadata about one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Directory the input tables were loaded from.
    pub data_dir: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Raw sales rows loaded.
    pub sales_rows: usize,
    /// Store master rows loaded.
    pub store_rows: usize,
    /// Competitor master rows loaded.
    pub competitor_rows: usize,
    /// Customer master rows loaded.
    pub customer_rows: usize,
    /// Item master rows loaded.
    pub item_rows: usize,
    /// Duration of the computation in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard report: all three derived tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about this run.
    pub metadata: ReportMetadata,
    /// Store counts by market and group.
    pub market_distribution: Vec<MarketDistributionRow>,
    /// Competitor store counts by market.
    pub competitor_counts: Vec<CompetitorCountRow>,
    /// Top-vs-bottom store comparison.
    pub comparison: TopBottomComparison,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_group_labels() {
        assert_eq!(StoreGroup::All.label(), "All Stores");
        assert_eq!(StoreGroup::Top.label(), "Top Performing Stores");
        assert_eq!(StoreGroup::Bottom.label(), "Bottom Performing Stores");
        assert_eq!(StoreGroup::Top.to_string(), "Top Performing Stores");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(-4_200), "-4,200");
    }

    #[test]
    fn test_comparison_callout() {
        let comparison = TopBottomComparison {
            top: vec![StoreSales {
                store_id: 1,
                units_sold: 13_345,
            }],
            bottom: vec![StoreSales {
                store_id: 2,
                units_sold: 1_000,
            }],
            difference: 12_345,
        };

        assert_eq!(comparison.callout(), "Difference: 12,345 units");
    }

    #[test]
    fn test_store_group_serde_labels() {
        let json = serde_json::to_string(&StoreGroup::Bottom).unwrap();
        assert_eq!(json, "\"Bottom Performing Stores\"");

        let parsed: StoreGroup = serde_json::from_str("\"All Stores\"").unwrap();
        assert_eq!(parsed, StoreGroup::All);
    }
}
