//! The aggregation pipeline feeding the dashboard tables.
//!
//! Every operation here is a pure function of its inputs: group-bys,
//! a left join, top/bottom-k selection, and the zero-filled market
//! distribution cross product. Malformed input never reaches this
//! module; the loader rejects it first.

use crate::models::{
    CompetitorCountRow, CompetitorRecord, MarketDistributionRow, SalesRecord, StoreGroup,
    StoreMarketRow, StoreRecord, StoreSales, TopBottomComparison,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Default size of the top performing group.
pub const DEFAULT_TOP_N: usize = 7;
/// Default size of the bottom performing group.
pub const DEFAULT_BOTTOM_N: usize = 10;
/// Default size of each side of the top-vs-bottom comparison.
pub const DEFAULT_COMPARISON_N: usize = 7;

/// Group sales records by store id and sum units sold.
///
/// One row per distinct store id, sorted by store id. Empty input
/// yields an empty result.
pub fn summarize_store_sales(sales: &[SalesRecord]) -> Vec<StoreSales> {
    let mut totals: BTreeMap<u32, u64> = BTreeMap::new();

    for record in sales {
        *totals.entry(record.store_id).or_default() += record.units_sold;
    }

    totals
        .into_iter()
        .map(|(store_id, units_sold)| StoreSales {
            store_id,
            units_sold,
        })
        .collect()
}

/// Left join the sales summary to the store master on store id.
///
/// Every summary row is preserved; stores without a master entry carry
/// `market: None`. Master rows without sales are dropped.
pub fn join_with_store_master(
    summary: &[StoreSales],
    stores: &[StoreRecord],
) -> Vec<StoreMarketRow> {
    let markets: HashMap<u32, &str> = stores
        .iter()
        .map(|store| (store.store_id, store.store_market.as_str()))
        .collect();

    summary
        .iter()
        .map(|row| StoreMarketRow {
            store_id: row.store_id,
            units_sold: row.units_sold,
            market: markets.get(&row.store_id).map(|market| market.to_string()),
        })
        .collect()
}

/// Count stores per market for the all/top/bottom groups.
///
/// Produces the full cross product of every market seen in any group
/// with all three groups, filling absent combinations with zero.
/// Markets are sorted; groups appear in `StoreGroup::ALL` order.
pub fn compute_market_distribution(
    joined: &[StoreMarketRow],
    top_n: usize,
    bottom_n: usize,
) -> Vec<MarketDistributionRow> {
    let top = largest_k(joined, top_n, |row| row.units_sold);
    let bottom = smallest_k(joined, bottom_n, |row| row.units_sold);

    let all_counts = count_by_market(joined);
    let top_counts = count_by_market(&top);
    let bottom_counts = count_by_market(&bottom);

    let markets: BTreeSet<&String> = all_counts
        .keys()
        .chain(top_counts.keys())
        .chain(bottom_counts.keys())
        .collect();

    let mut table = Vec::with_capacity(markets.len() * StoreGroup::ALL.len());
    for market in markets {
        for (group, counts) in [
            (StoreGroup::All, &all_counts),
            (StoreGroup::Top, &top_counts),
            (StoreGroup::Bottom, &bottom_counts),
        ] {
            table.push(MarketDistributionRow {
                market: market.clone(),
                group,
                count: counts.get(market).copied().unwrap_or(0),
            });
        }
    }

    table
}

/// Count competitor stores per market.
pub fn compute_competitor_distribution(
    competitors: &[CompetitorRecord],
) -> Vec<CompetitorCountRow> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for record in competitors {
        *counts.entry(record.comp_market.clone()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(market, count)| CompetitorCountRow { market, count })
        .collect()
}

/// Select the top-k and bottom-k stores by units sold and their sales gap.
///
/// With fewer than `k` rows, each bucket holds every available row and
/// the difference collapses toward zero.
pub fn top_bottom_store_comparison(rows: &[StoreSales], k: usize) -> TopBottomComparison {
    let top = largest_k(rows, k, |row| row.units_sold);
    let bottom = smallest_k(rows, k, |row| row.units_sold);

    let top_total: u64 = top.iter().map(|row| row.units_sold).sum();
    let bottom_total: u64 = bottom.iter().map(|row| row.units_sold).sum();

    TopBottomComparison {
        top,
        bottom,
        difference: top_total as i64 - bottom_total as i64,
    }
}

/// The `k` rows with the greatest units, descending.
///
/// The sort is stable, so ties keep their input order (first seen wins).
fn largest_k<T: Clone>(rows: &[T], k: usize, units: impl Fn(&T) -> u64) -> Vec<T> {
    let mut selected = rows.to_vec();
    selected.sort_by(|a, b| units(b).cmp(&units(a)));
    selected.truncate(k);
    selected
}

/// The `k` rows with the least units, ascending. Same tie-break as
/// [`largest_k`].
fn smallest_k<T: Clone>(rows: &[T], k: usize, units: impl Fn(&T) -> u64) -> Vec<T> {
    let mut selected = rows.to_vec();
    selected.sort_by(|a, b| units(a).cmp(&units(b)));
    selected.truncate(k);
    selected
}

/// Count joined rows per market label. Rows with no market match are
/// excluded; a null market is not a market.
fn count_by_market(rows: &[StoreMarketRow]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for row in rows {
        if let Some(market) = &row.market {
            *counts.entry(market.clone()).or_default() += 1;
        }
    }

    counts
}
