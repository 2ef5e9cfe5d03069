//! Grouped performance metrics per product line and deal-size tier.

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::Dataset;

use super::numeric::round_to;
use super::temporal::{SalesAccumulator, SalesStats};

/// Per-product-line performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProductLineStats {
    /// Sales count/sum/mean/median for the line.
    pub sales: SalesStats,
    /// Total ordered quantity across the line.
    pub quantity_total: i64,
    /// Mean profit margin; `None` when every margin is missing.
    pub mean_profit_margin: Option<f64>,
}

/// Per-deal-size performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DealSizeStats {
    /// Present sales values in the tier.
    pub count: usize,
    /// Summed sales.
    pub sales_sum: f64,
    /// Mean sales.
    pub sales_mean: f64,
    /// Total ordered quantity across the tier.
    pub quantity_total: i64,
}

#[derive(Default)]
struct LineAccumulator {
    sales: SalesAccumulator,
    quantity: i64,
    margin_sum: f64,
    margin_count: usize,
}

/// Group by product line in first-seen order.
pub fn product_line_stats(dataset: &Dataset) -> IndexMap<String, ProductLineStats> {
    let mut groups: IndexMap<String, LineAccumulator> = IndexMap::new();
    for record in dataset.iter() {
        let group = groups.entry(record.product_line.clone()).or_default();
        if let Some(sales) = record.sales {
            group.sales.push(sales);
        }
        group.quantity += record.quantity_ordered;
        if let Some(margin) = record.profit_margin {
            group.margin_sum += margin;
            group.margin_count += 1;
        }
    }
    groups
        .into_iter()
        .map(|(line, acc)| {
            let mean_profit_margin = (acc.margin_count > 0)
                .then(|| round_to(acc.margin_sum / acc.margin_count as f64, 2));
            (
                line,
                ProductLineStats {
                    sales: acc.sales.finish(),
                    quantity_total: acc.quantity,
                    mean_profit_margin,
                },
            )
        })
        .collect()
}

/// Group by deal-size tier in first-seen order.
pub fn deal_size_stats(dataset: &Dataset) -> IndexMap<String, DealSizeStats> {
    let mut groups: IndexMap<String, (SalesAccumulator, i64)> = IndexMap::new();
    for record in dataset.iter() {
        let group = groups.entry(record.deal_size.clone()).or_default();
        if let Some(sales) = record.sales {
            group.0.push(sales);
        }
        group.1 += record.quantity_ordered;
    }
    groups
        .into_iter()
        .map(|(tier, (acc, quantity))| {
            let stats = acc.finish();
            (
                tier,
                DealSizeStats {
                    count: stats.count,
                    sales_sum: stats.sum,
                    sales_mean: stats.mean,
                    quantity_total: quantity,
                },
            )
        })
        .collect()
}
