//! Time-bucketed sales aggregates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{reports, WEEKDAY_ORDER};
use crate::record::Dataset;

use super::numeric::{percentile, round_to};

/// Count/sum/mean/median of sales within one group.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalesStats {
    /// Present sales values in the group.
    pub count: usize,
    /// Sum of sales.
    pub sum: f64,
    /// Mean sales.
    pub mean: f64,
    /// Median sales (linear interpolation).
    pub median: f64,
}

/// Running per-group accumulator finalized into [`SalesStats`].
#[derive(Clone, Debug, Default)]
pub struct SalesAccumulator {
    values: Vec<f64>,
}

impl SalesAccumulator {
    /// Add one present sales value.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Finalize into display-rounded stats.
    pub fn finish(mut self) -> SalesStats {
        if self.values.is_empty() {
            return SalesStats::default();
        }
        self.values.sort_by(f64::total_cmp);
        let count = self.values.len();
        let sum: f64 = self.values.iter().sum();
        SalesStats {
            count,
            sum: round_to(sum, 2),
            mean: round_to(sum / count as f64, 2),
            median: round_to(percentile(&self.values, 0.5), 2),
        }
    }
}

/// Month-by-year pivot of summed sales for the heatmap chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MonthYearPivot {
    /// Years with at least one record, ascending.
    pub years: Vec<i32>,
    /// `sums[month - 1][year_index]`; `None` where no sales fell.
    pub sums: Vec<Vec<Option<f64>>>,
}

/// All temporal aggregates for one dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TemporalStats {
    /// Sales stats grouped by `(year, month)`, chronological.
    pub monthly: BTreeMap<(i32, u32), SalesStats>,
    /// Sales stats grouped by `(year, quarter)`, chronological.
    pub quarterly: BTreeMap<(i32, u32), SalesStats>,
    /// Sales stats per weekday in canonical Monday..Sunday order;
    /// only observed days appear.
    pub by_weekday: Vec<(String, SalesStats)>,
    /// Chronological monthly sales totals (trend chart input).
    pub monthly_totals: Vec<((i32, u32), f64)>,
    /// Trailing moving average over `monthly_totals`; `None` until the
    /// window fills.
    pub moving_average: Vec<Option<f64>>,
    /// Summed sales pivoted month-by-year.
    pub pivot: MonthYearPivot,
    /// Mean sales per calendar month (1-12) across all years.
    pub month_mean_sales: BTreeMap<u32, f64>,
}

impl TemporalStats {
    /// Calendar month with the highest mean sales (ties: earliest month).
    pub fn best_month(&self) -> Option<u32> {
        extreme_month(&self.month_mean_sales, |candidate, best| candidate > best)
    }

    /// Calendar month with the lowest mean sales (ties: earliest month).
    pub fn worst_month(&self) -> Option<u32> {
        extreme_month(&self.month_mean_sales, |candidate, best| candidate < best)
    }
}

fn extreme_month(
    means: &BTreeMap<u32, f64>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<u32> {
    let mut result: Option<(u32, f64)> = None;
    for (&month, &mean) in means {
        match result {
            Some((_, best)) if !better(mean, best) => {}
            _ => result = Some((month, mean)),
        }
    }
    result.map(|(month, _)| month)
}

/// Compute every temporal aggregate in one ordered pass.
pub fn temporal_stats(dataset: &Dataset) -> TemporalStats {
    let mut monthly: BTreeMap<(i32, u32), SalesAccumulator> = BTreeMap::new();
    let mut quarterly: BTreeMap<(i32, u32), SalesAccumulator> = BTreeMap::new();
    let mut weekdays: BTreeMap<usize, SalesAccumulator> = BTreeMap::new();
    let mut months: BTreeMap<u32, SalesAccumulator> = BTreeMap::new();

    for record in dataset.iter() {
        let Some(sales) = record.sales else { continue };
        monthly
            .entry((record.year, record.month))
            .or_default()
            .push(sales);
        quarterly
            .entry((record.year, record.quarter))
            .or_default()
            .push(sales);
        weekdays
            .entry(record.day_of_week.num_days_from_monday() as usize)
            .or_default()
            .push(sales);
        months.entry(record.month).or_default().push(sales);
    }

    let monthly: BTreeMap<(i32, u32), SalesStats> = monthly
        .into_iter()
        .map(|(key, acc)| (key, acc.finish()))
        .collect();
    let quarterly: BTreeMap<(i32, u32), SalesStats> = quarterly
        .into_iter()
        .map(|(key, acc)| (key, acc.finish()))
        .collect();
    let by_weekday: Vec<(String, SalesStats)> = weekdays
        .into_iter()
        .map(|(index, acc)| (WEEKDAY_ORDER[index].to_string(), acc.finish()))
        .collect();
    let month_mean_sales: BTreeMap<u32, f64> = months
        .into_iter()
        .map(|(month, acc)| (month, acc.finish().mean))
        .collect();

    let monthly_totals: Vec<((i32, u32), f64)> = monthly
        .iter()
        .map(|(key, stats)| (*key, stats.sum))
        .collect();
    let moving_average = moving_average(
        &monthly_totals.iter().map(|(_, sum)| *sum).collect::<Vec<_>>(),
        reports::MOVING_AVERAGE_WINDOW,
    );
    let pivot = month_year_pivot(&monthly);

    TemporalStats {
        monthly,
        quarterly,
        by_weekday,
        monthly_totals,
        moving_average,
        pivot,
        month_mean_sales,
    }
}

/// Trailing moving average; positions before the window fills are `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, _)| {
            if index + 1 < window {
                None
            } else {
                let slice = &values[index + 1 - window..=index];
                Some(round_to(slice.iter().sum::<f64>() / window as f64, 2))
            }
        })
        .collect()
}

fn month_year_pivot(monthly: &BTreeMap<(i32, u32), SalesStats>) -> MonthYearPivot {
    let mut years: Vec<i32> = monthly.keys().map(|(year, _)| *year).collect();
    years.sort_unstable();
    years.dedup();

    let mut sums = vec![vec![None; years.len()]; 12];
    for ((year, month), stats) in monthly {
        let year_index = years
            .iter()
            .position(|candidate| candidate == year)
            .unwrap_or_default();
        sums[(*month - 1) as usize][year_index] = Some(stats.sum);
    }
    MonthYearPivot { years, sums }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_fills_after_window() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let averaged = moving_average(&values, 3);
        assert_eq!(averaged, vec![None, None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn accumulator_finishes_with_rounded_stats() {
        let mut acc = SalesAccumulator::default();
        for value in [10.0, 20.0, 40.0] {
            acc.push(value);
        }
        let stats = acc.finish();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 70.0);
        assert_eq!(stats.mean, 23.33);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn extreme_month_ties_resolve_to_earliest() {
        let mut means = BTreeMap::new();
        means.insert(2u32, 50.0);
        means.insert(5u32, 50.0);
        means.insert(7u32, 10.0);
        let stats = TemporalStats {
            month_mean_sales: means,
            ..TemporalStats::default()
        };
        assert_eq!(stats.best_month(), Some(2));
        assert_eq!(stats.worst_month(), Some(7));
    }
}
