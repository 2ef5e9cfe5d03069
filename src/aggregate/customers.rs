//! Customer and geography breakdowns.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::Dataset;
use crate::types::{CountryName, CustomerName};

use super::numeric::round_to;

/// One customer's totals in the top-customer ranking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerStats {
    /// Customer display name.
    pub name: CustomerName,
    /// Summed sales across the customer's line items.
    pub total_sales: f64,
    /// Number of line items for the customer.
    pub orders: usize,
}

/// Per-country sales and customer-coverage metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CountryStats {
    /// Summed sales for the country.
    pub sales_sum: f64,
    /// Mean sales for the country.
    pub sales_mean: f64,
    /// Present sales values for the country.
    pub count: usize,
    /// Distinct customer names seen in the country.
    pub distinct_customers: usize,
}

/// Top customers by total sales descending; ties break by name ascending
/// so the ranking is deterministic.
pub fn top_customers(dataset: &Dataset, limit: usize) -> Vec<CustomerStats> {
    let mut ranked = customer_totals(dataset);
    ranked.sort_by(|a, b| {
        b.total_sales
            .partial_cmp(&a.total_sales)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

/// The customer with the most line items (ties: first seen).
pub fn most_active_customer(dataset: &Dataset) -> Option<CustomerStats> {
    customer_totals(dataset)
        .into_iter()
        .fold(None, |best: Option<CustomerStats>, candidate| match best {
            Some(current) if candidate.orders <= current.orders => Some(current),
            _ => Some(candidate),
        })
}

fn customer_totals(dataset: &Dataset) -> Vec<CustomerStats> {
    let mut totals: IndexMap<CustomerName, (f64, usize)> = IndexMap::new();
    for record in dataset.iter() {
        let entry = totals.entry(record.customer_name.clone()).or_default();
        entry.0 += record.sales.unwrap_or_default();
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(name, (sales, orders))| CustomerStats {
            name,
            total_sales: round_to(sales, 2),
            orders,
        })
        .collect()
}

/// Group sales and customer coverage by country in first-seen order.
pub fn country_stats(dataset: &Dataset) -> IndexMap<CountryName, CountryStats> {
    let mut sums: IndexMap<CountryName, (f64, usize, HashSet<CustomerName>)> = IndexMap::new();
    for record in dataset.iter() {
        let entry = sums.entry(record.country.clone()).or_default();
        if let Some(sales) = record.sales {
            entry.0 += sales;
            entry.1 += 1;
        }
        entry.2.insert(record.customer_name.clone());
    }
    sums.into_iter()
        .map(|(country, (sum, count, customers))| {
            let mean = if count > 0 { sum / count as f64 } else { 0.0 };
            (
                country,
                CountryStats {
                    sales_sum: round_to(sum, 2),
                    sales_mean: round_to(mean, 2),
                    count,
                    distinct_customers: customers.len(),
                },
            )
        })
        .collect()
}
