//! Row-level cleaning and enrichment.
//!
//! Cleaning is a deterministic, ordered sequence of passes: date parsing,
//! calendar derivation, sentinel fills, text normalization, key-based
//! deduplication, decimal coercion, positivity filtering, and derived
//! column computation. Later steps depend on earlier normalization, so
//! the order is part of the contract.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::{CleanerConfig, DatePolicy};
use crate::constants::{schema, sentinels};
use crate::errors::AnalysisError;
use crate::record::{quarter_of, Dataset, RawRecord, RawTable, Record};
use crate::types::{ColumnName, OrderNumber, ProductCode};

/// Data-quality counters emitted alongside the cleaned dataset.
///
/// Observability only; none of these affect the functional contract.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CleaningSummary {
    /// Rows received from the loader.
    pub rows_in: usize,
    /// Records surviving every cleaning pass.
    pub rows_out: usize,
    /// Rows dropped for unparseable dates (only under [`DatePolicy::Drop`]).
    pub dates_dropped: usize,
    /// Rows dropped because the order number could not be parsed.
    pub invalid_identity_dropped: usize,
    /// Later duplicates of an already-seen `(order_number, product_code)`.
    pub duplicates_dropped: usize,
    /// Rows dropped by the quantity/price positivity filter.
    pub non_positive_dropped: usize,
    /// Missing-marker counts per column after cleaning.
    pub missing_by_column: IndexMap<ColumnName, usize>,
    /// Earliest order date among kept records.
    pub first_order_date: Option<NaiveDate>,
    /// Latest order date among kept records.
    pub last_order_date: Option<NaiveDate>,
    /// Distinct customer names among kept records.
    pub distinct_customers: usize,
    /// Distinct product codes among kept records.
    pub distinct_products: usize,
}

/// A row that has passed date parsing and per-field normalization but
/// not yet deduplication or filtering.
struct Staged {
    order_number: OrderNumber,
    order_date: NaiveDate,
    quantity_ordered: i64,
    price_each: Option<f64>,
    sales: Option<f64>,
    status: String,
    product_line: String,
    product_code: ProductCode,
    customer_name: String,
    country: String,
    state: String,
    city: String,
    postal_code: String,
    territory: String,
    phone: String,
    address_line_2: String,
    deal_size: String,
}

/// Transform a raw table into a cleaned dataset plus quality counters.
///
/// Fails only on unparseable order dates under [`DatePolicy::Fatal`];
/// every other irregularity is resolved by a fill, a missing marker, or
/// a counted drop. Cleaning its own output is a no-op.
pub fn clean(
    table: RawTable,
    config: &CleanerConfig,
) -> Result<(Dataset, CleaningSummary), AnalysisError> {
    let mut summary = CleaningSummary {
        rows_in: table.rows.len(),
        ..CleaningSummary::default()
    };

    // Per-row parsing, fills, normalization, and decimal coercion.
    let mut staged: Vec<Staged> = Vec::with_capacity(table.rows.len());
    for (offset, raw) in table.rows.into_iter().enumerate() {
        let row = offset + 1;
        let order_date = match parse_order_date(&raw.order_date) {
            Some(date) => date,
            None => match config.date_policy {
                DatePolicy::Fatal => {
                    return Err(AnalysisError::DateParse {
                        row,
                        value: raw.order_date,
                    })
                }
                DatePolicy::Drop => {
                    warn!(row, value = %raw.order_date, "dropping row with unparseable date");
                    summary.dates_dropped += 1;
                    continue;
                }
            },
        };
        let Ok(order_number) = raw.order_number.trim().parse::<OrderNumber>() else {
            warn!(row, value = %raw.order_number, "dropping row with unparseable order number");
            summary.invalid_identity_dropped += 1;
            continue;
        };
        staged.push(stage_row(raw, order_number, order_date));
    }

    // Deduplicate by (order_number, product_code), first wins.
    let mut seen: HashSet<(OrderNumber, ProductCode)> = HashSet::new();
    let mut deduped: Vec<Staged> = Vec::with_capacity(staged.len());
    for row in staged {
        if seen.insert((row.order_number, row.product_code.clone())) {
            deduped.push(row);
        } else {
            summary.duplicates_dropped += 1;
        }
    }

    // Positivity filter. A missing price fails the comparison.
    let mut kept: Vec<Staged> = Vec::with_capacity(deduped.len());
    for row in deduped {
        let price_ok = row.price_each.is_some_and(|price| price > 0.0);
        if row.quantity_ordered > 0 && price_ok {
            kept.push(row);
        } else {
            summary.non_positive_dropped += 1;
        }
    }

    // Calendar and derived columns over the kept rows.
    let min_date = kept.iter().map(|row| row.order_date).min();
    let records: Vec<Record> = kept
        .into_iter()
        .map(|row| finalize_record(row, min_date))
        .collect();

    let dataset = Dataset::new(records);
    summary.rows_out = dataset.len();
    summary.missing_by_column = missing_counts(&dataset);
    if let Some((first, last)) = dataset.date_range() {
        summary.first_order_date = Some(first);
        summary.last_order_date = Some(last);
    }
    summary.distinct_customers = dataset.distinct_customers();
    summary.distinct_products = dataset.distinct_products();

    info!(
        rows_in = summary.rows_in,
        rows_out = summary.rows_out,
        duplicates = summary.duplicates_dropped,
        non_positive = summary.non_positive_dropped,
        customers = summary.distinct_customers,
        products = summary.distinct_products,
        "cleaned dataset"
    );
    for (column, missing) in &summary.missing_by_column {
        if *missing > 0 {
            info!(column = %column, missing, "missing values after cleaning");
        }
    }

    Ok((dataset, summary))
}

fn stage_row(raw: RawRecord, order_number: OrderNumber, order_date: NaiveDate) -> Staged {
    Staged {
        order_number,
        order_date,
        // An unparseable quantity behaves like a non-positive one and is
        // removed by the positivity filter.
        quantity_ordered: raw.quantity_ordered.trim().parse().unwrap_or(0),
        price_each: parse_decimal(&raw.price_each),
        sales: parse_decimal(&raw.sales),
        status: normalize_text(&raw.status),
        product_line: normalize_text(&raw.product_line),
        product_code: raw.product_code,
        customer_name: raw.customer_name,
        country: normalize_text(&raw.country),
        state: normalize_text(&raw.state.unwrap_or_else(|| sentinels::UNKNOWN.into())),
        city: normalize_text(&raw.city.unwrap_or_else(|| sentinels::UNKNOWN.into())),
        postal_code: raw.postal_code.unwrap_or_else(|| sentinels::UNKNOWN.into()),
        territory: raw.territory.unwrap_or_else(|| sentinels::UNKNOWN.into()),
        phone: raw.phone.unwrap_or_else(|| sentinels::NO_PHONE.into()),
        address_line_2: raw.address_line_2.unwrap_or_else(|| sentinels::EMPTY.into()),
        deal_size: capitalize(&raw.deal_size),
    }
}

fn finalize_record(row: Staged, min_date: Option<NaiveDate>) -> Record {
    // The positivity filter guarantees a present, positive price here.
    let price_each = row.price_each.unwrap_or_default();
    let profit_margin = row.sales.and_then(|sales| {
        if sales == 0.0 {
            // Division by zero must surface as a missing marker, not NaN.
            None
        } else {
            Some(((sales - row.quantity_ordered as f64 * price_each) / sales) * 100.0)
        }
    });
    let days_to_ship = min_date
        .map(|min| (row.order_date - min).num_days())
        .unwrap_or(0);
    Record {
        order_number: row.order_number,
        order_date: row.order_date,
        year: row.order_date.year(),
        month: row.order_date.month(),
        quarter: quarter_of(row.order_date),
        day_of_week: row.order_date.weekday(),
        quantity_ordered: row.quantity_ordered,
        price_each,
        sales: row.sales,
        profit_margin,
        days_to_ship,
        status: row.status,
        product_line: row.product_line,
        product_code: row.product_code,
        customer_name: row.customer_name,
        country: row.country,
        state: row.state,
        city: row.city,
        postal_code: row.postal_code,
        territory: row.territory,
        phone: row.phone,
        address_line_2: row.address_line_2,
        deal_size: row.deal_size,
    }
}

fn missing_counts(dataset: &Dataset) -> IndexMap<ColumnName, usize> {
    let mut counts = IndexMap::new();
    counts.insert(
        "SALES".to_string(),
        dataset.iter().filter(|r| r.sales.is_none()).count(),
    );
    counts.insert(
        "PROFIT_MARGIN".to_string(),
        dataset.iter().filter(|r| r.profit_margin.is_none()).count(),
    );
    counts
}

/// Parse an order date, trying the ISO form first and then the source
/// export formats.
fn parse_order_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, schema::ISO_DATE_FORMAT) {
        return Some(date);
    }
    for format in schema::DATE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Coerce text to a finite decimal; anything else is a missing marker.
fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn normalize_text(text: &str) -> String {
    text.trim().to_uppercase()
}

/// First letter upper, rest lower, per the deal-size tier labels.
fn capitalize(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_order_date_accepts_export_and_iso_forms() {
        let expected = NaiveDate::from_ymd_opt(2003, 2, 24).expect("date");
        assert_eq!(parse_order_date("2/24/2003 0:00"), Some(expected));
        assert_eq!(parse_order_date("2/24/2003"), Some(expected));
        assert_eq!(parse_order_date("2003-02-24"), Some(expected));
        assert_eq!(parse_order_date("not a date"), None);
        assert_eq!(parse_order_date(""), None);
    }

    #[test]
    fn parse_decimal_rejects_non_finite_text() {
        assert_eq!(parse_decimal(" 10.50 "), Some(10.5));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn capitalize_normalizes_tier_labels() {
        assert_eq!(capitalize("small"), "Small");
        assert_eq!(capitalize("MEDIUM"), "Medium");
        assert_eq!(capitalize(" large "), "Large");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn normalize_text_trims_and_uppercases() {
        assert_eq!(normalize_text(" usa "), "USA");
        assert_eq!(normalize_text("Classic Cars"), "CLASSIC CARS");
    }
}
