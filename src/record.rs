use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::constants::schema;
use crate::types::{CountryName, CustomerName, OrderNumber, ProductCode};

/// One source row exactly as read: required fields as raw text, optional
/// fields as `None` when the column is absent or the cell is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    /// Raw order number text.
    pub order_number: String,
    /// Raw order date text.
    pub order_date: String,
    /// Raw ordered-quantity text.
    pub quantity_ordered: String,
    /// Raw unit price text.
    pub price_each: String,
    /// Raw gross line revenue text.
    pub sales: String,
    /// Raw order lifecycle label.
    pub status: String,
    /// Raw product line label.
    pub product_line: String,
    /// Raw product code.
    pub product_code: String,
    /// Raw customer name.
    pub customer_name: String,
    /// Raw country name.
    pub country: String,
    /// Raw deal-size tier label.
    pub deal_size: String,
    /// Raw state/province, when present.
    pub state: Option<String>,
    /// Raw city, when present.
    pub city: Option<String>,
    /// Raw postal code, when present.
    pub postal_code: Option<String>,
    /// Raw sales territory, when present.
    pub territory: Option<String>,
    /// Raw phone number, when present.
    pub phone: Option<String>,
    /// Raw second address line, when present.
    pub address_line_2: Option<String>,
}

/// Parsed but uncleaned table: ordered rows plus the source column count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    /// Rows in original file order.
    pub rows: Vec<RawRecord>,
    /// Number of columns in the source header.
    pub column_count: usize,
}

/// One cleaned sales-order line item.
///
/// `sales` and `profit_margin` carry the missing-value marker (`None`)
/// when coercion failed or the margin is undefined; every other field is
/// guaranteed valid by the cleaning invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Order identifier (not unique alone; see `product_code`).
    pub order_number: OrderNumber,
    /// Calendar date of the order.
    pub order_date: NaiveDate,
    /// Calendar year derived from `order_date`.
    pub year: i32,
    /// Calendar month (1-12) derived from `order_date`.
    pub month: u32,
    /// Calendar quarter (1-4) derived from `order_date`.
    pub quarter: u32,
    /// Day of week derived from `order_date`.
    pub day_of_week: Weekday,
    /// Ordered quantity; positive after cleaning.
    pub quantity_ordered: i64,
    /// Unit price; positive after cleaning.
    pub price_each: f64,
    /// Gross line revenue; `None` when coercion failed.
    pub sales: Option<f64>,
    /// `(sales - quantity * price) / sales * 100`; `None` when sales is
    /// missing or zero.
    pub profit_margin: Option<f64>,
    /// Whole days since the earliest order date in the dataset.
    pub days_to_ship: i64,
    /// Order lifecycle label, upper-cased and trimmed.
    pub status: String,
    /// Product line, upper-cased and trimmed.
    pub product_line: String,
    /// Product code; `(order_number, product_code)` is unique.
    pub product_code: ProductCode,
    /// Customer name as it appears in the source.
    pub customer_name: CustomerName,
    /// Country, upper-cased and trimmed.
    pub country: CountryName,
    /// State/province, upper-cased; `UNKNOWN` when missing.
    pub state: String,
    /// City, upper-cased; `UNKNOWN` when missing.
    pub city: String,
    /// Postal code; `UNKNOWN` when missing.
    pub postal_code: String,
    /// Sales territory; `UNKNOWN` when missing.
    pub territory: String,
    /// Phone number; `NO PHONE` when missing.
    pub phone: String,
    /// Second address line; empty when missing.
    pub address_line_2: String,
    /// Deal-size tier, capitalized (`Small` / `Medium` / `Large`).
    pub deal_size: String,
}

/// Ordered, immutable collection of cleaned records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap cleaned records; order is preserved as given.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// All records in original order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate records in original order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest order dates, when any records exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.order_date).min()?;
        let last = self.records.iter().map(|r| r.order_date).max()?;
        Some((first, last))
    }

    /// Number of distinct customer names.
    pub fn distinct_customers(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of distinct product codes.
    pub fn distinct_products(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.product_code.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Total of all present sales values.
    pub fn total_sales(&self) -> f64 {
        self.records.iter().filter_map(|r| r.sales).sum()
    }

    /// Round-trip the cleaned records back into raw form.
    ///
    /// Used to check that cleaning is idempotent: cleaning the result of
    /// `to_raw_table` reproduces this dataset exactly.
    pub fn to_raw_table(&self) -> RawTable {
        let rows = self.records.iter().map(RawRecord::from).collect();
        RawTable {
            rows,
            column_count: schema::REQUIRED_COLUMNS.len() + schema::OPTIONAL_COLUMNS.len(),
        }
    }
}

impl From<&Record> for RawRecord {
    fn from(record: &Record) -> Self {
        RawRecord {
            order_number: record.order_number.to_string(),
            order_date: record
                .order_date
                .format(schema::ISO_DATE_FORMAT)
                .to_string(),
            quantity_ordered: record.quantity_ordered.to_string(),
            price_each: record.price_each.to_string(),
            sales: record.sales.map(|v| v.to_string()).unwrap_or_default(),
            status: record.status.clone(),
            product_line: record.product_line.clone(),
            product_code: record.product_code.clone(),
            customer_name: record.customer_name.clone(),
            country: record.country.clone(),
            deal_size: record.deal_size.clone(),
            state: Some(record.state.clone()),
            city: Some(record.city.clone()),
            postal_code: Some(record.postal_code.clone()),
            territory: Some(record.territory.clone()),
            phone: Some(record.phone.clone()),
            address_line_2: Some(record.address_line_2.clone()),
        }
    }
}

/// Derive the calendar quarter (1-4) for a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_of_covers_year_boundaries() {
        let cases = [(1, 1), (3, 1), (4, 2), (6, 2), (7, 3), (9, 3), (10, 4), (12, 4)];
        for (month, quarter) in cases {
            let date = NaiveDate::from_ymd_opt(2021, month, 1).expect("valid date");
            assert_eq!(quarter_of(date), quarter, "month {month}");
        }
    }

    #[test]
    fn date_range_spans_min_and_max() {
        let mut a = sample_record();
        a.order_date = NaiveDate::from_ymd_opt(2021, 3, 5).expect("date");
        let mut b = sample_record();
        b.order_date = NaiveDate::from_ymd_opt(2020, 12, 31).expect("date");
        let dataset = Dataset::new(vec![a, b]);
        let (first, last) = dataset.date_range().expect("range");
        assert_eq!(first, NaiveDate::from_ymd_opt(2020, 12, 31).expect("date"));
        assert_eq!(last, NaiveDate::from_ymd_opt(2021, 3, 5).expect("date"));
    }

    fn sample_record() -> Record {
        let order_date = NaiveDate::from_ymd_opt(2021, 3, 5).expect("date");
        Record {
            order_number: 100,
            order_date,
            year: 2021,
            month: 3,
            quarter: 1,
            day_of_week: chrono::Weekday::Fri,
            quantity_ordered: 5,
            price_each: 10.0,
            sales: Some(60.0),
            profit_margin: Some(((60.0 - 50.0) / 60.0) * 100.0),
            days_to_ship: 0,
            status: "SHIPPED".into(),
            product_line: "CLASSIC CARS".into(),
            product_code: "A1".into(),
            customer_name: "Acme".into(),
            country: "USA".into(),
            state: "UNKNOWN".into(),
            city: "UNKNOWN".into(),
            postal_code: "UNKNOWN".into(),
            territory: "UNKNOWN".into(),
            phone: "NO PHONE".into(),
            address_line_2: String::new(),
            deal_size: "Small".into(),
        }
    }
}
