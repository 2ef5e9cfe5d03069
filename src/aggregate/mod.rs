//! Pure aggregation from a cleaned [`Dataset`] to an [`AnalysisResult`].
//!
//! Every aggregate is independent of the others and never mutates the
//! dataset. Display values are rounded half-away-from-zero: two decimal
//! places everywhere, three for the correlation matrix.

/// Frequency tables for categorical columns.
pub mod categorical;
/// Pairwise Pearson correlations.
pub mod correlation;
/// Customer and geography breakdowns.
pub mod customers;
/// Descriptive statistics for numeric columns.
pub mod numeric;
/// Product-line and deal-size performance.
pub mod performance;
/// Time-bucketed aggregates.
pub mod temporal;

use indexmap::IndexMap;
use serde::Serialize;

use crate::constants::reports;
use crate::record::{Dataset, Record};

pub use categorical::FrequencyTable;
pub use correlation::{correlation_matrix, CorrelationMatrix, CORRELATION_FIELDS};
pub use customers::{country_stats, most_active_customer, top_customers, CountryStats, CustomerStats};
pub use numeric::{percentile, round_to, summarize, NumericSummary};
pub use performance::{deal_size_stats, product_line_stats, DealSizeStats, ProductLineStats};
pub use temporal::{moving_average, temporal_stats, MonthYearPivot, SalesStats, TemporalStats};

/// Numeric columns addressed as a fixed enumerated table so coverage is
/// checked at compile time instead of by runtime name lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NumericField {
    /// Ordered quantity.
    QuantityOrdered,
    /// Unit price.
    PriceEach,
    /// Gross line revenue.
    Sales,
    /// Derived profit margin percentage.
    ProfitMargin,
    /// Derived days since the earliest order.
    DaysToShip,
}

impl NumericField {
    /// Every numeric column, in report order.
    pub const ALL: [NumericField; 5] = [
        NumericField::QuantityOrdered,
        NumericField::PriceEach,
        NumericField::Sales,
        NumericField::ProfitMargin,
        NumericField::DaysToShip,
    ];

    /// Report label for the column.
    pub fn name(self) -> &'static str {
        match self {
            NumericField::QuantityOrdered => "quantity_ordered",
            NumericField::PriceEach => "price_each",
            NumericField::Sales => "sales",
            NumericField::ProfitMargin => "profit_margin",
            NumericField::DaysToShip => "days_to_ship",
        }
    }

    /// Extract the column value; `None` is the missing marker.
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            NumericField::QuantityOrdered => Some(record.quantity_ordered as f64),
            NumericField::PriceEach => Some(record.price_each),
            NumericField::Sales => record.sales,
            NumericField::ProfitMargin => record.profit_margin,
            NumericField::DaysToShip => Some(record.days_to_ship as f64),
        }
    }
}

/// Categorical columns, enumerated like [`NumericField`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CategoricalField {
    /// Product line label.
    ProductLine,
    /// Order lifecycle label.
    Status,
    /// Country name.
    Country,
    /// Deal-size tier.
    DealSize,
    /// Calendar year.
    Year,
    /// Calendar quarter.
    Quarter,
}

impl CategoricalField {
    /// Every categorical column, in report order.
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::ProductLine,
        CategoricalField::Status,
        CategoricalField::Country,
        CategoricalField::DealSize,
        CategoricalField::Year,
        CategoricalField::Quarter,
    ];

    /// Report label for the column.
    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::ProductLine => "product_line",
            CategoricalField::Status => "status",
            CategoricalField::Country => "country",
            CategoricalField::DealSize => "deal_size",
            CategoricalField::Year => "year",
            CategoricalField::Quarter => "quarter",
        }
    }

    /// Extract the column value as display text.
    pub fn value(self, record: &Record) -> String {
        match self {
            CategoricalField::ProductLine => record.product_line.clone(),
            CategoricalField::Status => record.status.clone(),
            CategoricalField::Country => record.country.clone(),
            CategoricalField::DealSize => record.deal_size.clone(),
            CategoricalField::Year => record.year.to_string(),
            CategoricalField::Quarter => record.quarter.to_string(),
        }
    }
}

/// Full aggregate bundle consumed by the report and chart writers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Numeric summaries keyed by column label; empty columns are omitted.
    pub numeric: IndexMap<String, NumericSummary>,
    /// Frequency tables keyed by column label.
    pub categorical: IndexMap<String, FrequencyTable>,
    /// Time-bucketed aggregates.
    pub temporal: TemporalStats,
    /// Per-product-line performance, first-seen order.
    pub product_lines: IndexMap<String, ProductLineStats>,
    /// Per-deal-size performance, first-seen order.
    pub deal_sizes: IndexMap<String, DealSizeStats>,
    /// Top customers by total sales descending.
    pub top_customers: Vec<CustomerStats>,
    /// Customer with the most line items.
    pub most_active_customer: Option<CustomerStats>,
    /// Per-country sales and coverage, first-seen order.
    pub countries: IndexMap<String, CountryStats>,
    /// Pearson correlation matrix over the key numeric columns.
    pub correlations: CorrelationMatrix,
}

/// Headline numbers surfaced in logs and the narrative report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KeyInsights {
    /// Mean order value.
    pub average_order_value: Option<f64>,
    /// Median order value.
    pub median_order_value: Option<f64>,
    /// Sample standard deviation of order value.
    pub order_value_std_dev: Option<f64>,
    /// Most common product line.
    pub top_product_line: Option<String>,
    /// Mean profit margin percentage.
    pub average_profit_margin: Option<f64>,
    /// Customer with the most line items.
    pub most_active_customer: Option<String>,
}

impl AnalysisResult {
    /// Collect the headline numbers from the aggregate bundle.
    pub fn key_insights(&self) -> KeyInsights {
        let sales = self.numeric.get(NumericField::Sales.name());
        KeyInsights {
            average_order_value: sales.map(|s| s.mean),
            median_order_value: sales.map(|s| s.median),
            order_value_std_dev: sales.and_then(|s| s.std_dev),
            top_product_line: self
                .categorical
                .get(CategoricalField::ProductLine.name())
                .and_then(|table| table.mode())
                .map(str::to_string),
            average_profit_margin: self
                .numeric
                .get(NumericField::ProfitMargin.name())
                .map(|s| s.mean),
            most_active_customer: self
                .most_active_customer
                .as_ref()
                .map(|customer| customer.name.clone()),
        }
    }
}

/// Compute every aggregate for a cleaned dataset.
///
/// Pure: the dataset is read-only and a valid cleaned dataset cannot
/// make aggregation fail (guarded divisions produce missing markers).
pub fn analyze(dataset: &Dataset) -> AnalysisResult {
    let numeric: IndexMap<String, NumericSummary> = NumericField::ALL
        .iter()
        .filter_map(|field| {
            let values: Vec<f64> = dataset.iter().filter_map(|r| field.value(r)).collect();
            summarize(&values).map(|summary| (field.name().to_string(), summary.rounded(2)))
        })
        .collect();

    let categorical: IndexMap<String, FrequencyTable> = CategoricalField::ALL
        .iter()
        .map(|field| {
            let table = FrequencyTable::from_values(dataset.iter().map(|r| field.value(r)));
            (field.name().to_string(), table)
        })
        .collect();

    AnalysisResult {
        numeric,
        categorical,
        temporal: temporal_stats(dataset),
        product_lines: product_line_stats(dataset),
        deal_sizes: deal_size_stats(dataset),
        top_customers: top_customers(dataset, reports::TOP_CUSTOMER_LIMIT),
        most_active_customer: most_active_customer(dataset),
        countries: country_stats(dataset),
        correlations: correlation_matrix(dataset),
    }
}
