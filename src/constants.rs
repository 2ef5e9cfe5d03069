/// Constants describing the expected source table schema.
pub mod schema {
    /// Column headers that must be present for a load to succeed.
    pub const REQUIRED_COLUMNS: [&str; 11] = [
        "ORDERNUMBER",
        "QUANTITYORDERED",
        "PRICEEACH",
        "ORDERDATE",
        "SALES",
        "STATUS",
        "PRODUCTLINE",
        "PRODUCTCODE",
        "CUSTOMERNAME",
        "COUNTRY",
        "DEALSIZE",
    ];
    /// Optional location/contact columns; absent columns or empty cells
    /// become missing values and are filled with sentinels.
    pub const OPTIONAL_COLUMNS: [&str; 6] = [
        "STATE",
        "CITY",
        "POSTALCODE",
        "TERRITORY",
        "PHONE",
        "ADDRESSLINE2",
    ];
    /// Order-date formats attempted in order during cleaning.
    /// The first two cover the upstream export format (`2/24/2003 0:00`).
    pub const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M", "%m/%d/%Y"];
    /// ISO date format; attempted first and used when round-tripping
    /// cleaned records back into raw form.
    pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Sentinel values filled into missing optional fields.
pub mod sentinels {
    /// Fill for missing postal code, state, city, and territory.
    pub const UNKNOWN: &str = "UNKNOWN";
    /// Fill for a missing phone number.
    pub const NO_PHONE: &str = "NO PHONE";
    /// Fill for a missing second address line.
    pub const EMPTY: &str = "";
}

/// Constants used by report and chart artifact writers.
pub mod reports {
    /// File name for the detailed statistics text artifact.
    pub const DETAILED_STATISTICS: &str = "detailed_statistics.txt";
    /// File name for the narrative report text artifact.
    pub const NARRATIVE_REPORT: &str = "sales_analysis_report.txt";
    /// File name for the sales overview chart set.
    pub const CHART_OVERVIEW: &str = "sales_analysis_overview.png";
    /// File name for the customer/geography chart set.
    pub const CHART_CUSTOMERS: &str = "customer_geographic_analysis.png";
    /// File name for the temporal patterns chart set.
    pub const CHART_TEMPORAL: &str = "temporal_patterns.png";
    /// File name for the product analysis chart set.
    pub const CHART_PRODUCTS: &str = "product_analysis.png";
    /// Number of customers listed in the top-customer breakdown.
    pub const TOP_CUSTOMER_LIMIT: usize = 10;
    /// Window length for the monthly-trend moving average.
    pub const MOVING_AVERAGE_WINDOW: usize = 3;
}

/// Canonical week order used for day-of-week aggregates and reports.
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
