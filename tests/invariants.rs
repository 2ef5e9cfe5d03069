use std::collections::HashSet;

use sales_insights::aggregate::{self, FrequencyTable};
use sales_insights::cleaner::{self, CleaningSummary};
use sales_insights::config::{CleanerConfig, DatePolicy};
use sales_insights::record::{Dataset, RawRecord, RawTable};
use sales_insights::AnalysisError;

fn raw_row(order: i64, code: &str, qty: &str, price: &str, sales: &str, date: &str) -> RawRecord {
    RawRecord {
        order_number: order.to_string(),
        order_date: date.to_string(),
        quantity_ordered: qty.to_string(),
        price_each: price.to_string(),
        sales: sales.to_string(),
        status: "Shipped".to_string(),
        product_line: "Classic Cars".to_string(),
        product_code: code.to_string(),
        customer_name: "Acme Corp".to_string(),
        country: " usa ".to_string(),
        deal_size: "small".to_string(),
        ..RawRecord::default()
    }
}

fn table(rows: Vec<RawRecord>) -> RawTable {
    RawTable {
        rows,
        column_count: 17,
    }
}

fn clean_default(rows: Vec<RawRecord>) -> (Dataset, CleaningSummary) {
    cleaner::clean(table(rows), &CleanerConfig::default()).expect("clean")
}

#[test]
fn scenario_row_is_normalized_and_enriched() {
    let (dataset, _) = clean_default(vec![raw_row(100, "A1", "5", "10.00", "60", "2021-03-05")]);
    assert_eq!(dataset.len(), 1);
    let record = &dataset.records()[0];
    assert_eq!(record.country, "USA");
    assert_eq!(record.deal_size, "Small");
    assert_eq!(record.year, 2021);
    assert_eq!(record.month, 3);
    assert_eq!(record.quarter, 1);
    assert_eq!(record.days_to_ship, 0);
    assert_eq!(record.state, "UNKNOWN");
    assert_eq!(record.city, "UNKNOWN");
    assert_eq!(record.territory, "UNKNOWN");
    assert_eq!(record.phone, "NO PHONE");
    assert_eq!(record.address_line_2, "");
    let margin = record.profit_margin.expect("margin");
    assert_eq!(aggregate::round_to(margin, 2), 16.67);
}

#[test]
fn zero_price_rows_are_dropped_from_every_aggregate() {
    let (dataset, summary) = clean_default(vec![
        raw_row(100, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(101, "A2", "5", "0", "60", "2021-03-06"),
    ]);
    assert_eq!(dataset.len(), 1);
    assert_eq!(summary.non_positive_dropped, 1);

    let analysis = aggregate::analyze(&dataset);
    assert_eq!(analysis.numeric["sales"].count, 1);
    assert_eq!(analysis.categorical["country"].total(), 1);
    assert_eq!(analysis.product_lines["CLASSIC CARS"].sales.count, 1);
}

#[test]
fn missing_price_fails_the_positivity_filter() {
    let (dataset, summary) = clean_default(vec![
        raw_row(100, "A1", "5", "not-a-price", "60", "2021-03-05"),
        raw_row(101, "A2", "5", "12.50", "80", "2021-03-06"),
    ]);
    assert_eq!(dataset.len(), 1);
    assert_eq!(summary.non_positive_dropped, 1);
    assert_eq!(dataset.records()[0].order_number, 101);
}

#[test]
fn duplicate_line_items_keep_the_first_occurrence() {
    let (dataset, summary) = clean_default(vec![
        raw_row(200, "B2", "2", "5.00", "100", "2021-01-10"),
        raw_row(200, "B2", "9", "9.00", "999", "2021-01-11"),
        raw_row(200, "B3", "1", "5.00", "10", "2021-01-12"),
    ]);
    assert_eq!(dataset.len(), 2);
    assert_eq!(summary.duplicates_dropped, 1);
    let survivor = dataset
        .iter()
        .find(|r| r.product_code == "B2")
        .expect("survivor");
    assert_eq!(survivor.sales, Some(100.0));
    assert_eq!(survivor.quantity_ordered, 2);
}

#[test]
fn cleaned_dataset_has_unique_keys_and_positive_values() {
    let (dataset, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(1, "A2", "3", "7.00", "30", "2021-03-06"),
        raw_row(2, "A1", "0", "7.00", "30", "2021-03-07"),
        raw_row(3, "A1", "4", "-2.00", "30", "2021-03-08"),
        raw_row(4, "A1", "4", "2.00", "bad-sales", "2021-03-09"),
    ]);
    let mut keys = HashSet::new();
    for record in dataset.iter() {
        assert!(record.quantity_ordered > 0, "quantity must be positive");
        assert!(record.price_each > 0.0, "price must be positive");
        assert!(
            keys.insert((record.order_number, record.product_code.clone())),
            "duplicate key {:?}",
            (record.order_number, &record.product_code)
        );
    }
    assert_eq!(dataset.len(), 3);
}

#[test]
fn cleaning_is_idempotent() {
    let (first, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(2, "A2", "3", "7.25", "bad-sales", "2021-04-01"),
        raw_row(3, "A3", "2", "4.00", "0", "2021-05-20"),
    ]);
    let (second, summary) =
        cleaner::clean(first.to_raw_table(), &CleanerConfig::default()).expect("re-clean");
    assert_eq!(first, second);
    assert_eq!(summary.rows_in, summary.rows_out);
    assert_eq!(summary.duplicates_dropped, 0);
    assert_eq!(summary.non_positive_dropped, 0);
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let (dataset, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(2, "A2", "3", "12.00", "40", "2021-03-06"),
        raw_row(3, "A3", "8", "9.50", "90", "2021-03-07"),
        raw_row(4, "A4", "2", "20.00", "45", "2021-03-08"),
    ]);
    let matrix = aggregate::correlation_matrix(&dataset);
    let size = matrix.fields.len();
    assert_eq!(size, 4);
    for i in 0..size {
        assert_eq!(matrix.get(i, i), Some(1.0), "diagonal at {i}");
        for j in 0..size {
            assert_eq!(matrix.get(i, j), matrix.get(j, i), "cell ({i}, {j})");
            if let Some(r) = matrix.get(i, j) {
                assert!((-1.0..=1.0).contains(&r), "out of range at ({i}, {j})");
            }
        }
    }
}

#[test]
fn product_line_sales_sum_to_the_dataset_total() {
    let mut trains = raw_row(10, "T1", "2", "30.00", "75.5", "2021-06-01");
    trains.product_line = "Trains".to_string();
    let mut ships = raw_row(11, "S1", "1", "99.00", "120.25", "2021-06-02");
    ships.product_line = "Ships".to_string();
    let (dataset, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60.4", "2021-03-05"),
        raw_row(2, "A2", "3", "12.00", "40.1", "2021-03-06"),
        trains,
        ships,
    ]);
    let analysis = aggregate::analyze(&dataset);
    let grouped: f64 = analysis
        .product_lines
        .values()
        .map(|stats| stats.sales.sum)
        .sum();
    // Per-group sums are display-rounded, so allow a small tolerance.
    assert!(
        (grouped - dataset.total_sales()).abs() < 0.05,
        "grouped {grouped} vs total {}",
        dataset.total_sales()
    );
}

#[test]
fn missing_state_rows_count_under_the_sentinel() {
    let mut with_state = raw_row(1, "A1", "5", "10.00", "60", "2021-03-05");
    with_state.state = Some("ca".to_string());
    let (dataset, _) = clean_default(vec![
        with_state,
        raw_row(2, "A2", "3", "12.00", "40", "2021-03-06"),
        raw_row(3, "A3", "1", "8.00", "8", "2021-03-07"),
    ]);
    let states = FrequencyTable::from_values(dataset.iter().map(|r| r.state.clone()));
    assert_eq!(states.count_of("UNKNOWN"), 2);
    assert_eq!(states.count_of("CA"), 1);
    assert_eq!(states.mode(), Some("UNKNOWN"));
}

#[test]
fn fatal_date_policy_aborts_the_load() {
    let rows = vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(2, "A2", "3", "12.00", "40", "garbage"),
    ];
    let err = cleaner::clean(table(rows), &CleanerConfig::default()).expect_err("fatal");
    match err {
        AnalysisError::DateParse { row, value } => {
            assert_eq!(row, 2);
            assert_eq!(value, "garbage");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn drop_date_policy_drops_exactly_the_bad_record() {
    let rows = vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-05"),
        raw_row(2, "A2", "3", "12.00", "40", "garbage"),
    ];
    let config = CleanerConfig {
        date_policy: DatePolicy::Drop,
    };
    let (dataset, summary) = cleaner::clean(table(rows), &config).expect("clean");
    assert_eq!(dataset.len(), 1);
    assert_eq!(summary.dates_dropped, 1);
    assert_eq!(dataset.records()[0].order_number, 1);
}

#[test]
fn top_customers_break_ties_by_name() {
    let mut zeta = raw_row(1, "A1", "1", "10.00", "50", "2021-03-05");
    zeta.customer_name = "Zeta Ltd".to_string();
    let mut alpha = raw_row(2, "A2", "1", "10.00", "50", "2021-03-06");
    alpha.customer_name = "Alpha Inc".to_string();
    let mut big = raw_row(3, "A3", "1", "10.00", "500", "2021-03-07");
    big.customer_name = "Big Spender".to_string();
    let (dataset, _) = clean_default(vec![zeta, alpha, big]);

    let analysis = aggregate::analyze(&dataset);
    let names: Vec<&str> = analysis
        .top_customers
        .iter()
        .map(|customer| customer.name.as_str())
        .collect();
    assert_eq!(names, vec!["Big Spender", "Alpha Inc", "Zeta Ltd"]);
    assert_eq!(analysis.top_customers[0].orders, 1);
}

#[test]
fn weekday_stats_follow_canonical_week_order() {
    // 2021-03-01 is a Monday, 2021-03-07 a Sunday, 2021-03-03 a Wednesday.
    let (dataset, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-07"),
        raw_row(2, "A2", "3", "12.00", "40", "2021-03-01"),
        raw_row(3, "A3", "2", "9.00", "20", "2021-03-03"),
    ]);
    let analysis = aggregate::analyze(&dataset);
    let days: Vec<&str> = analysis
        .temporal
        .by_weekday
        .iter()
        .map(|(day, _)| day.as_str())
        .collect();
    assert_eq!(days, vec!["Monday", "Wednesday", "Sunday"]);
}

#[test]
fn days_to_ship_is_relative_to_the_earliest_order() {
    let (dataset, _) = clean_default(vec![
        raw_row(1, "A1", "5", "10.00", "60", "2021-03-10"),
        raw_row(2, "A2", "3", "12.00", "40", "2021-03-05"),
        raw_row(3, "A3", "2", "9.00", "20", "2021-03-06"),
    ]);
    let by_order: Vec<i64> = dataset.iter().map(|r| r.days_to_ship).collect();
    assert_eq!(by_order, vec![5, 0, 1]);
    assert!(dataset.iter().all(|r| r.days_to_ship >= 0));
}

#[test]
fn zero_sales_yields_a_missing_margin_not_nan() {
    let (dataset, summary) = clean_default(vec![raw_row(1, "A1", "5", "10.00", "0", "2021-03-05")]);
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records()[0].profit_margin, None);
    assert_eq!(summary.missing_by_column["PROFIT_MARGIN"], 1);
}
