//! Source decoding and delimited-table parsing.
//!
//! The loader reads the source file once as bytes, tries each configured
//! encoding in order, and accepts the first that decodes without
//! malformed sequences. The decoded text is then parsed as a delimited
//! table and checked against the required column set.

use std::collections::HashMap;
use std::fs;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::constants::schema;
use crate::errors::AnalysisError;
use crate::record::{RawRecord, RawTable};

/// Load and parse the source table, or fail definitively.
///
/// Fails with [`AnalysisError::UnreadableSource`] when no candidate
/// encoding decodes the bytes, and [`AnalysisError::Schema`] when a
/// required column is absent. No partial table is ever produced.
pub fn load_raw(config: &LoaderConfig) -> Result<RawTable, AnalysisError> {
    let bytes = fs::read(&config.source_path)?;
    let text = decode(&bytes, config)?;
    let table = parse_table(&text)?;
    info!(
        rows = table.rows.len(),
        columns = table.column_count,
        path = %config.source_path.display(),
        "loaded source table"
    );
    Ok(table)
}

fn decode(bytes: &[u8], config: &LoaderConfig) -> Result<String, AnalysisError> {
    for encoding in &config.encoding_candidates {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            debug!(encoding = encoding.name(), "decode produced malformed sequences");
            continue;
        }
        debug!(encoding = encoding.name(), "decoded source text");
        return Ok(text.into_owned());
    }
    Err(AnalysisError::UnreadableSource {
        path: config.source_path.clone(),
        attempted: config
            .encoding_candidates
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn parse_table(text: &str) -> Result<RawTable, AnalysisError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(position, header)| (header.to_uppercase(), position))
        .collect();

    for column in schema::REQUIRED_COLUMNS {
        if !index.contains_key(column) {
            return Err(AnalysisError::Schema {
                column: column.to_string(),
            });
        }
    }

    let required = |row: &StringRecord, column: &str| -> String {
        row.get(index[column]).unwrap_or_default().to_string()
    };
    let optional = |row: &StringRecord, column: &str| -> Option<String> {
        index
            .get(column)
            .and_then(|position| row.get(*position))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        rows.push(RawRecord {
            order_number: required(&row, "ORDERNUMBER"),
            order_date: required(&row, "ORDERDATE"),
            quantity_ordered: required(&row, "QUANTITYORDERED"),
            price_each: required(&row, "PRICEEACH"),
            sales: required(&row, "SALES"),
            status: required(&row, "STATUS"),
            product_line: required(&row, "PRODUCTLINE"),
            product_code: required(&row, "PRODUCTCODE"),
            customer_name: required(&row, "CUSTOMERNAME"),
            country: required(&row, "COUNTRY"),
            deal_size: required(&row, "DEALSIZE"),
            state: optional(&row, "STATE"),
            city: optional(&row, "CITY"),
            postal_code: optional(&row, "POSTALCODE"),
            territory: optional(&row, "TERRITORY"),
            phone: optional(&row, "PHONE"),
            address_line_2: optional(&row, "ADDRESSLINE2"),
        });
    }

    Ok(RawTable {
        rows,
        column_count: headers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ORDERNUMBER,QUANTITYORDERED,PRICEEACH,ORDERDATE,SALES,STATUS,\
PRODUCTLINE,PRODUCTCODE,CUSTOMERNAME,COUNTRY,DEALSIZE,STATE,CITY";

    #[test]
    fn parse_table_extracts_rows_by_header() {
        let text = format!(
            "{HEADER}\n100,5,10.00,2021-03-05,60,Shipped,Classic Cars,A1,Acme,usa,small,,Reno\n"
        );
        let table = parse_table(&text).expect("parse");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column_count, 13);
        let row = &table.rows[0];
        assert_eq!(row.order_number, "100");
        assert_eq!(row.country, "usa");
        assert_eq!(row.state, None);
        assert_eq!(row.city.as_deref(), Some("Reno"));
        assert_eq!(row.territory, None);
    }

    #[test]
    fn parse_table_rejects_missing_required_column() {
        let text = "ORDERNUMBER,QUANTITYORDERED\n100,5\n";
        let err = parse_table(text).expect_err("schema error");
        match err {
            AnalysisError::Schema { column } => assert_eq!(column, "PRICEEACH"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_falls_back_past_invalid_utf8() {
        // 0xE9 is invalid UTF-8 but decodes to 'é' under windows-1252.
        let bytes = b"caf\xe9".to_vec();
        let config = LoaderConfig::default();
        let text = decode(&bytes, &config).expect("decode");
        assert_eq!(text, "café");
    }

    #[test]
    fn decode_fails_when_all_candidates_error() {
        let bytes = b"caf\xe9".to_vec();
        let config = LoaderConfig {
            encoding_candidates: vec![encoding_rs::UTF_8],
            ..LoaderConfig::default()
        };
        let err = decode(&bytes, &config).expect_err("unreadable");
        assert!(matches!(err, AnalysisError::UnreadableSource { .. }));
    }
}
