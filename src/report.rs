//! Text report writers.
//!
//! Both artifacts are plain renderings of the aggregate bundle; nothing
//! here recomputes statistics beyond ordering rows for display.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::aggregate::AnalysisResult;
use crate::errors::AnalysisError;
use crate::record::Dataset;

/// Write the detailed statistics artifact: numeric summary table,
/// categorical breakdowns, and the correlation matrix.
pub fn write_detailed_statistics(
    path: &Path,
    analysis: &AnalysisResult,
) -> Result<(), AnalysisError> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "Numeric Statistics:")?;
    writeln!(out, "------------------")?;
    writeln!(
        out,
        "{:<18}{:>10}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}",
        "column", "count", "mean", "median", "std", "min", "max", "q25", "q75"
    )?;
    for (name, stats) in &analysis.numeric {
        writeln!(
            out,
            "{:<18}{:>10}{:>12.2}{:>12.2}{:>12}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
            name,
            stats.count,
            stats.mean,
            stats.median,
            display_opt(stats.std_dev, 2),
            stats.min,
            stats.max,
            stats.q25,
            stats.q75,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Categorical Statistics:")?;
    writeln!(out, "----------------------")?;
    for (name, table) in &analysis.categorical {
        writeln!(out)?;
        writeln!(out, "{name}:")?;
        writeln!(out, "Mode: {}", table.mode().unwrap_or("-"))?;
        writeln!(out, "Unique values: {}", table.distinct())?;
        writeln!(out, "Value counts:")?;
        for (value, count) in table.sorted_counts() {
            writeln!(out, "  {value:<24}{count:>8}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Correlation Matrix:")?;
    writeln!(out, "------------------")?;
    let matrix = &analysis.correlations;
    write!(out, "{:<18}", "")?;
    for field in &matrix.fields {
        write!(out, "{field:>18}")?;
    }
    writeln!(out)?;
    for (row, field) in matrix.fields.iter().enumerate() {
        write!(out, "{field:<18}")?;
        for column in 0..matrix.fields.len() {
            write!(out, "{:>18}", display_opt(matrix.get(row, column), 3))?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// Write the narrative report artifact: totals, product lines by sales
/// descending, and best/worst calendar month by mean sales.
pub fn write_narrative_report(
    path: &Path,
    dataset: &Dataset,
    analysis: &AnalysisResult,
) -> Result<(), AnalysisError> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "Sales Data Analysis Report")?;
    writeln!(out, "=========================")?;
    writeln!(out)?;

    writeln!(out, "1. Overall Statistics")?;
    writeln!(out, "-----------------")?;
    writeln!(out, "Total Orders: {}", dataset.len())?;
    writeln!(out, "Total Sales: ${:.2}", dataset.total_sales())?;
    let insights = analysis.key_insights();
    match insights.average_order_value {
        Some(mean) => writeln!(out, "Average Order Value: ${mean:.2}")?,
        None => writeln!(out, "Average Order Value: -")?,
    }
    writeln!(out)?;

    writeln!(out, "2. Product Performance")?;
    writeln!(out, "--------------------")?;
    writeln!(out, "Top Performing Product Lines:")?;
    let mut lines: Vec<(&String, f64)> = analysis
        .product_lines
        .iter()
        .map(|(line, stats)| (line, stats.sales.sum))
        .collect();
    lines.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (line, total) in lines {
        writeln!(out, "{line}: ${total:.2}")?;
    }
    writeln!(out)?;

    writeln!(out, "3. Seasonal Patterns")?;
    writeln!(out, "------------------")?;
    match analysis.temporal.best_month() {
        Some(month) => writeln!(out, "Best performing month: {month}")?,
        None => writeln!(out, "Best performing month: -")?,
    }
    match analysis.temporal.worst_month() {
        Some(month) => writeln!(out, "Worst performing month: {month}")?,
        None => writeln!(out, "Worst performing month: -")?,
    }

    out.flush()?;
    Ok(())
}

fn display_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_opt_formats_missing_as_dash() {
        assert_eq!(display_opt(Some(1.2345), 2), "1.23");
        assert_eq!(display_opt(Some(0.1234), 3), "0.123");
        assert_eq!(display_opt(None, 2), "-");
    }
}
