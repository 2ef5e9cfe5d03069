//! Pairwise Pearson correlations between numeric columns.

use serde::Serialize;

use crate::record::Dataset;

use super::numeric::round_to;
use super::NumericField;

/// Numeric fields entering the correlation matrix.
pub const CORRELATION_FIELDS: [NumericField; 4] = [
    NumericField::QuantityOrdered,
    NumericField::PriceEach,
    NumericField::Sales,
    NumericField::ProfitMargin,
];

/// Symmetric Pearson correlation matrix, 3-decimal display rounding.
///
/// Undefined correlations (constant columns, fewer than two pairwise
/// observations) are missing markers, never NaN.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Field names, in matrix order.
    pub fields: Vec<String>,
    /// `cells[i][j]` is the correlation between fields `i` and `j`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation cell by field position.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|cells| cells.get(column)).copied().flatten()
    }
}

/// Compute the matrix over pairwise-complete observations.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = CORRELATION_FIELDS
        .iter()
        .map(|field| dataset.iter().map(|record| field.value(record)).collect())
        .collect();

    let size = CORRELATION_FIELDS.len();
    let mut cells = vec![vec![None; size]; size];
    for i in 0..size {
        for j in i..size {
            let cell = if i == j {
                // Unit diagonal whenever the column has any data at all.
                columns[i].iter().any(Option::is_some).then_some(1.0)
            } else {
                pearson(&columns[i], &columns[j]).map(|r| round_to(r, 3))
            };
            cells[i][j] = cell;
            cells[j][i] = cell;
        }
    }

    CorrelationMatrix {
        fields: CORRELATION_FIELDS
            .iter()
            .map(|field| field.name().to_string())
            .collect(),
        cells,
    }
}

/// Pearson coefficient over rows where both values are present.
/// `None` when fewer than two such rows exist or a column is constant.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }
    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some(covariance / (variance_x.sqrt() * variance_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_detects_perfect_linear_relation() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0)];
        let ys: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(6.0)];
        let r = pearson(&xs, &ys).expect("correlation");
        assert!((r - 1.0).abs() < 1e-9);

        let inverted: Vec<Option<f64>> = vec![Some(6.0), Some(4.0), Some(2.0)];
        let r = pearson(&xs, &inverted).expect("correlation");
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_constant_column_is_missing() {
        let xs: Vec<Option<f64>> = vec![Some(5.0), Some(5.0), Some(5.0)];
        let ys: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&xs, &ys), None);
    }

    #[test]
    fn pearson_skips_rows_with_missing_values() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let ys: Vec<Option<f64>> = vec![Some(2.0), Some(9.0), Some(4.0), Some(6.0)];
        let r = pearson(&xs, &ys).expect("correlation");
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_needs_two_complete_pairs() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), None];
        let ys: Vec<Option<f64>> = vec![Some(2.0), Some(3.0)];
        assert_eq!(pearson(&xs, &ys), None);
    }
}
