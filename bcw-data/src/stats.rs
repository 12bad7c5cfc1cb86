//! Pairwise statistics over columns with missing values.
//!
//! Every function works on pairwise-complete data: a row contributes to a
//! pair only when both of its values are present.

use serde::Serialize;

/// Pearson correlation of two equally long columns.
///
/// NaN when fewer than two complete pairs remain or either side has zero
/// variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric matrix of Pearson coefficients between named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    /// `coefficients[i][j]` correlates `variables[i]` with `variables[j]`.
    pub coefficients: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of columns. The diagonal is exactly 1.0 for any
    /// column with variance and NaN otherwise.
    pub fn from_columns(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
        let size = columns.len();
        let mut coefficients = vec![vec![f64::NAN; size]; size];
        for i in 0..size {
            coefficients[i][i] = if pearson(&columns[i].1, &columns[i].1).is_nan() {
                f64::NAN
            } else {
                1.0
            };
            for j in (i + 1)..size {
                let r = pearson(&columns[i].1, &columns[j].1);
                coefficients[i][j] = r;
                coefficients[j][i] = r;
            }
        }
        CorrelationMatrix {
            variables: columns.iter().map(|(name, _)| name.clone()).collect(),
            coefficients,
        }
    }

    pub fn index_of(&self, variable: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.coefficients[self.index_of(a)?][self.index_of(b)?])
    }

    /// Every variable's coefficient against `variable`, in column order.
    pub fn column(&self, variable: &str) -> Option<Vec<(String, f64)>> {
        let index = self.index_of(variable)?;
        Some(
            self.variables
                .iter()
                .zip(self.coefficients.iter())
                .map(|(name, row)| (name.clone(), row[index]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let x = col(&[1.0, 2.0, 3.0, 4.0]);
        let y = col(&[2.0, 4.0, 6.0, 8.0]);
        let z = col(&[4.0, 3.0, 2.0, 1.0]);
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_uses_complete_pairs_only() {
        let x = vec![Some(1.0), Some(2.0), None, Some(3.0)];
        let y = vec![Some(1.0), Some(2.0), Some(100.0), Some(3.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_is_nan() {
        assert!(pearson(&col(&[1.0, 1.0, 1.0]), &col(&[1.0, 2.0, 3.0])).is_nan());
        assert!(pearson(&col(&[1.0]), &col(&[2.0])).is_nan());
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let columns = vec![
            ("a".to_string(), col(&[1.0, 2.0, 3.0])),
            ("b".to_string(), col(&[3.0, 1.0, 2.0])),
            ("flat".to_string(), col(&[5.0, 5.0, 5.0])),
        ];
        let matrix = CorrelationMatrix::from_columns(&columns);
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert_eq!(matrix.get("b", "b"), Some(1.0));
        assert!(matrix.get("flat", "flat").unwrap().is_nan());
        assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
        assert_eq!(matrix.get("a", "missing"), None);
        let column = matrix.column("a").unwrap();
        assert_eq!(column.len(), 3);
        assert_eq!(column[0], ("a".to_string(), 1.0));
    }
}
