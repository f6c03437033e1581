//! Named numeric feature table.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::collections::HashSet;

use crate::error::{ExplainError, Result};

/// A rows × features table of `f64` values with named columns.
///
/// Every perturbing operation returns a fresh `Dataset`; the receiver is
/// never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(ExplainError::dataset(format!(
                "{} column names for {} columns",
                columns.len(),
                values.ncols()
            )));
        }
        let mut seen = HashSet::new();
        for name in &columns {
            if name.is_empty() {
                return Err(ExplainError::dataset("column names must not be empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(ExplainError::dataset(format!("duplicate column: {name}")));
            }
        }
        Ok(Self { columns, values })
    }

    /// Build a dataset from `(name, values)` column pairs of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let n_cols = columns.len();
        let mut names = Vec::with_capacity(n_cols);
        let mut values = Array2::zeros((n_rows, n_cols));
        for (j, (name, col)) in columns.into_iter().enumerate() {
            let name = name.into();
            if col.len() != n_rows {
                return Err(ExplainError::dataset(format!(
                    "column {name} has {} rows, expected {n_rows}",
                    col.len()
                )));
            }
            values.column_mut(j).assign(&Array1::from(col));
            names.push(name);
        }
        Self::new(names, values)
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ExplainError::feature_not_found(name))
    }

    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let j = self.column_index(name)?;
        Ok(self.values.column(j))
    }

    /// Copy of the dataset with column `name` replaced by `values`.
    pub fn with_column(&self, name: &str, values: &[f64]) -> Result<Self> {
        let j = self.column_index(name)?;
        if values.len() != self.n_rows() {
            return Err(ExplainError::dataset(format!(
                "replacement for {name} has {} rows, expected {}",
                values.len(),
                self.n_rows()
            )));
        }
        let mut copy = self.clone();
        copy.values
            .column_mut(j)
            .iter_mut()
            .zip(values)
            .for_each(|(dst, src)| *dst = *src);
        Ok(copy)
    }

    /// Copy of the dataset with every value of column `name` set to `value`.
    pub fn with_constant(&self, name: &str, value: f64) -> Result<Self> {
        let j = self.column_index(name)?;
        let mut copy = self.clone();
        copy.values.column_mut(j).fill(value);
        Ok(copy)
    }

    /// Rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i >= self.n_rows()) {
            return Err(ExplainError::dataset(format!(
                "row {bad} out of bounds for {} rows",
                self.n_rows()
            )));
        }
        Ok(Self {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), indices),
        })
    }

    /// Copy of the dataset stably sorted by column `name`.
    pub fn sorted_by(&self, name: &str) -> Result<Self> {
        let col = self.column(name)?;
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| col[a].total_cmp(&col[b]));
        self.select_rows(&order)
    }
}
