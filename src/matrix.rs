//! Dense distance matrix in kilometers.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// A square n×n matrix of distances (km), row-major.
///
/// Built once per request and never mutated afterwards. Serialized as nested
/// rows; deserializing goes through [`DistanceMatrix::from_rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Empty matrix for zero locations.
    pub fn empty() -> Self {
        Self {
            size: 0,
            data: Vec::new(),
        }
    }

    /// Builds a matrix from explicit rows, e.g. a road-network table.
    ///
    /// Rows must all have `rows.len()` entries, each finite and non-negative.
    /// Road matrices are not required to be symmetric.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(PlannerError::MatrixShape {
                    row,
                    len: values.len(),
                    size,
                });
            }
            if let Some((col, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, value)| !(value.is_finite() && **value >= 0.0))
            {
                return Err(PlannerError::InvalidDistance { row, col, value });
            }
            data.extend(values);
        }
        Ok(Self { size, data })
    }

    /// Wraps row-major data already known to be `size * size` long.
    pub(crate) fn from_square(size: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        assert!(from < self.size && to < self.size, "matrix index out of bounds");
        self.data[from * self.size + to]
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Nested rows, the shape returned to API callers.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    /// Sum of consecutive leg distances along `order`.
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|leg| self.get(leg[0], leg[1])).sum()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = PlannerError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.to_rows()
    }
}
