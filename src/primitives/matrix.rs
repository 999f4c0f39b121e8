//! Matrix type for 2D numeric data.

use crate::error::{LdaError, Result};
use serde::{Deserialize, Serialize};

/// A 2D matrix of values (row-major storage).
///
/// # Examples
///
/// ```
/// use aprender_lda::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LdaError::DimensionMismatch {
                expected: format!("{rows}x{cols} = {} elements", rows * cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Wraps data whose length the caller has already sized as rows * cols.
    pub(crate) fn from_vec_unchecked(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Returns a row as a slice.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns a column as an owned vector.
    #[must_use]
    pub fn column(&self, col_idx: usize) -> Vec<T> {
        (0..self.rows)
            .map(|row| self.data[row * self.cols + col_idx])
            .collect()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Sum of each row.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.rows).map(|r| self.row(r).iter().sum()).collect()
    }

    /// Sum of each column.
    #[must_use]
    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            for (sum, &v) in sums.iter_mut().zip(self.row(r)) {
                *sum += v;
            }
        }
        sums
    }

    /// Element-wise arithmetic mean of equally shaped matrices.
    ///
    /// # Errors
    ///
    /// Returns an error if `matrices` is empty or the shapes differ.
    pub fn mean<'a, I>(matrices: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Matrix<f64>>,
    {
        let mut iter = matrices.into_iter();
        let first = iter.next().ok_or(LdaError::NotSampled)?;
        let mut acc = first.clone();
        let mut count = 1usize;

        for m in iter {
            if m.shape() != acc.shape() {
                return Err(LdaError::DimensionMismatch {
                    expected: format!("{}x{}", acc.rows, acc.cols),
                    actual: format!("{}x{}", m.rows, m.cols),
                });
            }
            for (a, &v) in acc.data.iter_mut().zip(&m.data) {
                *a += v;
            }
            count += 1;
        }

        let n = count as f64;
        for a in &mut acc.data {
            *a /= n;
        }
        Ok(acc)
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
