//! Dense row-major `f64` matrix.
//!
//! Covers the handful of shapes the evaluators need: covariate matrices,
//! per-arm reward-estimate tables, and full-label indicator matrices.
//! Index methods panic on out-of-range access; shape-changing constructors
//! return `None` on inconsistent input so callers can surface their own
//! validation errors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from a flat row-major buffer. `None` if the buffer length
    /// is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Build from a slice of equal-length rows. `None` on ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Row `i` as a slice. Panics if out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Element at `(i, j)`. Panics if out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.cols, "col {j} out of range for {} cols", self.cols);
        self.row(i)[j]
    }

    /// Set element at `(i, j)`. Panics if out of range.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of range");
        self.data[i * self.cols + j] = value;
    }

    /// New matrix holding the listed rows, in order. Indices may repeat.
    /// Panics if any index is out of range.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// New matrix holding the first `n` rows. Panics if `n` exceeds the
    /// row count.
    pub fn head_rows(&self, n: usize) -> Self {
        assert!(n <= self.rows, "head of {n} rows exceeds {} rows", self.rows);
        Self {
            rows: n,
            cols: self.cols,
            data: self.data[..n * self.cols].to_vec(),
        }
    }

    /// Reorder rows in place so that new row `k` is old row `order[k]`.
    /// Panics unless `order` has exactly one entry per row.
    pub fn permute_rows(&mut self, order: &[usize]) {
        assert_eq!(order.len(), self.rows, "permutation length mismatch");
        let mut data = Vec::with_capacity(self.data.len());
        for &i in order {
            data.extend_from_slice(self.row(i));
        }
        self.data = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_and_access() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.get(0, 1), 2.0);
    }

    #[test]
    fn from_rows_ragged_is_none() {
        assert!(Matrix::from_rows(&[vec![1.0], vec![2.0, 3.0]]).is_none());
    }

    #[test]
    fn from_vec_length_checked() {
        assert!(Matrix::from_vec(2, 2, vec![0.0; 3]).is_none());
        assert!(Matrix::from_vec(2, 2, vec![0.0; 4]).is_some());
    }

    #[test]
    fn take_rows_gathers_in_order() {
        let m = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let sub = m.take_rows(&[2, 0]);
        assert_eq!(sub.rows(), 2);
        assert_eq!(sub.row(0), &[3.0]);
        assert_eq!(sub.row(1), &[1.0]);
    }

    #[test]
    fn take_rows_empty_selection() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let sub = m.take_rows(&[]);
        assert!(sub.is_empty());
        assert_eq!(sub.cols(), 2);
    }

    #[test]
    fn head_rows_prefix() {
        let m = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let head = m.head_rows(2);
        assert_eq!(head.rows(), 2);
        assert_eq!(head.row(1), &[2.0]);
    }

    #[test]
    fn permute_rows_reorders() {
        let mut m = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        m.permute_rows(&[1, 2, 0]);
        assert_eq!(m.row(0), &[2.0]);
        assert_eq!(m.row(1), &[3.0]);
        assert_eq!(m.row(2), &[1.0]);
    }

    #[test]
    fn set_updates_cell() {
        let mut m = Matrix::zeros(2, 3);
        m.set(1, 2, 7.5);
        assert_eq!(m.get(1, 2), 7.5);
    }
}
