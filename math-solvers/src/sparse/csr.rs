//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts

use crate::traits::LinearOperator;
use ndarray::{Array1, Array2};
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Row count above which the mat-vec is split across threads
#[cfg(feature = "rayon")]
const PARALLEL_MATVEC_ROWS: usize = 4096;

/// Compressed Sparse Row (CSR) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
/// Matrix-vector products are O(nnz) instead of O(n²) for dense matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in row-major order
    pub values: Vec<f64>,
    /// Column indices for each value, sorted within each row
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub row_ptrs: Vec<usize>,
}

impl CsrMatrix {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<f64>, threshold: f64) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed, which is
    /// exactly what element-by-element finite element assembly produces.
    ///
    /// # Panics
    ///
    /// Panics if a triplet's row is not below `num_rows` or its column is not
    /// below `num_cols`.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Self {
        if triplets.is_empty() {
            return Self::new(num_rows, num_cols);
        }

        triplets.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut row_counts = vec![0usize; num_rows];

        let mut prev: Option<(usize, usize)> = None;
        for (row, col, val) in triplets {
            assert!(
                row < num_rows && col < num_cols,
                "triplet ({row}, {col}) outside a {num_rows}x{num_cols} matrix"
            );
            if prev == Some((row, col)) {
                if let Some(last) = values.last_mut() {
                    *last += val;
                }
                continue;
            }
            values.push(val);
            col_indices.push(col);
            row_counts[row] += 1;
            prev = Some((row, col));
        }

        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        for count in row_counts {
            let last = row_ptrs[row_ptrs.len() - 1];
            row_ptrs.push(last + count);
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Sparsity ratio (fraction of non-zero entries)
    pub fn sparsity(&self) -> f64 {
        let total = self.num_rows * self.num_cols;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Uses parallel processing when the `rayon` feature is enabled and the
    /// matrix is large enough to benefit from parallelization.
    pub fn matvec(&self, x: &Array1<f64>) -> Array1<f64> {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");

        #[cfg(feature = "rayon")]
        {
            if self.num_rows >= PARALLEL_MATVEC_ROWS {
                return self.matvec_parallel(x);
            }
        }

        self.matvec_sequential(x)
    }

    fn matvec_sequential(&self, x: &Array1<f64>) -> Array1<f64> {
        let mut y = Array1::zeros(self.num_rows);
        for i in 0..self.num_rows {
            y[i] = self.row_entries(i).map(|(j, a)| a * x[j]).sum();
        }
        y
    }

    #[cfg(feature = "rayon")]
    fn matvec_parallel(&self, x: &Array1<f64>) -> Array1<f64> {
        let results: Vec<f64> = (0..self.num_rows)
            .into_par_iter()
            .map(|i| self.row_entries(i).map(|(j, a)| a * x[j]).sum())
            .collect();
        Array1::from_vec(results)
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let range = self.row_range(i);
        match self.col_indices[range.clone()].binary_search(&j) {
            Ok(offset) => self.values[range.start + offset],
            Err(_) => 0.0,
        }
    }

    /// Position of the diagonal entry of each row in `values`, if stored
    pub fn diagonal_positions(&self) -> Vec<Option<usize>> {
        (0..self.num_rows.min(self.num_cols))
            .map(|i| {
                let range = self.row_range(i);
                self.col_indices[range.clone()]
                    .binary_search(&i)
                    .ok()
                    .map(|offset| range.start + offset)
            })
            .collect()
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<f64> {
        self.diagonal_positions()
            .into_iter()
            .map(|pos| pos.map_or(0.0, |p| self.values[p]))
            .collect()
    }

    /// Check structural and numerical symmetry within `tol`
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.num_rows != self.num_cols {
            return false;
        }
        (0..self.num_rows).all(|i| {
            self.row_entries(i)
                .all(|(j, a)| (a - self.get(j, i)).abs() <= tol)
        })
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            values: vec![1.0; n],
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        }
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.num_rows, self.num_cols));
        for i in 0..self.num_rows {
            for (j, a) in self.row_entries(i) {
                dense[[i, j]] = a;
            }
        }
        dense
    }
}

impl LinearOperator for CsrMatrix {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        self.matvec(x)
    }
}
