//! ILU(0) preconditioner
//!
//! Incomplete LU factorization with no fill-in.
//! For the tridiagonal matrices of 1-D P1 elements there is no fill-in to drop,
//! so ILU(0) coincides with the exact LU factorization.

use crate::sparse::CsrMatrix;
use crate::traits::Preconditioner;
use ndarray::Array1;

/// Pivots smaller than this are skipped rather than inverted
const PIVOT_EPS: f64 = 1e-300;

/// ILU(0) preconditioner
///
/// Computes an incomplete LU factorization where the sparsity pattern
/// of L and U is the same as the original matrix.
#[derive(Debug, Clone)]
pub struct IluPreconditioner {
    /// Strictly lower factor (unit diagonal implied), CSR
    l_values: Vec<f64>,
    l_col_indices: Vec<usize>,
    l_row_ptrs: Vec<usize>,
    /// Strictly upper factor, CSR
    u_values: Vec<f64>,
    u_col_indices: Vec<usize>,
    u_row_ptrs: Vec<usize>,
    /// Diagonal of U
    u_diag: Vec<f64>,
    n: usize,
}

impl IluPreconditioner {
    /// Create ILU(0) preconditioner from a CSR matrix with sorted rows
    pub fn from_csr(matrix: &CsrMatrix) -> Self {
        let n = matrix.num_rows;
        let col_indices = &matrix.col_indices;
        let row_ptrs = &matrix.row_ptrs;
        let diag_positions = matrix.diagonal_positions();

        let mut values = matrix.values.clone();

        // IKJ variant restricted to the existing pattern
        for i in 0..n {
            for idx in row_ptrs[i]..row_ptrs[i + 1] {
                let k = col_indices[idx];
                if k >= i {
                    break;
                }

                let Some(u_kk_idx) = diag_positions[k] else {
                    continue;
                };
                let u_kk = values[u_kk_idx];
                if u_kk.abs() < PIVOT_EPS {
                    continue;
                }

                let l_ik = values[idx] / u_kk;
                values[idx] = l_ik;

                for j_idx in (idx + 1)..row_ptrs[i + 1] {
                    let j = col_indices[j_idx];
                    let row_k = &col_indices[(u_kk_idx + 1)..row_ptrs[k + 1]];
                    if let Ok(offset) = row_k.binary_search(&j) {
                        values[j_idx] -= l_ik * values[u_kk_idx + 1 + offset];
                    }
                }
            }
        }

        let mut l_values = Vec::new();
        let mut l_col_indices = Vec::new();
        let mut l_row_ptrs = vec![0];

        let mut u_values = Vec::new();
        let mut u_col_indices = Vec::new();
        let mut u_row_ptrs = vec![0];
        let mut u_diag = vec![1.0; n];

        for i in 0..n {
            for idx in row_ptrs[i]..row_ptrs[i + 1] {
                let j = col_indices[idx];
                let val = values[idx];
                if j < i {
                    l_values.push(val);
                    l_col_indices.push(j);
                } else if j == i {
                    u_diag[i] = val;
                } else {
                    u_values.push(val);
                    u_col_indices.push(j);
                }
            }
            l_row_ptrs.push(l_values.len());
            u_row_ptrs.push(u_values.len());
        }

        log::debug!(
            "ILU(0): n = {}, nnz(L) = {}, nnz(U) = {}",
            n,
            l_values.len(),
            u_values.len() + n
        );

        Self {
            l_values,
            l_col_indices,
            l_row_ptrs,
            u_values,
            u_col_indices,
            u_row_ptrs,
            u_diag,
            n,
        }
    }
}

impl Preconditioner for IluPreconditioner {
    fn apply(&self, r: &Array1<f64>) -> Array1<f64> {
        let mut y = r.clone();

        // Forward substitution: Ly = r (L has unit diagonal)
        for i in 0..self.n {
            let mut acc = y[i];
            for idx in self.l_row_ptrs[i]..self.l_row_ptrs[i + 1] {
                acc -= self.l_values[idx] * y[self.l_col_indices[idx]];
            }
            y[i] = acc;
        }

        // Backward substitution: Ux = y
        let mut x = y;
        for i in (0..self.n).rev() {
            let mut acc = x[i];
            for idx in self.u_row_ptrs[i]..self.u_row_ptrs[i + 1] {
                acc -= self.u_values[idx] * x[self.u_col_indices[idx]];
            }
            let u_ii = self.u_diag[i];
            x[i] = if u_ii.abs() > PIVOT_EPS { acc / u_ii } else { acc };
        }

        x
    }
}
