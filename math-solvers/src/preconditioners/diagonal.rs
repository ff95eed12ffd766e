//! Diagonal (Jacobi) preconditioner
//!
//! Scales each residual component by the inverse of the matching diagonal entry.

use crate::sparse::CsrMatrix;
use crate::traits::Preconditioner;
use ndarray::{Array1, Zip};

#[cfg(feature = "rayon")]
const PARALLEL_APPLY_LEN: usize = 1000;

/// Diagonal (Jacobi) preconditioner
///
/// M = diag(A), so M^(-1) scales each component by 1/A_ii
#[derive(Debug, Clone)]
pub struct DiagonalPreconditioner {
    /// Inverse diagonal elements
    inv_diag: Array1<f64>,
}

impl DiagonalPreconditioner {
    /// Create a diagonal preconditioner from a CSR matrix
    pub fn from_csr(matrix: &CsrMatrix) -> Self {
        Self::from_diagonal(&matrix.diagonal())
    }

    /// Create from a diagonal vector directly
    ///
    /// Zero (or vanishing) diagonal entries are left unscaled.
    pub fn from_diagonal(diag: &Array1<f64>) -> Self {
        let inv_diag = diag.mapv(|d| if d.abs() > 1e-30 { 1.0 / d } else { 1.0 });
        Self { inv_diag }
    }
}

impl Preconditioner for DiagonalPreconditioner {
    fn apply(&self, r: &Array1<f64>) -> Array1<f64> {
        let mut out = Array1::zeros(r.len());

        #[cfg(feature = "rayon")]
        {
            if r.len() >= PARALLEL_APPLY_LEN {
                Zip::from(&mut out)
                    .and(r)
                    .and(&self.inv_diag)
                    .par_for_each(|o, &ri, &di| *o = ri * di);
                return out;
            }
        }

        Zip::from(&mut out)
            .and(r)
            .and(&self.inv_diag)
            .for_each(|o, &ri, &di| *o = ri * di);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_diagonal_preconditioner() {
        let precond = DiagonalPreconditioner::from_diagonal(&array![2.0, 4.0, 1.0]);
        let result = precond.apply(&array![2.0, 8.0, 3.0]);

        assert_relative_eq!(result[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(result[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_from_csr() {
        let dense = array![[4.0, 1.0], [1.0, 2.0]];
        let matrix = CsrMatrix::from_dense(&dense, 1e-15);
        let precond = DiagonalPreconditioner::from_csr(&matrix);

        let result = precond.apply(&array![4.0, 4.0]);
        assert_relative_eq!(result[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_diagonal_passes_through() {
        let precond = DiagonalPreconditioner::from_diagonal(&array![0.0, 5.0]);
        let result = precond.apply(&array![3.0, 5.0]);
        assert_relative_eq!(result[0], 3.0);
        assert_relative_eq!(result[1], 1.0);
    }
}
