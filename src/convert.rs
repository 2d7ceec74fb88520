//! Conversion between sparse and dense matrices.
//!
//! The parity check matrix of an LDPC code is stored as a
//! [`SparseMatrix`], but deriving a generator matrix from it requires
//! Gauss-Jordan elimination, which fills in the matrix and is better done
//! on a [`DenseMatrix`]. This module converts between the two
//! representations.

use crate::dense::DenseMatrix;
use crate::sparse::SparseMatrix;

/// Converts a sparse matrix into a dense matrix of the same dimensions.
pub fn sparse_to_dense(m: &SparseMatrix) -> DenseMatrix {
    let mut r = DenseMatrix::new(m.num_rows(), m.num_cols());
    for i in 0..m.num_rows() {
        for e in m.iter_row(i) {
            r.set(i, m.col(e), 1);
        }
    }
    r
}

/// Converts a dense matrix into a sparse matrix of the same dimensions.
pub fn dense_to_sparse(m: &DenseMatrix) -> SparseMatrix {
    let mut r = SparseMatrix::new(m.num_rows(), m.num_cols());
    for i in 0..m.num_rows() {
        for j in 0..m.num_cols() {
            if m.get(i, j) != 0 {
                r.insert(i, j);
            }
        }
    }
    r
}
