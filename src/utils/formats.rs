//! Utilities for converting between our matrix formats and external libraries

use ndarray::Array1;
use sprs::CsMat;

use crate::matrix::{CsrMatrix, Scalar};

/// Converts our CSR matrix format to sprs CsMat format
pub fn to_sprs_csr<T>(matrix: &CsrMatrix<T>) -> CsMat<T>
where
    T: Scalar + Default,
{
    CsMat::new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts sprs CsMat to our CsrMatrix, transposing storage if it is CSC
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> CsrMatrix<T>
where
    T: Scalar + Default,
{
    let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    CsrMatrix::new(n_rows, n_cols, indptr, indices, data)
}

/// `A * x` computed by sprs, used to validate our kernels
pub fn reference_spmv(a: &CsrMatrix<f64>, x: &[f64]) -> Array1<f64> {
    let a = to_sprs_csr(a);
    let x = Array1::from(x.to_vec());
    &a * &x
}
