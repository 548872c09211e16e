//! Sparse matrix-vector multiplication over every storage format
//!
//! `multiply` checks shapes and dispatches on the active format and the
//! execution space. The serial kernels live here, the rayon ones in
//! `crate::parallel`.

use crate::error::MatrixError;
use crate::matrix::{
    CooMatrix, CsrMatrix, DiaMatrix, DynamicMatrix, EllMatrix, ExecutionSpace, Scalar, SpmvUpdate,
};
use crate::parallel;

/// Formats whose SpMV decomposes into independent per-row dot products
pub(crate) trait RowKernel<T: Scalar>: Sync {
    fn n_rows(&self) -> usize;

    /// `(A * x)[i]`
    fn row_dot(&self, i: usize, x: &[T]) -> T;
}

impl<T: Scalar> RowKernel<T> for CsrMatrix<T> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn row_dot(&self, i: usize, x: &[T]) -> T {
        let mut sum = T::zero();
        for k in self.row_ptr[i]..self.row_ptr[i + 1] {
            sum += self.values[k] * x[self.col_idx[k]];
        }
        sum
    }
}

impl<T: Scalar> RowKernel<T> for DiaMatrix<T> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn row_dot(&self, i: usize, x: &[T]) -> T {
        let mut sum = T::zero();
        for d in 0..self.offsets.len() {
            // padding slots inside the matrix hold zero
            if let Some(j) = self.column(d, i) {
                sum += self.values[d * self.n_rows + i] * x[j];
            }
        }
        sum
    }
}

impl<T: Scalar> RowKernel<T> for EllMatrix<T> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn row_dot(&self, i: usize, x: &[T]) -> T {
        let mut sum = T::zero();
        for (j, v) in self.row_entries(i) {
            sum += v * x[j];
        }
        sum
    }
}

#[inline]
pub(crate) fn write<T: Scalar>(update: SpmvUpdate, yi: &mut T, value: T) {
    match update {
        SpmvUpdate::Overwrite => *yi = value,
        SpmvUpdate::Accumulate => *yi += value,
    }
}

/// Computes `y = A * x` or `y += A * x` depending on `update`
///
/// Blocks until the kernel completes, whatever the execution space.
pub fn multiply<T: Scalar>(
    exec: ExecutionSpace,
    a: &DynamicMatrix<T>,
    x: &[T],
    y: &mut [T],
    update: SpmvUpdate,
) -> Result<(), MatrixError> {
    if x.len() != a.ncols() {
        return Err(MatrixError::DimensionMismatch {
            operation: "spmv input vector",
            expected: a.ncols(),
            actual: x.len(),
        });
    }
    if y.len() != a.nrows() {
        return Err(MatrixError::DimensionMismatch {
            operation: "spmv output vector",
            expected: a.nrows(),
            actual: y.len(),
        });
    }

    match exec {
        ExecutionSpace::Serial => multiply_serial(a, x, y, update),
        ExecutionSpace::Threads => parallel::multiply_parallel(a, x, y, update),
    }
    Ok(())
}

fn multiply_serial<T: Scalar>(a: &DynamicMatrix<T>, x: &[T], y: &mut [T], update: SpmvUpdate) {
    match a {
        DynamicMatrix::Coo(m) => coo_serial(m, x, y, update),
        DynamicMatrix::Csr(m) => rows_serial(m, x, y, update),
        DynamicMatrix::Dia(m) => rows_serial(m, x, y, update),
        DynamicMatrix::Ell(m) => rows_serial(m, x, y, update),
        DynamicMatrix::Hyb(m) => {
            rows_serial(&m.ell, x, y, update);
            coo_serial(&m.coo, x, y, SpmvUpdate::Accumulate);
        }
        DynamicMatrix::Hdc(m) => {
            rows_serial(&m.dia, x, y, update);
            rows_serial(&m.csr, x, y, SpmvUpdate::Accumulate);
        }
    }
}

fn rows_serial<T: Scalar, K: RowKernel<T>>(m: &K, x: &[T], y: &mut [T], update: SpmvUpdate) {
    for (i, yi) in y.iter_mut().enumerate().take(m.n_rows()) {
        write(update, yi, m.row_dot(i, x));
    }
}

fn coo_serial<T: Scalar>(m: &CooMatrix<T>, x: &[T], y: &mut [T], update: SpmvUpdate) {
    if update == SpmvUpdate::Overwrite {
        y.iter_mut().for_each(|yi| *yi = T::zero());
    }
    for (r, c, v) in m.iter() {
        y[r] += v * x[c];
    }
}
