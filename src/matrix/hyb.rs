//! Hybrid ELL + COO (HYB) matrix format implementation

use std::fmt;

use super::{CooMatrix, EllMatrix, FormatId, Scalar, SparseStorage};

/// Regular row prefixes in ELL, the irregular tails in COO
#[derive(Clone, PartialEq)]
pub struct HybMatrix<T> {
    pub ell: EllMatrix<T>,
    pub coo: CooMatrix<T>,
}

impl<T: Scalar> HybMatrix<T> {
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            ell: EllMatrix::zeros(n_rows, n_cols),
            coo: CooMatrix::zeros(n_rows, n_cols),
        }
    }
}

impl<T: Scalar> SparseStorage<T> for HybMatrix<T> {
    const FORMAT: FormatId = FormatId::Hyb;

    fn n_rows(&self) -> usize {
        self.ell.n_rows
    }

    fn n_cols(&self) -> usize {
        self.ell.n_cols
    }

    fn nnz(&self) -> usize {
        self.ell.nnz() + self.coo.nnz()
    }

    fn to_coo(&self) -> CooMatrix<T> {
        let mut out = CooMatrix::zeros(self.n_rows(), self.n_cols());
        let mut k = 0;
        for i in 0..self.n_rows() {
            // ELL holds the leading columns of a row, COO the trailing ones
            for (c, v) in self.ell.row_entries(i) {
                out.row_idx.push(i);
                out.col_idx.push(c);
                out.values.push(v);
            }
            while k < self.coo.row_idx.len() && self.coo.row_idx[k] == i {
                out.row_idx.push(i);
                out.col_idx.push(self.coo.col_idx[k]);
                out.values.push(self.coo.values[k]);
                k += 1;
            }
        }
        out
    }

    fn resize_like(&mut self, other: &Self) {
        self.ell.resize_like(&other.ell);
        self.coo.resize_like(&other.coo);
    }
}

impl<T> fmt::Debug for HybMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybMatrix")
            .field("n_rows", &self.ell.n_rows)
            .field("n_cols", &self.ell.n_cols)
            .field("ell_width", &self.ell.width)
            .field("coo_nnz", &self.coo.values.len())
            .finish()
    }
}
