//! Hybrid DIA + CSR (HDC) matrix format implementation

use std::fmt;

use super::{CooMatrix, CsrMatrix, DiaMatrix, FormatId, Scalar, SparseStorage};

/// Dense diagonals in DIA, every other entry in CSR
#[derive(Clone, PartialEq)]
pub struct HdcMatrix<T> {
    pub dia: DiaMatrix<T>,
    pub csr: CsrMatrix<T>,
}

impl<T: Scalar> HdcMatrix<T> {
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            dia: DiaMatrix::zeros(n_rows, n_cols),
            csr: CsrMatrix::zeros(n_rows, n_cols),
        }
    }
}

impl<T: Scalar> SparseStorage<T> for HdcMatrix<T> {
    const FORMAT: FormatId = FormatId::Hdc;

    fn n_rows(&self) -> usize {
        self.dia.n_rows
    }

    fn n_cols(&self) -> usize {
        self.dia.n_cols
    }

    fn nnz(&self) -> usize {
        self.dia.nnz() + self.csr.nnz()
    }

    fn to_coo(&self) -> CooMatrix<T> {
        let mut out = CooMatrix::zeros(self.n_rows(), self.n_cols());
        let mut row: Vec<(usize, T)> = Vec::new();
        for i in 0..self.n_rows() {
            row.clear();
            row.extend(self.dia.row_entries(i));
            row.extend(self.csr.row_iter(i).map(|(c, &v)| (c, v)));
            row.sort_unstable_by_key(|&(c, _)| c);

            for &(c, v) in &row {
                out.row_idx.push(i);
                out.col_idx.push(c);
                out.values.push(v);
            }
        }
        out
    }

    fn resize_like(&mut self, other: &Self) {
        self.dia.resize_like(&other.dia);
        self.csr.resize_like(&other.csr);
    }
}

impl<T> fmt::Debug for HdcMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdcMatrix")
            .field("n_rows", &self.dia.n_rows)
            .field("n_cols", &self.dia.n_cols)
            .field("true_diagonals", &self.dia.offsets.len())
            .field("csr_nnz", &self.csr.values.len())
            .finish()
    }
}
