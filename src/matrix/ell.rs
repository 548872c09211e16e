//! ELLPACK (ELL) matrix format implementation

use std::fmt;

use super::{CooMatrix, FormatId, Scalar, SparseStorage};
use crate::constants::INVALID_INDEX;

/// A sparse matrix with a fixed number of slots per row
///
/// Slots are stored row-major: slot `i * width + k` is the k-th entry of row
/// `i`. Unused slots carry `INVALID_INDEX` as column and zero as value.
#[derive(Clone, PartialEq)]
pub struct EllMatrix<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Slots per row
    pub width: usize,
    pub col_idx: Vec<usize>,
    pub values: Vec<T>,
}

impl<T: Scalar> EllMatrix<T> {
    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            width: 0,
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Places at most `width` leading entries of every row, returns the rest
    ///
    /// The overflow keeps the sorted order of `coo`.
    pub(crate) fn from_parts(coo: &CooMatrix<T>, width: usize) -> (Self, CooMatrix<T>) {
        let n_rows = coo.n_rows;
        let mut col_idx = vec![INVALID_INDEX; n_rows * width];
        let mut values = vec![T::zero(); n_rows * width];
        let mut overflow = CooMatrix::zeros(n_rows, coo.n_cols);

        let mut used = vec![0usize; n_rows];
        for (r, c, v) in coo.iter() {
            if used[r] < width {
                let slot = r * width + used[r];
                col_idx[slot] = c;
                values[slot] = v;
                used[r] += 1;
            } else {
                overflow.row_idx.push(r);
                overflow.col_idx.push(c);
                overflow.values.push(v);
            }
        }

        let ell = Self {
            n_rows,
            n_cols: coo.n_cols,
            width,
            col_idx,
            values,
        };
        (ell, overflow)
    }

    /// Occupied slots of row `i` as `(col, value)`
    pub(crate) fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let start = i * self.width;
        self.col_idx[start..start + self.width]
            .iter()
            .zip(&self.values[start..start + self.width])
            .take_while(|&(&c, _)| c != INVALID_INDEX)
            .map(|(&c, &v)| (c, v))
    }
}

impl<T: Scalar> SparseStorage<T> for EllMatrix<T> {
    const FORMAT: FormatId = FormatId::Ell;

    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn nnz(&self) -> usize {
        self.col_idx.iter().filter(|&&c| c != INVALID_INDEX).count()
    }

    fn to_coo(&self) -> CooMatrix<T> {
        let mut coo = CooMatrix::zeros(self.n_rows, self.n_cols);
        for i in 0..self.n_rows {
            for (c, v) in self.row_entries(i) {
                coo.row_idx.push(i);
                coo.col_idx.push(c);
                coo.values.push(v);
            }
        }
        coo
    }

    fn resize_like(&mut self, other: &Self) {
        self.n_rows = other.n_rows;
        self.n_cols = other.n_cols;
        self.width = other.width;
        self.col_idx.resize(other.col_idx.len(), INVALID_INDEX);
        self.values.resize(other.values.len(), T::zero());
    }
}

impl<T> fmt::Debug for EllMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EllMatrix")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .field("width", &self.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_and_overflow() {
        let coo = CooMatrix::from_triplets(
            3,
            4,
            vec![(0, 0, 1), (0, 1, 2), (0, 3, 3), (2, 2, 4)],
        );
        let (ell, overflow) = EllMatrix::from_parts(&coo, 2);

        assert_eq!(ell.col_idx, vec![0, 1, INVALID_INDEX, INVALID_INDEX, 2, INVALID_INDEX]);
        assert_eq!(ell.nnz(), 3);
        assert_eq!(overflow.col_idx, vec![3]);
        assert_eq!(ell.row_entries(1).count(), 0);
    }
}
