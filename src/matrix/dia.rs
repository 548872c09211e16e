//! Diagonal (DIA) matrix format implementation

use std::fmt;

use super::{CooMatrix, FormatId, Scalar, SparseStorage};

/// A sparse matrix stored by diagonals
///
/// - offsets: sorted list of occupied diagonals, `col - row`
/// - values: `offsets.len() × n_rows` block, diagonal-major; slot `d * n_rows + i`
///   holds the entry at `(i, i + offsets[d])`
/// - stored: marks which slots hold an entry, the rest are zero fill
#[derive(Clone, PartialEq)]
pub struct DiaMatrix<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub offsets: Vec<isize>,
    pub values: Vec<T>,
    pub stored: Vec<bool>,
}

impl<T: Scalar> DiaMatrix<T> {
    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            offsets: Vec::new(),
            values: Vec::new(),
            stored: Vec::new(),
        }
    }

    /// Number of stored diagonals
    pub fn ndiags(&self) -> usize {
        self.offsets.len()
    }

    /// Column hit by diagonal `d` in row `i`, if inside the matrix
    #[inline]
    pub fn column(&self, d: usize, i: usize) -> Option<usize> {
        let j = i as isize + self.offsets[d];
        if j >= 0 && (j as usize) < self.n_cols {
            Some(j as usize)
        } else {
            None
        }
    }

    /// Lays out the given triplets on the listed diagonals
    ///
    /// Every triplet must lie on one of `offsets`, which must be sorted.
    pub(crate) fn from_parts(coo: &CooMatrix<T>, offsets: Vec<isize>) -> Self {
        let n_rows = coo.n_rows;
        let mut values = vec![T::zero(); offsets.len() * n_rows];
        let mut stored = vec![false; offsets.len() * n_rows];

        for (r, c, v) in coo.iter() {
            let k = c as isize - r as isize;
            if let Ok(d) = offsets.binary_search(&k) {
                values[d * n_rows + r] = v;
                stored[d * n_rows + r] = true;
            }
        }

        Self {
            n_rows,
            n_cols: coo.n_cols,
            offsets,
            values,
            stored,
        }
    }

    /// Entries of row `i` as `(col, value)`, columns ascending
    pub(crate) fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        (0..self.ndiags()).filter_map(move |d| {
            let slot = d * self.n_rows + i;
            if self.stored[slot] {
                self.column(d, i).map(|j| (j, self.values[slot]))
            } else {
                None
            }
        })
    }
}

impl<T: Scalar> SparseStorage<T> for DiaMatrix<T> {
    const FORMAT: FormatId = FormatId::Dia;

    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn nnz(&self) -> usize {
        self.stored.iter().filter(|&&s| s).count()
    }

    fn to_coo(&self) -> CooMatrix<T> {
        let mut row_idx = Vec::new();
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for i in 0..self.n_rows {
            for (j, v) in self.row_entries(i) {
                row_idx.push(i);
                col_idx.push(j);
                values.push(v);
            }
        }

        CooMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_idx,
            col_idx,
            values,
        }
    }

    fn resize_like(&mut self, other: &Self) {
        self.n_rows = other.n_rows;
        self.n_cols = other.n_cols;
        self.offsets.resize(other.offsets.len(), 0);
        self.values.resize(other.values.len(), T::zero());
        self.stored.resize(other.stored.len(), false);
    }
}

impl<T> fmt::Debug for DiaMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiaMatrix")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .field("offsets", &self.offsets)
            .finish()
    }
}
