//! Coordinate (COO) matrix format implementation

use std::fmt;

use super::{FormatId, Scalar, SparseStorage};

/// A sparse matrix stored as (row, column, value) triplets
///
/// Triplets are kept sorted by row, then column, with no duplicates. Every
/// other format is built from and expanded back into this layout.
#[derive(Clone, PartialEq)]
pub struct CooMatrix<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row index of each entry (size: nnz)
    pub row_idx: Vec<usize>,

    /// Column index of each entry (size: nnz)
    pub col_idx: Vec<usize>,

    /// Value of each entry (size: nnz)
    pub values: Vec<T>,
}

impl<T: Scalar> CooMatrix<T> {
    /// Creates a COO matrix from already sorted, duplicate-free triplets
    ///
    /// # Panics
    ///
    /// Panics if the arrays differ in length, an index is out of bounds, or
    /// the entries are not strictly increasing in (row, col) order.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_idx: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_idx.len(), col_idx.len(), "row_idx.len() must equal col_idx.len()");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");

        for (k, (&r, &c)) in row_idx.iter().zip(&col_idx).enumerate() {
            assert!(r < n_rows, "Row index {} out of bounds (n_rows = {})", r, n_rows);
            assert!(c < n_cols, "Column index {} out of bounds (n_cols = {})", c, n_cols);
            if k > 0 {
                assert!(
                    (row_idx[k - 1], col_idx[k - 1]) < (r, c),
                    "entries must be sorted by (row, col) without duplicates"
                );
            }
        }

        Self {
            n_rows,
            n_cols,
            row_idx,
            col_idx,
            values,
        }
    }

    /// Builds a COO matrix from unordered triplets, summing duplicates
    ///
    /// Out-of-range indices are the caller's responsibility; the reader
    /// validates them before getting here.
    pub fn from_triplets(n_rows: usize, n_cols: usize, mut triplets: Vec<(usize, usize, T)>) -> Self {
        triplets.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_idx = Vec::with_capacity(triplets.len());
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values: Vec<T> = Vec::with_capacity(triplets.len());

        for (row, col, val) in triplets {
            let last = row_idx.len();
            if last > 0 && row_idx[last - 1] == row && col_idx[last - 1] == col {
                values[last - 1] += val;
            } else {
                row_idx.push(row);
                col_idx.push(col);
                values.push(val);
            }
        }

        Self::new(n_rows, n_cols, row_idx, col_idx, values)
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_idx: Vec::new(),
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Iterates over `(row, col, value)` in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.row_idx
            .iter()
            .zip(&self.col_idx)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }
}

impl<T: Scalar> SparseStorage<T> for CooMatrix<T> {
    const FORMAT: FormatId = FormatId::Coo;

    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }

    fn to_coo(&self) -> CooMatrix<T> {
        self.clone()
    }

    fn resize_like(&mut self, other: &Self) {
        self.n_rows = other.n_rows;
        self.n_cols = other.n_cols;
        self.row_idx.resize(other.row_idx.len(), 0);
        self.col_idx.resize(other.col_idx.len(), 0);
        self.values.resize(other.values.len(), T::zero());
    }
}

impl<T: fmt::Debug> fmt::Debug for CooMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CooMatrix")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .field("nnz", &self.values.len())
            .finish()
    }
}
