//! # Structural analysis of the nonzero pattern
//!
//! Per-row and per-diagonal nonzero histograms computed directly on the
//! active storage format, plus the reductions the feature extractor needs.
//!
//! Diagonal `d` of an `n_rows × n_cols` matrix collects the entries with
//! `col - row + (n_rows - 1) == d`, so the histogram has
//! `n_rows + n_cols - 1` slots: the bottom-left corner first, the top-right
//! corner last.

use crate::matrix::{DynamicMatrix, Scalar};

/// Visits the `(row, col)` of every stored nonzero, padding excluded
fn for_each_entry<T: Scalar>(a: &DynamicMatrix<T>, mut f: impl FnMut(usize, usize)) {
    match a {
        DynamicMatrix::Coo(m) => {
            for (&r, &c) in m.row_idx.iter().zip(&m.col_idx) {
                f(r, c);
            }
        }
        DynamicMatrix::Csr(m) => {
            for i in 0..m.n_rows {
                for &c in &m.col_idx[m.row_ptr[i]..m.row_ptr[i + 1]] {
                    f(i, c);
                }
            }
        }
        DynamicMatrix::Dia(m) => {
            for i in 0..m.n_rows {
                m.row_entries(i).for_each(|(c, _)| f(i, c));
            }
        }
        DynamicMatrix::Ell(m) => {
            for i in 0..m.n_rows {
                m.row_entries(i).for_each(|(c, _)| f(i, c));
            }
        }
        DynamicMatrix::Hyb(m) => {
            for i in 0..m.ell.n_rows {
                m.ell.row_entries(i).for_each(|(c, _)| f(i, c));
            }
            for (&r, &c) in m.coo.row_idx.iter().zip(&m.coo.col_idx) {
                f(r, c);
            }
        }
        DynamicMatrix::Hdc(m) => {
            for i in 0..m.dia.n_rows {
                m.dia.row_entries(i).for_each(|(c, _)| f(i, c));
            }
            for i in 0..m.csr.n_rows {
                for &c in &m.csr.col_idx[m.csr.row_ptr[i]..m.csr.row_ptr[i + 1]] {
                    f(i, c);
                }
            }
        }
    }
}

/// Number of nonzeros in every row (length `n_rows`)
pub fn count_nnz_per_row<T: Scalar>(a: &DynamicMatrix<T>) -> Vec<usize> {
    let mut counts = vec![0; a.nrows()];
    for_each_entry(a, |r, _| counts[r] += 1);
    counts
}

/// Number of nonzeros on every diagonal (length `n_rows + n_cols - 1`)
///
/// Empty for a matrix without rows or columns.
pub fn count_nnz_per_diagonal<T: Scalar>(a: &DynamicMatrix<T>) -> Vec<usize> {
    let (n_rows, n_cols) = (a.nrows(), a.ncols());
    if n_rows == 0 || n_cols == 0 {
        return Vec::new();
    }
    let mut counts = vec![0; n_rows + n_cols - 1];
    for_each_entry(a, |r, c| counts[c + n_rows - 1 - r] += 1);
    counts
}

/// Largest entry, 0 for an empty histogram
pub fn max(hist: &[usize]) -> usize {
    hist.iter().copied().max().unwrap_or(0)
}

/// Smallest entry, 0 for an empty histogram
pub fn min(hist: &[usize]) -> usize {
    hist.iter().copied().min().unwrap_or(0)
}

/// Population standard deviation around a caller-supplied mean
pub fn std(hist: &[usize], mean: f64) -> f64 {
    if hist.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = hist
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    (sum_sq / hist.len() as f64).sqrt()
}

/// Number of entries strictly greater than `threshold`
pub fn count_nonzero_above(hist: &[usize], threshold: usize) -> usize {
    hist.iter().filter(|&&v| v > threshold).count()
}
