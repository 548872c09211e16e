//! Conversion functions between matrix formats
//!
//! Every conversion goes through COO: a container expands itself with
//! `SparseStorage::to_coo` and the target is assembled by its `from_coo`.
//! DIA and ELL refuse large layouts whose padding would dwarf the nonzeros.

use crate::constants::TRUE_DIAG_DIVISOR;
use crate::error::ConversionError;
use crate::matrix::{
    ConversionLimits, CooMatrix, CsrMatrix, DiaMatrix, EllMatrix, FormatId, HdcMatrix, HybMatrix,
    Scalar,
};

impl<T: Scalar> CsrMatrix<T> {
    /// Compresses the row indices of a sorted COO matrix
    pub fn from_coo(coo: &CooMatrix<T>) -> Self {
        let mut row_ptr = vec![0; coo.n_rows + 1];
        for &r in &coo.row_idx {
            row_ptr[r + 1] += 1;
        }
        for i in 0..coo.n_rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        CsrMatrix::new(
            coo.n_rows,
            coo.n_cols,
            row_ptr,
            coo.col_idx.clone(),
            coo.values.clone(),
        )
    }
}

impl<T: Scalar> DiaMatrix<T> {
    /// Stores every occupied diagonal
    ///
    /// Fails when `ndiags * n_rows` exceeds both `fill_size_threshold` and
    /// `dia_max_fill * nnz`.
    pub fn from_coo(coo: &CooMatrix<T>, limits: &ConversionLimits) -> Result<Self, ConversionError> {
        let offsets: Vec<isize> = diagonal_counts(coo).into_iter().map(|(k, _)| k).collect();

        check_fill(
            FormatId::Dia,
            offsets.len() * coo.n_rows,
            coo.values.len(),
            limits.dia_max_fill,
            limits.fill_size_threshold,
        )?;

        Ok(DiaMatrix::from_parts(coo, offsets))
    }
}

impl<T: Scalar> EllMatrix<T> {
    /// Pads every row to the longest one
    ///
    /// Fails when `max_row_nnz * n_rows` exceeds both `fill_size_threshold`
    /// and `ell_max_fill * nnz`.
    pub fn from_coo(coo: &CooMatrix<T>, limits: &ConversionLimits) -> Result<Self, ConversionError> {
        let width = row_lengths(coo).into_iter().max().unwrap_or(0);

        check_fill(
            FormatId::Ell,
            width * coo.n_rows,
            coo.values.len(),
            limits.ell_max_fill,
            limits.fill_size_threshold,
        )?;

        let (ell, _) = EllMatrix::from_parts(coo, width);
        Ok(ell)
    }
}

impl<T: Scalar> HybMatrix<T> {
    /// Splits rows at the width chosen by `optimal_ell_width`
    pub fn from_coo(coo: &CooMatrix<T>, limits: &ConversionLimits) -> Self {
        let width = optimal_ell_width(
            &row_lengths(coo),
            limits.hyb_relative_speed,
            limits.hyb_breakeven_threshold,
        );
        let (ell, coo) = EllMatrix::from_parts(coo, width);
        HybMatrix { ell, coo }
    }
}

impl<T: Scalar> HdcMatrix<T> {
    /// Moves the true diagonals into DIA storage, the rest into CSR
    pub fn from_coo(coo: &CooMatrix<T>) -> Self {
        let threshold = true_diagonal_threshold(coo.n_rows);
        let offsets: Vec<isize> = diagonal_counts(coo)
            .into_iter()
            .filter(|&(_, count)| count > threshold)
            .map(|(k, _)| k)
            .collect();

        let mut rest = CooMatrix::zeros(coo.n_rows, coo.n_cols);
        for (r, c, v) in coo.iter() {
            let k = c as isize - r as isize;
            if offsets.binary_search(&k).is_err() {
                rest.row_idx.push(r);
                rest.col_idx.push(c);
                rest.values.push(v);
            }
        }

        HdcMatrix {
            dia: DiaMatrix::from_parts(coo, offsets),
            csr: CsrMatrix::from_coo(&rest),
        }
    }
}

/// Count above which a diagonal counts as a true (dense) diagonal
pub fn true_diagonal_threshold(n_rows: usize) -> usize {
    n_rows / TRUE_DIAG_DIVISOR
}

/// Chooses the ELL width of a HYB matrix
///
/// Picks the smallest `k` such that the rows longer than `k` are either few
/// enough for the COO part to beat ELL (`relative_speed * long_rows < n_rows`)
/// or below `breakeven_threshold`. Falls back to the longest row.
pub fn optimal_ell_width(row_lengths: &[usize], relative_speed: f64, breakeven_threshold: usize) -> usize {
    let n_rows = row_lengths.len();
    let max_len = row_lengths.iter().copied().max().unwrap_or(0);

    // histogram[k] = number of rows with at most k entries
    let mut histogram = vec![0usize; max_len + 1];
    for &len in row_lengths {
        histogram[len] += 1;
    }
    for k in 1..=max_len {
        histogram[k] += histogram[k - 1];
    }

    for (k, &shorter) in histogram.iter().enumerate().take(max_len) {
        let longer = n_rows - shorter;
        if relative_speed * (longer as f64) < n_rows as f64 || longer < breakeven_threshold {
            return k;
        }
    }
    max_len
}

fn row_lengths<T>(coo: &CooMatrix<T>) -> Vec<usize> {
    let mut lengths = vec![0; coo.n_rows];
    for &r in &coo.row_idx {
        lengths[r] += 1;
    }
    lengths
}

/// Occupied diagonals `(col - row, count)` in ascending offset order
fn diagonal_counts<T>(coo: &CooMatrix<T>) -> Vec<(isize, usize)> {
    if coo.n_rows == 0 || coo.n_cols == 0 {
        return Vec::new();
    }
    let base = coo.n_rows - 1;
    let mut counts = vec![0usize; coo.n_rows + coo.n_cols - 1];
    for (&r, &c) in coo.row_idx.iter().zip(&coo.col_idx) {
        counts[c + base - r] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(d, count)| (d as isize - base as isize, count))
        .collect()
}

/// Small layouts are always accepted, whatever their fill ratio
fn check_fill(
    format: FormatId,
    slots: usize,
    nnz: usize,
    max_fill: f64,
    size_threshold: usize,
) -> Result<(), ConversionError> {
    if slots > size_threshold && nnz > 0 && slots as f64 > max_fill * nnz as f64 {
        return Err(ConversionError::ExcessiveFill {
            format,
            slots,
            nnz,
            max_fill,
        });
    }
    Ok(())
}
