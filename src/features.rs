//! # Structural feature extraction
//!
//! Summarizes the nonzero pattern of a matrix as ten scalars, the input
//! row of the format-selection model:
//!
//! | # | name | definition |
//! |---|------|------------|
//! | 0 | `Nrows` | rows |
//! | 1 | `Ncols` | columns |
//! | 2 | `Nnnz` | stored nonzeros |
//! | 3 | `AvgNnnz` | `Nnnz / Nrows` |
//! | 4 | `Density` | `Nnnz / (Nrows * Ncols)` |
//! | 5 | `MaxRowNnnz` | longest row |
//! | 6 | `MinRowNnnz` | shortest row |
//! | 7 | `StdRowNnnz` | population std of row lengths around `AvgNnnz` |
//! | 8 | `NDiags` | occupied diagonals |
//! | 9 | `NTrueDiags` | diagonals holding more than `Nrows / 5` nonzeros |
//!
//! Matrices without rows or columns are rejected with
//! [`FeatureError::EmptyMatrix`] since the averages are undefined.

use std::fmt;

use tracing::debug;

use crate::constants::NFEATURES;
use crate::error::FeatureError;
use crate::matrix::conversion::true_diagonal_threshold;
use crate::matrix::{DynamicMatrix, Scalar};
use crate::structure;

/// Identifies one entry of a [`FeatureVector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Nrows,
    Ncols,
    Nnnz,
    AvgNnnz,
    Density,
    MaxRowNnnz,
    MinRowNnnz,
    StdRowNnnz,
    NDiags,
    NTrueDiags,
}

impl Feature {
    /// Every feature in output order
    pub const ALL: [Feature; NFEATURES] = [
        Feature::Nrows,
        Feature::Ncols,
        Feature::Nnnz,
        Feature::AvgNnnz,
        Feature::Density,
        Feature::MaxRowNnnz,
        Feature::MinRowNnnz,
        Feature::StdRowNnnz,
        Feature::NDiags,
        Feature::NTrueDiags,
    ];

    /// Column header used in `features.csv`
    pub fn name(self) -> &'static str {
        match self {
            Feature::Nrows => "Nrows",
            Feature::Ncols => "Ncols",
            Feature::Nnnz => "Nnnz",
            Feature::AvgNnnz => "AvgNnnz",
            Feature::Density => "Density",
            Feature::MaxRowNnnz => "MaxRowNnnz",
            Feature::MinRowNnnz => "MinRowNnnz",
            Feature::StdRowNnnz => "StdRowNnnz",
            Feature::NDiags => "NDiags",
            Feature::NTrueDiags => "NTrueDiags",
        }
    }
}

/// Fixed-length, immutable feature row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; NFEATURES],
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature as usize]
    }

    pub fn values(&self) -> &[f64; NFEATURES] {
        &self.values
    }

    pub fn names() -> [&'static str; NFEATURES] {
        Feature::ALL.map(Feature::name)
    }

    /// `(name, value)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::ALL.iter().map(move |&f| (f.name(), self.get(f)))
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "\t{:<12}: {}", name, value)?;
        }
        Ok(())
    }
}

/// Computes the feature vector of `a` in its current format
///
/// Pure: the matrix is only read, and two calls on the same matrix give
/// bit-identical results.
pub fn extract<T: Scalar>(a: &DynamicMatrix<T>) -> Result<FeatureVector, FeatureError> {
    let (nrows, ncols) = (a.nrows(), a.ncols());
    if nrows == 0 || ncols == 0 {
        return Err(FeatureError::EmptyMatrix { nrows, ncols });
    }

    let nnz_per_row = structure::count_nnz_per_row(a);
    let nnz_per_diag = structure::count_nnz_per_diagonal(a);

    let nnz = a.nnz() as f64;
    let avg = nnz / nrows as f64;

    let mut values = [0.0; NFEATURES];
    values[Feature::Nrows as usize] = nrows as f64;
    values[Feature::Ncols as usize] = ncols as f64;
    values[Feature::Nnnz as usize] = nnz;
    values[Feature::AvgNnnz as usize] = avg;
    values[Feature::Density as usize] = nnz / (nrows as f64 * ncols as f64);
    values[Feature::MaxRowNnnz as usize] = structure::max(&nnz_per_row) as f64;
    values[Feature::MinRowNnnz as usize] = structure::min(&nnz_per_row) as f64;
    values[Feature::StdRowNnnz as usize] = structure::std(&nnz_per_row, avg);
    values[Feature::NDiags as usize] = structure::count_nonzero_above(&nnz_per_diag, 0) as f64;
    values[Feature::NTrueDiags as usize] =
        structure::count_nonzero_above(&nnz_per_diag, true_diagonal_threshold(nrows)) as f64;

    let features = FeatureVector { values };
    debug!(format = %a.active_format(), ?features, "extracted features");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{CooMatrix, CsrMatrix};

    #[test]
    fn test_identity_pattern() {
        let a: DynamicMatrix<f64> = CsrMatrix::identity(4).into();
        let f = extract(&a).unwrap();

        assert_eq!(
            f.values(),
            &[4.0, 4.0, 4.0, 1.0, 0.25, 1.0, 1.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_dense_block() {
        let triplets = (0..3).flat_map(|i| (0..3).map(move |j| (i, j, 1.0))).collect();
        let a: DynamicMatrix<f64> = CooMatrix::from_triplets(3, 3, triplets).into();
        let f = extract(&a).unwrap();

        assert_eq!(f.get(Feature::Density), 1.0);
        assert_eq!(f.get(Feature::MaxRowNnnz), 3.0);
        assert_eq!(f.get(Feature::MinRowNnnz), 3.0);
        assert_eq!(f.get(Feature::StdRowNnnz), 0.0);
        assert_eq!(f.get(Feature::NDiags), 5.0);
        // threshold 3 / 5 = 0, every occupied diagonal is "true"
        assert_eq!(f.get(Feature::NTrueDiags), 5.0);
    }

    #[test]
    fn test_true_diagonal_threshold_is_strict() {
        // 10 rows → threshold 2; main diagonal full, one diagonal with exactly 2
        let mut triplets: Vec<_> = (0..10).map(|i| (i, i, 1.0)).collect();
        triplets.push((0, 5, 1.0));
        triplets.push((1, 6, 1.0));
        let a: DynamicMatrix<f64> = CooMatrix::from_triplets(10, 10, triplets).into();
        let f = extract(&a).unwrap();

        assert_eq!(f.get(Feature::NDiags), 2.0);
        assert_eq!(f.get(Feature::NTrueDiags), 1.0);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let a: DynamicMatrix<f64> = CooMatrix::zeros(0, 0).into();
        assert_eq!(
            extract(&a),
            Err(FeatureError::EmptyMatrix { nrows: 0, ncols: 0 })
        );

        let a: DynamicMatrix<f64> = CooMatrix::zeros(3, 0).into();
        assert!(extract(&a).is_err());
    }

    #[test]
    fn test_all_zero_rows_allowed() {
        let a: DynamicMatrix<f64> = CooMatrix::zeros(4, 4).into();
        let f = extract(&a).unwrap();

        assert_eq!(f.get(Feature::Nnnz), 0.0);
        assert_eq!(f.get(Feature::Density), 0.0);
        assert_eq!(f.get(Feature::NDiags), 0.0);
    }

    #[test]
    fn test_names_in_order() {
        assert_eq!(
            FeatureVector::names(),
            [
                "Nrows", "Ncols", "Nnnz", "AvgNnnz", "Density",
                "MaxRowNnnz", "MinRowNnnz", "StdRowNnnz", "NDiags", "NTrueDiags"
            ]
        );
    }
}
