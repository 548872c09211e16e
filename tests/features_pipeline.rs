//! Integration tests for feature extraction across storage formats

use sparsetune::{
    extract, ConversionLimits, CooMatrix, DynamicMatrix, Feature, FeatureError, FormatId,
};

/// Creates a tridiagonal matrix with `2` on the diagonal and `-1` beside it
fn create_tridiagonal(n: usize) -> CooMatrix<f64> {
    let mut triplets = Vec::new();
    for i in 0..n {
        if i > 0 {
            triplets.push((i, i - 1, -1.0));
        }
        triplets.push((i, i, 2.0));
        if i + 1 < n {
            triplets.push((i, i + 1, -1.0));
        }
    }
    CooMatrix::from_triplets(n, n, triplets)
}

/// Creates a rectangular matrix with an irregular pattern
fn create_irregular() -> CooMatrix<f64> {
    // [ 1 0 2 0 0 0 ]
    // [ 0 3 0 0 4 0 ]
    // [ 0 0 0 0 0 0 ]
    // [ 6 0 0 7 0 8 ]
    CooMatrix::from_triplets(
        4,
        6,
        vec![
            (0, 0, 1.0),
            (0, 2, 2.0),
            (1, 1, 3.0),
            (1, 4, 4.0),
            (3, 0, 6.0),
            (3, 3, 7.0),
            (3, 5, 8.0),
        ],
    )
}

fn permissive_limits() -> ConversionLimits {
    ConversionLimits {
        dia_max_fill: 100.0,
        ell_max_fill: 100.0,
        hyb_breakeven_threshold: 0,
        ..ConversionLimits::default()
    }
}

#[test]
fn test_tridiagonal_features() {
    let n = 10;
    let a: DynamicMatrix<f64> = create_tridiagonal(n).into();
    let f = extract(&a).unwrap();

    assert_eq!(f.get(Feature::Nrows), 10.0);
    assert_eq!(f.get(Feature::Ncols), 10.0);
    assert_eq!(f.get(Feature::Nnnz), 28.0);
    assert!((f.get(Feature::AvgNnnz) - 2.8).abs() < 1e-12);
    assert!((f.get(Feature::Density) - 0.28).abs() < 1e-12);
    assert_eq!(f.get(Feature::MaxRowNnnz), 3.0);
    assert_eq!(f.get(Feature::MinRowNnnz), 2.0);
    // Two rows of 2 and eight of 3 around a mean of 2.8
    let expected_std = ((2.0 * 0.64 + 8.0 * 0.04) / 10.0f64).sqrt();
    assert!((f.get(Feature::StdRowNnnz) - expected_std).abs() < 1e-12);
    assert_eq!(f.get(Feature::NDiags), 3.0);
    assert_eq!(f.get(Feature::NTrueDiags), 3.0);
}

#[test]
fn test_features_independent_of_format() {
    let limits = permissive_limits();

    for coo in [create_tridiagonal(25), create_irregular()] {
        let reference = extract(&DynamicMatrix::from(coo.clone())).unwrap();

        for fmt in FormatId::ALL {
            let mut a: DynamicMatrix<f64> = coo.clone().into();
            a.convert_to(fmt, &limits).unwrap();
            assert_eq!(a.active_format(), fmt);
            assert_eq!(extract(&a).unwrap(), reference, "format {}", fmt);
        }
    }
}

#[test]
fn test_irregular_features() {
    let a: DynamicMatrix<f64> = create_irregular().into();
    let f = extract(&a).unwrap();

    assert_eq!(f.get(Feature::Nnnz), 7.0);
    assert_eq!(f.get(Feature::MaxRowNnnz), 3.0);
    assert_eq!(f.get(Feature::MinRowNnnz), 0.0);
    // Offsets -3, 0, 2 (twice), 3; threshold 4 / 5 = 0
    assert_eq!(f.get(Feature::NDiags), 4.0);
    assert_eq!(f.get(Feature::NTrueDiags), 4.0);
}

#[test]
fn test_extraction_is_pure() {
    let mut a: DynamicMatrix<f64> = create_irregular().into();
    a.convert_to(FormatId::Hyb, &permissive_limits()).unwrap();
    let before = a.clone();

    let first = extract(&a).unwrap();
    let second = extract(&a).unwrap();

    assert_eq!(first, second);
    assert_eq!(a, before);
}

#[test]
fn test_empty_matrix_is_an_error() {
    let a: DynamicMatrix<f64> = CooMatrix::zeros(0, 5).into();
    assert_eq!(
        extract(&a),
        Err(FeatureError::EmptyMatrix { nrows: 0, ncols: 5 })
    );
}
