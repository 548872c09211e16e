//! Integration tests for Matrix Market input and output

use std::fs;

use sparsetune::io::{read_matrix_market, write_matrix_market};
use sparsetune::{extract, CooMatrix, DynamicMatrix, Feature, FormatId, ParseError};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), contents).unwrap();
    file
}

#[test]
fn test_read_general_matrix() {
    let file = write_temp(
        "%%MatrixMarket matrix coordinate real general\n\
         % 4x4 with an empty row\n\
         4 4 4\n\
         1 1 1.5\n\
         1 4 -2.0\n\
         3 2 3.0\n\
         4 4 1e2\n",
    );

    let a = read_matrix_market(file.path()).unwrap();
    assert_eq!(a.active_format(), FormatId::Coo);
    assert_eq!((a.nrows(), a.ncols(), a.nnz()), (4, 4, 4));

    let coo = a.to_coo();
    assert_eq!(coo.values, vec![1.5, -2.0, 3.0, 100.0]);

    let f = extract(&a).unwrap();
    assert_eq!(f.get(Feature::MinRowNnnz), 0.0);
}

#[test]
fn test_symmetric_file_expands_both_halves() {
    let file = write_temp(
        "%%MatrixMarket matrix coordinate real symmetric\n\
         3 3 4\n\
         1 1 4.0\n\
         2 1 1.0\n\
         2 2 4.0\n\
         3 2 1.0\n",
    );

    let coo = read_matrix_market(file.path()).unwrap().to_coo();
    assert_eq!(coo.row_idx, vec![0, 0, 1, 1, 1, 2]);
    assert_eq!(coo.col_idx, vec![0, 1, 0, 1, 2, 1]);
}

#[test]
fn test_write_then_read() {
    let original = CooMatrix::from_triplets(
        3,
        5,
        vec![(0, 4, 0.25), (1, 0, -7.0), (2, 2, 3.5)],
    );
    let file = tempfile::NamedTempFile::new().unwrap();

    write_matrix_market(file.path(), &DynamicMatrix::from(original.clone())).unwrap();
    let text = fs::read_to_string(file.path()).unwrap();
    assert!(text.starts_with("%%MatrixMarket matrix coordinate real general\n3 5 3\n"));

    let reloaded = read_matrix_market(file.path()).unwrap();
    assert_eq!(reloaded.to_coo(), original);
}

#[test]
fn test_unsupported_file_is_distinguishable() {
    let file = write_temp("%%MatrixMarket matrix array real general\n2 2\n1.0\n0.0\n0.0\n1.0\n");
    match read_matrix_market(file.path()) {
        Err(ParseError::Unsupported(what)) => assert!(what.contains("array")),
        other => panic!("expected Unsupported, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mtx");
    assert!(matches!(
        read_matrix_market(&missing),
        Err(ParseError::Open { .. })
    ));
}
