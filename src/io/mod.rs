//! File input and report output

pub mod matrix_market;
pub mod report;

pub use matrix_market::{parse_matrix_market, read_matrix_market, write_matrix_market};
pub use report::{ensure_output_dir, write_features_csv, write_runtime_csv};
