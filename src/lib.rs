//! # sparsetune: structural features and SpMV format selection
//!
//! Tools for studying which sparse storage format gives the fastest
//! sparse matrix-vector multiply (SpMV) for a given matrix.
//!
//! ## Overview
//!
//! - **Feature extraction**: ten scalars summarizing the nonzero pattern
//!   (shape, row-length statistics, diagonal occupancy), computed on any
//!   storage format.
//! - **Benchmark harness**: converts a matrix to every format in the
//!   catalog (COO, CSR, DIA, ELL, HYB, HDC), times repeated SpMV calls and
//!   records a timing table.
//! - **Selector**: averages the timings and picks the fastest format.
//!
//! ## Usage
//!
//! ```
//! use sparsetune::{extract, tune, CooMatrix, DynamicMatrix, Feature, TuneConfig};
//!
//! let coo = CooMatrix::from_triplets(3, 3, vec![(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0)]);
//! let mut a: DynamicMatrix<f64> = coo.into();
//!
//! let features = extract(&a).unwrap();
//! assert_eq!(features.get(Feature::NDiags), 1.0);
//!
//! let config = TuneConfig::with_repetitions(2).unwrap();
//! let selection = tune(&mut a, &config).unwrap();
//! assert!(selection.averages.get(selection.format).is_some());
//! ```

pub mod constants;
pub mod error;
pub mod features;
pub mod io;
pub mod matrix;
pub mod parallel;
pub mod runtime;
pub mod spmv;
pub mod structure;
pub mod tuning;
pub mod utils;

// Re-export primary components
pub use error::{
    ConversionError, FeatureError, MatrixError, ParseError, ReportError, RuntimeError, SelectError,
    TuneError,
};
pub use features::{extract, Feature, FeatureVector};
pub use matrix::{
    ConversionLimits, CooMatrix, CsrMatrix, DiaMatrix, DynamicMatrix, EllMatrix, ExecutionSpace,
    FormatId, HdcMatrix, HybMatrix, Scalar, SparseStorage, SpmvUpdate, TuneConfig,
};
pub use runtime::{Runtime, RuntimeConfig};
pub use spmv::multiply;
pub use tuning::{benchmark, select, tune, AverageTimings, Selection, SpmvBenchmark, TimingTable};
pub use utils::{from_sprs_csr, reference_spmv, to_sprs_csr};

/// Version information for the sparsetune library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
