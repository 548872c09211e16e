//! Error types for sparsetune.
//!
//! One enum per concern; the drivers map them onto exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::matrix::FormatId;

/// Errors raised by the matrix containers themselves
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// A format index outside the catalog
    #[error("invalid format id {0} (catalog holds {1} formats)")]
    InvalidFormatId(usize, usize),

    /// An operation needs both matrices in the same active format
    #[error("format mismatch: expected {expected}, found {found}")]
    FormatMismatch { expected: FormatId, found: FormatId },

    /// Vector lengths do not match the matrix shape
    #[error("dimension mismatch in {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Reasons a conversion to a target format is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The target layout would store too many padded slots
    #[error("{format} fill-in would exceed maximum tolerance ({slots} slots for {nnz} nonzeros, max fill {max_fill})")]
    ExcessiveFill {
        format: FormatId,
        slots: usize,
        nnz: usize,
        max_fill: f64,
    },
}

/// Matrix-Market reader failures
#[derive(Error, Debug)]
pub enum ParseError {
    /// Valid Matrix-Market header describing a variant the reader does not handle
    #[error("not supported: {0}")]
    Unsupported(String),

    /// Structurally broken input
    #[error("malformed Matrix Market input at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read matrix: {0}")]
    Io(#[from] std::io::Error),
}

/// Feature extraction failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Averages and densities are undefined without rows or columns
    #[error("cannot extract features from an empty matrix ({nrows} x {ncols})")]
    EmptyMatrix { nrows: usize, ncols: usize },
}

/// Benchmark harness failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuneError {
    #[error("repetitions must be at least 1, got {0}")]
    InvalidRepetitions(usize),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Format selection failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    /// Every format failed conversion, nothing was measured
    #[error("no format available: every conversion failed")]
    NoFormatAvailable,
}

/// Report emitter failures
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("output directory ({path}) was NOT created: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Runtime setup failures
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("invalid log filter: {0}")]
    LogFilter(String),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
