//! Centralized constants for the sparsetune library
//!
//! All hardcoded tuning and feature constants live here rather than being
//! scattered throughout the code.

// ============================================================================
// FORMAT CATALOG
// ============================================================================

/// Number of storage formats in the catalog
pub const NFORMATS: usize = 6;

/// Marker stored in padded ELL / DIA slots that hold no entry
pub const INVALID_INDEX: usize = usize::MAX;

// ============================================================================
// CONVERSION LIMITS
// ============================================================================

/// Maximum ratio of stored slots to nonzeros accepted when converting to DIA
pub const DIA_MAX_FILL: f64 = 3.0;

/// Maximum ratio of stored slots to nonzeros accepted when converting to ELL
pub const ELL_MAX_FILL: f64 = 3.0;

/// Padded slot count up to which DIA and ELL accept any fill ratio
pub const FILL_SIZE_THRESHOLD: usize = 1_000_000;

/// Relative speed of the ELL part over the COO part in a HYB matrix
pub const HYB_RELATIVE_SPEED: f64 = 3.0;

/// Row count below which HYB keeps every overflowing row in COO
pub const HYB_BREAKEVEN_THRESHOLD: usize = 4096;

// ============================================================================
// STRUCTURAL FEATURES
// ============================================================================

/// A diagonal is "true" when its count exceeds `nrows / TRUE_DIAG_DIVISOR`
pub const TRUE_DIAG_DIVISOR: usize = 5;

/// Number of structural features extracted per matrix
pub const NFEATURES: usize = 10;

// ============================================================================
// BENCHMARK DEFAULTS
// ============================================================================

/// Default repetitions per format
pub const DEFAULT_REPETITIONS: usize = 10;

/// Row chunks handed to each worker by the parallel COO kernel
pub const PAR_CHUNKS_PER_THREAD: usize = 4;

// ============================================================================
// REPORT FILES
// ============================================================================

/// File written by the feature extraction driver
pub const FEATURES_FILENAME: &str = "features.csv";

/// File written by the SpMV benchmark driver
pub const RUNTIME_FILENAME: &str = "runtime.csv";
