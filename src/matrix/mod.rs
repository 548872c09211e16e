// Matrix data structures, the format catalog and conversions

pub mod config;
pub mod conversion;
pub mod coo;
pub mod csr;
pub mod dia;
pub mod dynamic;
pub mod ell;
pub mod format;
pub mod hdc;
pub mod hyb;

use num_traits::Num;
use std::fmt;
use std::ops::AddAssign;

pub use config::{ConversionLimits, ExecutionSpace, SpmvUpdate, TuneConfig};
pub use coo::CooMatrix;
pub use csr::CsrMatrix;
pub use dia::DiaMatrix;
pub use dynamic::DynamicMatrix;
pub use ell::EllMatrix;
pub use format::FormatId;
pub use hdc::HdcMatrix;
pub use hyb::HybMatrix;

/// Value type stored in every container
pub trait Scalar: Copy + Num + AddAssign + Send + Sync + fmt::Debug + 'static {}

impl<T> Scalar for T where T: Copy + Num + AddAssign + Send + Sync + fmt::Debug + 'static {}

/// Behaviour shared by every concrete storage format
pub trait SparseStorage<T: Scalar> {
    /// The catalog entry this container implements
    const FORMAT: FormatId;

    fn n_rows(&self) -> usize;

    fn n_cols(&self) -> usize;

    /// Number of stored nonzeros, padding excluded
    fn nnz(&self) -> usize;

    /// Expands the container into row-major sorted coordinates
    fn to_coo(&self) -> CooMatrix<T>;

    /// Reallocates every buffer to the sizes used by `other`, zero-filled
    fn resize_like(&mut self, other: &Self);
}
