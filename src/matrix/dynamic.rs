//! A matrix container holding exactly one active storage format

use tracing::debug;

use crate::error::{ConversionError, MatrixError};
use crate::matrix::{
    ConversionLimits, CooMatrix, CsrMatrix, DiaMatrix, EllMatrix, FormatId, HdcMatrix, HybMatrix,
    Scalar, SparseStorage,
};

/// Tagged variant over every format in the catalog
///
/// Switching formats replaces the whole payload, so exactly one layout is
/// live at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicMatrix<T> {
    Coo(CooMatrix<T>),
    Csr(CsrMatrix<T>),
    Dia(DiaMatrix<T>),
    Ell(EllMatrix<T>),
    Hyb(HybMatrix<T>),
    Hdc(HdcMatrix<T>),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            DynamicMatrix::Coo($m) => $body,
            DynamicMatrix::Csr($m) => $body,
            DynamicMatrix::Dia($m) => $body,
            DynamicMatrix::Ell($m) => $body,
            DynamicMatrix::Hyb($m) => $body,
            DynamicMatrix::Hdc($m) => $body,
        }
    };
}

impl<T: Scalar> DynamicMatrix<T> {
    /// An empty container of the given format
    pub fn zeros(format: FormatId, n_rows: usize, n_cols: usize) -> Self {
        match format {
            FormatId::Coo => DynamicMatrix::Coo(CooMatrix::zeros(n_rows, n_cols)),
            FormatId::Csr => DynamicMatrix::Csr(CsrMatrix::zeros(n_rows, n_cols)),
            FormatId::Dia => DynamicMatrix::Dia(DiaMatrix::zeros(n_rows, n_cols)),
            FormatId::Ell => DynamicMatrix::Ell(EllMatrix::zeros(n_rows, n_cols)),
            FormatId::Hyb => DynamicMatrix::Hyb(HybMatrix::zeros(n_rows, n_cols)),
            FormatId::Hdc => DynamicMatrix::Hdc(HdcMatrix::zeros(n_rows, n_cols)),
        }
    }

    pub fn nrows(&self) -> usize {
        dispatch!(self, m => m.n_rows())
    }

    pub fn ncols(&self) -> usize {
        dispatch!(self, m => m.n_cols())
    }

    pub fn nnz(&self) -> usize {
        dispatch!(self, m => m.nnz())
    }

    pub fn active_format(&self) -> FormatId {
        match self {
            DynamicMatrix::Coo(_) => FormatId::Coo,
            DynamicMatrix::Csr(_) => FormatId::Csr,
            DynamicMatrix::Dia(_) => FormatId::Dia,
            DynamicMatrix::Ell(_) => FormatId::Ell,
            DynamicMatrix::Hyb(_) => FormatId::Hyb,
            DynamicMatrix::Hdc(_) => FormatId::Hdc,
        }
    }

    /// Expands the active payload into sorted coordinates
    pub fn to_coo(&self) -> CooMatrix<T> {
        dispatch!(self, m => m.to_coo())
    }

    /// Makes `format` the active format, dropping the current contents
    ///
    /// The shape is kept; buffers are empty until `resize_like`.
    pub fn activate(&mut self, format: FormatId) {
        if self.active_format() != format {
            *self = Self::zeros(format, self.nrows(), self.ncols());
        }
    }

    /// Sizes every buffer after `other`, which must hold the same format
    pub fn resize_like(&mut self, other: &Self) -> Result<(), MatrixError> {
        match (self, other) {
            (DynamicMatrix::Coo(a), DynamicMatrix::Coo(b)) => a.resize_like(b),
            (DynamicMatrix::Csr(a), DynamicMatrix::Csr(b)) => a.resize_like(b),
            (DynamicMatrix::Dia(a), DynamicMatrix::Dia(b)) => a.resize_like(b),
            (DynamicMatrix::Ell(a), DynamicMatrix::Ell(b)) => a.resize_like(b),
            (DynamicMatrix::Hyb(a), DynamicMatrix::Hyb(b)) => a.resize_like(b),
            (DynamicMatrix::Hdc(a), DynamicMatrix::Hdc(b)) => a.resize_like(b),
            (a, b) => {
                return Err(MatrixError::FormatMismatch {
                    expected: a.active_format(),
                    found: b.active_format(),
                })
            }
        }
        Ok(())
    }

    /// Copies the contents of `other` into this container
    ///
    /// Both must hold the same format; the destination must already be sized
    /// with `resize_like`.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), MatrixError> {
        if self.active_format() != other.active_format() {
            return Err(MatrixError::FormatMismatch {
                expected: self.active_format(),
                found: other.active_format(),
            });
        }
        if self.nrows() != other.nrows() {
            return Err(MatrixError::DimensionMismatch {
                operation: "copy",
                expected: other.nrows(),
                actual: self.nrows(),
            });
        }
        self.clone_from(other);
        Ok(())
    }

    /// Converts the payload to `format` in place
    ///
    /// On failure the matrix is left in its previous format.
    pub fn convert_to(&mut self, format: FormatId, limits: &ConversionLimits) -> Result<(), ConversionError> {
        let from = self.active_format();
        if from == format {
            return Ok(());
        }

        let coo = self.to_coo();
        let converted = match format {
            FormatId::Coo => DynamicMatrix::Coo(coo),
            FormatId::Csr => DynamicMatrix::Csr(CsrMatrix::from_coo(&coo)),
            FormatId::Dia => DynamicMatrix::Dia(DiaMatrix::from_coo(&coo, limits)?),
            FormatId::Ell => DynamicMatrix::Ell(EllMatrix::from_coo(&coo, limits)?),
            FormatId::Hyb => DynamicMatrix::Hyb(HybMatrix::from_coo(&coo, limits)),
            FormatId::Hdc => DynamicMatrix::Hdc(HdcMatrix::from_coo(&coo)),
        };

        debug!(%from, to = %format, nnz = converted.nnz(), "converted matrix");
        *self = converted;
        Ok(())
    }
}

impl<T: Scalar> From<CooMatrix<T>> for DynamicMatrix<T> {
    fn from(m: CooMatrix<T>) -> Self {
        DynamicMatrix::Coo(m)
    }
}

impl<T: Scalar> From<CsrMatrix<T>> for DynamicMatrix<T> {
    fn from(m: CsrMatrix<T>) -> Self {
        DynamicMatrix::Csr(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize) -> DynamicMatrix<f64> {
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 2.0));
            if i > 0 {
                triplets.push((i, i - 1, -1.0));
            }
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
            }
        }
        CooMatrix::from_triplets(n, n, triplets).into()
    }

    #[test]
    fn test_convert_through_every_format() {
        let original = tridiagonal(8);
        let limits = ConversionLimits::default();
        let mut m = original.clone();

        for fmt in FormatId::ALL {
            m.convert_to(fmt, &limits).unwrap();
            assert_eq!(m.active_format(), fmt);
            assert_eq!(m.nnz(), original.nnz());
            assert_eq!(m.to_coo(), original.to_coo());
        }
    }

    #[test]
    fn test_failed_conversion_keeps_format() {
        // One dense row makes ELL padding explode
        let mut triplets: Vec<_> = (0..40).map(|j| (0, j, 1.0)).collect();
        triplets.extend((1..40).map(|i| (i, i, 1.0)));
        let mut m: DynamicMatrix<f64> = CooMatrix::from_triplets(40, 40, triplets).into();
        m.convert_to(FormatId::Csr, &ConversionLimits::default()).unwrap();

        let strict = ConversionLimits {
            fill_size_threshold: 0,
            ..ConversionLimits::default()
        };
        assert!(m.convert_to(FormatId::Ell, &strict).is_err());
        assert_eq!(m.active_format(), FormatId::Csr);
    }

    #[test]
    fn test_activate_resize_copy() {
        let mut host = tridiagonal(5);
        host.convert_to(FormatId::Dia, &ConversionLimits::default()).unwrap();

        let mut device = tridiagonal(5);
        assert!(device.resize_like(&host).is_err());

        device.activate(host.active_format());
        assert_eq!(device.nnz(), 0);
        device.resize_like(&host).unwrap();
        device.copy_from(&host).unwrap();
        assert_eq!(device, host);
    }
}
