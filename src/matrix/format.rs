//! The closed, ordered catalog of storage formats

use std::fmt;

use crate::constants::NFORMATS;
use crate::error::MatrixError;

/// Identifier of a storage format
///
/// The discriminants define the total order used by the benchmark sweep and
/// the integer ids written to reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatId {
    /// Coordinate triplets
    Coo = 0,
    /// Compressed sparse row
    Csr = 1,
    /// Diagonal storage
    Dia = 2,
    /// ELLPACK
    Ell = 3,
    /// ELL + COO hybrid
    Hyb = 4,
    /// DIA + CSR hybrid
    Hdc = 5,
}

impl FormatId {
    /// Every format in ascending id order
    pub const ALL: [FormatId; NFORMATS] = [
        FormatId::Coo,
        FormatId::Csr,
        FormatId::Dia,
        FormatId::Ell,
        FormatId::Hyb,
        FormatId::Hdc,
    ];

    /// Integer index of this format in the catalog
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatId::Coo => "COO",
            FormatId::Csr => "CSR",
            FormatId::Dia => "DIA",
            FormatId::Ell => "ELL",
            FormatId::Hyb => "HYB",
            FormatId::Hdc => "HDC",
        }
    }
}

impl TryFrom<usize> for FormatId {
    type Error = MatrixError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        FormatId::ALL
            .get(idx)
            .copied()
            .ok_or(MatrixError::InvalidFormatId(idx, NFORMATS))
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
