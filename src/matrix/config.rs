//! Configuration for conversions and the SpMV benchmark

use crate::constants::*;
use crate::error::TuneError;

/// Where kernels run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionSpace {
    /// On the calling thread
    #[default]
    Serial,
    /// Row-partitioned across the rayon thread pool
    Threads,
}

impl ExecutionSpace {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionSpace::Serial => "serial",
            ExecutionSpace::Threads => "threads",
        }
    }

    /// Check if kernels in this space fan out across threads
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionSpace::Threads)
    }
}

impl std::str::FromStr for ExecutionSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(ExecutionSpace::Serial),
            "threads" | "openmp" => Ok(ExecutionSpace::Threads),
            other => Err(format!("unknown execution space '{}' (expected serial or threads)", other)),
        }
    }
}

/// How an SpMV writes into `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpmvUpdate {
    /// `y = A * x`
    Overwrite,
    /// `y += A * x`
    #[default]
    Accumulate,
}

/// Fill tolerances applied when converting to padded formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionLimits {
    /// Max stored slots per nonzero for DIA
    pub dia_max_fill: f64,
    /// Max stored slots per nonzero for ELL
    pub ell_max_fill: f64,
    /// Layouts with at most this many padded slots skip the fill checks
    pub fill_size_threshold: usize,
    /// Speed of the HYB ELL part relative to its COO part
    pub hyb_relative_speed: f64,
    /// Rows overflowing the HYB ELL width tolerated before widening it
    pub hyb_breakeven_threshold: usize,
}

impl Default for ConversionLimits {
    fn default() -> Self {
        Self {
            dia_max_fill: DIA_MAX_FILL,
            ell_max_fill: ELL_MAX_FILL,
            fill_size_threshold: FILL_SIZE_THRESHOLD,
            hyb_relative_speed: HYB_RELATIVE_SPEED,
            hyb_breakeven_threshold: HYB_BREAKEVEN_THRESHOLD,
        }
    }
}

/// Configuration for one benchmark sweep
#[derive(Debug, Clone)]
pub struct TuneConfig {
    /// Timed SpMV invocations per format
    pub repetitions: usize,

    /// Write mode of every timed SpMV; `y` is never reset between repetitions
    pub update: SpmvUpdate,

    /// Execution space of the timed kernels
    pub exec: ExecutionSpace,

    /// Conversion tolerances
    pub limits: ConversionLimits,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            update: SpmvUpdate::default(),
            exec: ExecutionSpace::default(),
            limits: ConversionLimits::default(),
        }
    }
}

impl TuneConfig {
    /// Create a config with the given repetition count
    pub fn with_repetitions(repetitions: usize) -> Result<Self, TuneError> {
        Self::default().repetitions(repetitions)
    }

    pub fn repetitions(mut self, repetitions: usize) -> Result<Self, TuneError> {
        if repetitions == 0 {
            return Err(TuneError::InvalidRepetitions(repetitions));
        }
        self.repetitions = repetitions;
        Ok(self)
    }

    pub fn update(mut self, update: SpmvUpdate) -> Self {
        self.update = update;
        self
    }

    pub fn exec(mut self, exec: ExecutionSpace) -> Self {
        self.exec = exec;
        self
    }

    pub fn limits(mut self, limits: ConversionLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_repetitions_rejected() {
        assert_eq!(
            TuneConfig::with_repetitions(0).unwrap_err(),
            TuneError::InvalidRepetitions(0)
        );
    }

    #[test]
    fn test_defaults() {
        let config = TuneConfig::default();
        assert_eq!(config.update, SpmvUpdate::Accumulate);
        assert_eq!(config.exec, ExecutionSpace::Serial);
        assert_eq!(config.limits.dia_max_fill, 3.0);
    }

    #[test]
    fn test_execution_space_from_str() {
        assert_eq!("serial".parse(), Ok(ExecutionSpace::Serial));
        assert_eq!("Threads".parse(), Ok(ExecutionSpace::Threads));
        assert!("cuda".parse::<ExecutionSpace>().is_err());
    }
}
