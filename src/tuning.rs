//! # SpMV format autotuning
//!
//! The benchmark harness converts a host mirror of the matrix to every
//! format in catalog order, stages each successful conversion onto the
//! device matrix and times `repetitions` SpMV calls. The selector averages
//! the timings and picks the fastest format.
//!
//! ## Sweep invariants
//!
//! - Formats are visited in ascending [`FormatId`] order, repetitions run
//!   strictly one after another.
//! - `x` is filled with 2 and `y` starts at zero; `y` is shared by every
//!   repetition of every format and is never reset, so with
//!   [`SpmvUpdate::Accumulate`] each call adds `A * x` on top of the
//!   previous result and the accumulate path is what gets timed.
//! - A format that fails to convert keeps `None` in all of its cells and is
//!   skipped; it never aborts the sweep.
//! - Afterwards the device matrix holds the last format that converted,
//!   not the selected one.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::constants::NFORMATS;
use crate::error::{SelectError, TuneError};
use crate::matrix::{DynamicMatrix, FormatId, Scalar, TuneConfig};
use crate::spmv::multiply;

/// Wall-clock seconds per `(format, repetition)`, `None` until measured
#[derive(Debug, Clone, PartialEq)]
pub struct TimingTable {
    repetitions: usize,
    cells: Vec<Option<f64>>,
}

impl TimingTable {
    /// A table with every cell unmeasured
    pub fn new(repetitions: usize) -> Self {
        Self {
            repetitions,
            cells: vec![None; NFORMATS * repetitions],
        }
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Measured seconds, `None` when unmeasured or `rep` is out of range
    pub fn get(&self, format: FormatId, rep: usize) -> Option<f64> {
        if rep >= self.repetitions {
            return None;
        }
        self.cells[self.cell(format, rep)]
    }

    /// Records one measurement
    ///
    /// # Panics
    ///
    /// Panics if `rep` is not below [`TimingTable::repetitions`].
    pub fn set(&mut self, format: FormatId, rep: usize, seconds: f64) {
        assert!(
            rep < self.repetitions,
            "repetition {} out of range for a table of {}",
            rep,
            self.repetitions
        );
        let cell = self.cell(format, rep);
        self.cells[cell] = Some(seconds);
    }

    fn cell(&self, format: FormatId, rep: usize) -> usize {
        format.index() * self.repetitions + rep
    }

    /// All repetitions of one format
    pub fn row(&self, format: FormatId) -> &[Option<f64>] {
        let start = format.index() * self.repetitions;
        &self.cells[start..start + self.repetitions]
    }

    /// Mean over the measured repetitions of each format
    pub fn averages(&self) -> AverageTimings {
        let means = FormatId::ALL
            .iter()
            .map(|&fmt| {
                let measured: Vec<f64> = self.row(fmt).iter().flatten().copied().collect();
                if measured.is_empty() {
                    None
                } else {
                    Some(measured.iter().sum::<f64>() / measured.len() as f64)
                }
            })
            .collect();
        AverageTimings(means)
    }
}

/// Mean seconds per format in catalog order, `None` for unmeasured formats
#[derive(Debug, Clone, PartialEq)]
pub struct AverageTimings(Vec<Option<f64>>);

impl AverageTimings {
    pub fn get(&self, format: FormatId) -> Option<f64> {
        self.0[format.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormatId, Option<f64>)> + '_ {
        FormatId::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

/// Outcome of the format selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub averages: AverageTimings,
    /// Format with the smallest average
    pub format: FormatId,
}

/// Picks the format with the smallest mean time
///
/// Formats are scanned in ascending id order with a strict less-than, so
/// the lowest id wins a tie. Deterministic for a given table.
pub fn select(table: &TimingTable) -> Result<Selection, SelectError> {
    let averages = table.averages();

    let mut best: Option<(FormatId, f64)> = None;
    for (fmt, avg) in averages.iter() {
        if let Some(t) = avg {
            if best.map_or(true, |(_, min)| t < min) {
                best = Some((fmt, t));
            }
        }
    }

    let (format, seconds) = best.ok_or(SelectError::NoFormatAvailable)?;
    debug!(%format, seconds, "selected format");
    Ok(Selection { averages, format })
}

/// Owns the dense vectors of one benchmark sweep
///
/// A harness and the matrix it runs on must not be shared between
/// concurrent sweeps; independent matrices can be tuned in parallel, each
/// with its own harness.
pub struct SpmvBenchmark<T> {
    config: TuneConfig,
    x: Vec<T>,
    y: Vec<T>,
}

impl<T: Scalar> SpmvBenchmark<T> {
    /// Allocates `x = 2` and `y = 0` sized for `a`
    pub fn new(a: &DynamicMatrix<T>, config: TuneConfig) -> Result<Self, TuneError> {
        if config.repetitions == 0 {
            return Err(TuneError::InvalidRepetitions(config.repetitions));
        }
        let two = T::one() + T::one();
        Ok(Self {
            config,
            x: vec![two; a.ncols()],
            y: vec![T::zero(); a.nrows()],
        })
    }

    /// The output vector after the sweep so far
    pub fn output(&self) -> &[T] {
        &self.y
    }

    /// Sweeps every format, leaving `device` in the last converted format
    pub fn run(&mut self, device: &mut DynamicMatrix<T>) -> Result<TimingTable, TuneError> {
        let reps = self.config.repetitions;
        let mut table = TimingTable::new(reps);
        let mut host = device.clone();

        for fmt in FormatId::ALL {
            let from = host.active_format();
            if let Err(e) = host.convert_to(fmt, &self.config.limits) {
                warn!(%from, to = %fmt, error = %e, "conversion failed, skipping format");
                continue;
            }

            device.activate(fmt);
            device.resize_like(&host)?;
            device.copy_from(&host)?;

            for rep in 0..reps {
                let start = Instant::now();
                multiply(self.config.exec, device, &self.x, &mut self.y, self.config.update)?;
                table.set(fmt, rep, start.elapsed().as_secs_f64());
            }

            info!(
                format = %fmt,
                reps,
                exec = self.config.exec.name(),
                "benchmarked format"
            );
        }

        Ok(table)
    }
}

/// Times SpMV on every format of `device`
pub fn benchmark<T: Scalar>(device: &mut DynamicMatrix<T>, config: &TuneConfig) -> Result<TimingTable, TuneError> {
    SpmvBenchmark::new(device, config.clone())?.run(device)
}

/// Benchmark followed by selection
pub fn tune<T: Scalar>(device: &mut DynamicMatrix<T>, config: &TuneConfig) -> Result<Selection, TuneError> {
    let table = benchmark(device, config)?;
    Ok(select(&table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{ConversionLimits, CooMatrix, SpmvUpdate};

    fn table_with(avgs: &[Option<f64>]) -> TimingTable {
        let mut table = TimingTable::new(2);
        for (fmt, avg) in FormatId::ALL.iter().zip(avgs) {
            if let Some(t) = avg {
                table.set(*fmt, 0, t * 0.5);
                table.set(*fmt, 1, t * 1.5);
            }
        }
        table
    }

    #[test]
    fn test_select_fastest() {
        let table = table_with(&[Some(0.02), Some(0.01), None, None, None, None]);
        let selection = select(&table).unwrap();

        assert_eq!(selection.format, FormatId::Csr);
        assert_eq!(selection.averages.get(FormatId::Dia), None);
        assert!((selection.averages.get(FormatId::Coo).unwrap() - 0.02).abs() < 1e-15);
    }

    #[test]
    fn test_select_tie_keeps_lowest_id() {
        let table = table_with(&[None, Some(0.5), Some(0.5), Some(0.5), None, None]);
        assert_eq!(select(&table).unwrap().format, FormatId::Csr);
        assert_eq!(select(&table), select(&table));
    }

    #[test]
    fn test_select_nothing_measured() {
        let table = TimingTable::new(3);
        assert_eq!(select(&table), Err(SelectError::NoFormatAvailable));
    }

    #[test]
    fn test_partial_rows_average_measured_cells() {
        let mut table = TimingTable::new(4);
        table.set(FormatId::Ell, 0, 1.0);
        table.set(FormatId::Ell, 2, 3.0);
        assert_eq!(table.averages().get(FormatId::Ell), Some(2.0));
    }

    #[test]
    fn test_out_of_range_repetition_never_aliases() {
        let mut table = TimingTable::new(2);
        table.set(FormatId::Csr, 0, 1.0);

        // Cell 2 of COO would be cell 0 of CSR
        assert_eq!(table.get(FormatId::Coo, 2), None);
        assert_eq!(table.get(FormatId::Hdc, 7), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_rejects_out_of_range_repetition() {
        let mut table = TimingTable::new(2);
        table.set(FormatId::Coo, 2, 1.0);
    }

    #[test]
    fn test_sweep_skips_failed_formats() {
        // Arrow pattern: DIA and ELL exceed the fill limits once small
        // layouts are no longer exempt
        let n = 30;
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 1.0));
            if i > 0 {
                triplets.push((0, i, 1.0));
                triplets.push((i, 0, 1.0));
            }
        }
        let mut a: DynamicMatrix<f64> = CooMatrix::from_triplets(n, n, triplets).into();
        let config = TuneConfig::with_repetitions(3).unwrap().limits(ConversionLimits {
            fill_size_threshold: 0,
            ..ConversionLimits::default()
        });

        let mut harness = SpmvBenchmark::new(&a, config).unwrap();
        let table = harness.run(&mut a).unwrap();

        for fmt in [FormatId::Coo, FormatId::Csr, FormatId::Hyb, FormatId::Hdc] {
            assert!(table.row(fmt).iter().all(|c| c.map_or(false, |t| t >= 0.0)));
        }
        for fmt in [FormatId::Dia, FormatId::Ell] {
            assert!(table.row(fmt).iter().all(Option::is_none));
        }
        assert_eq!(a.active_format(), FormatId::Hdc);

        // Four formats × three accumulating repetitions of y += A * 2
        assert_eq!(harness.output()[0], 12.0 * 2.0 * n as f64);
        assert_eq!(harness.output()[1], 12.0 * 2.0 * 2.0);

        let selection = select(&table).unwrap();
        assert!(selection.averages.get(selection.format).is_some());
    }

    #[test]
    fn test_overwrite_leaves_single_product() {
        let mut a: DynamicMatrix<f64> = CooMatrix::from_triplets(2, 2, vec![(0, 0, 1.0), (1, 1, 3.0)]).into();
        let config = TuneConfig::with_repetitions(2)
            .unwrap()
            .update(SpmvUpdate::Overwrite)
            .limits(ConversionLimits::default());

        let mut harness = SpmvBenchmark::new(&a, config).unwrap();
        harness.run(&mut a).unwrap();
        assert_eq!(harness.output(), &[2.0, 6.0]);
    }

    #[test]
    fn test_tune_selects_a_measured_format() {
        let mut a: DynamicMatrix<f64> = CooMatrix::from_triplets(2, 2, vec![(0, 0, 1.0)]).into();
        let config = TuneConfig::with_repetitions(1).unwrap();
        let selection = tune(&mut a, &config).unwrap();

        assert!(selection.averages.iter().all(|(_, avg)| avg.is_some()));
        assert!(selection.averages.get(selection.format).is_some());
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let mut a: DynamicMatrix<f64> = CooMatrix::zeros(2, 2).into();
        let config = TuneConfig {
            repetitions: 0,
            ..TuneConfig::default()
        };
        assert_eq!(benchmark(&mut a, &config), Err(TuneError::InvalidRepetitions(0)));
    }
}
