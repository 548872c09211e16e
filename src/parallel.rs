//! # Parallel SpMV kernels
//!
//! Row-partitioned kernels for `ExecutionSpace::Threads`, run on whatever
//! rayon pool is current (the one installed by `Runtime`). Each output row
//! is written by exactly one task, so no synchronization is needed on `y`.

use rayon::prelude::*;

use crate::constants::PAR_CHUNKS_PER_THREAD;
use crate::matrix::{CooMatrix, DynamicMatrix, Scalar, SpmvUpdate};
use crate::spmv::{write, RowKernel};

/// Parallel counterpart of the serial dispatch in `crate::spmv`
///
/// Shapes must already be checked by the caller.
pub(crate) fn multiply_parallel<T: Scalar>(
    a: &DynamicMatrix<T>,
    x: &[T],
    y: &mut [T],
    update: SpmvUpdate,
) {
    match a {
        DynamicMatrix::Coo(m) => coo_parallel(m, x, y, update),
        DynamicMatrix::Csr(m) => rows_parallel(m, x, y, update),
        DynamicMatrix::Dia(m) => rows_parallel(m, x, y, update),
        DynamicMatrix::Ell(m) => rows_parallel(m, x, y, update),
        DynamicMatrix::Hyb(m) => {
            rows_parallel(&m.ell, x, y, update);
            coo_parallel(&m.coo, x, y, SpmvUpdate::Accumulate);
        }
        DynamicMatrix::Hdc(m) => {
            rows_parallel(&m.dia, x, y, update);
            rows_parallel(&m.csr, x, y, SpmvUpdate::Accumulate);
        }
    }
}

fn rows_parallel<T: Scalar, K: RowKernel<T>>(m: &K, x: &[T], y: &mut [T], update: SpmvUpdate) {
    y.par_iter_mut()
        .enumerate()
        .for_each(|(i, yi)| write(update, yi, m.row_dot(i, x)));
}

/// COO entries are row-sorted, so each chunk of `y` owns a contiguous run
/// of triplets found by binary search
fn coo_parallel<T: Scalar>(m: &CooMatrix<T>, x: &[T], y: &mut [T], update: SpmvUpdate) {
    let n_rows = y.len();
    if n_rows == 0 {
        return;
    }
    let chunk_rows = (n_rows / (rayon::current_num_threads() * PAR_CHUNKS_PER_THREAD)).max(1);

    y.par_chunks_mut(chunk_rows)
        .enumerate()
        .for_each(|(chunk, ys)| {
            let first = chunk * chunk_rows;
            let last = first + ys.len();

            if update == SpmvUpdate::Overwrite {
                ys.fill(T::zero());
            }

            let mut k = m.row_idx.partition_point(|&r| r < first);
            while k < m.row_idx.len() && m.row_idx[k] < last {
                ys[m.row_idx[k] - first] += m.values[k] * x[m.col_idx[k]];
                k += 1;
            }
        });
}

#[cfg(test)]
mod tests {
    use crate::matrix::{ConversionLimits, CooMatrix, DynamicMatrix, ExecutionSpace, FormatId, SpmvUpdate};
    use crate::spmv::multiply;

    fn banded(n: usize) -> DynamicMatrix<f64> {
        let mut triplets = Vec::new();
        for i in 0..n {
            for j in i.saturating_sub(2)..(i + 3).min(n) {
                triplets.push((i, j, (i * n + j) as f64 * 0.01));
            }
        }
        CooMatrix::from_triplets(n, n, triplets).into()
    }

    #[test]
    fn test_parallel_matches_serial() {
        let limits = ConversionLimits {
            hyb_breakeven_threshold: 0,
            ..ConversionLimits::default()
        };
        let x: Vec<f64> = (0..300).map(|j| 1.0 + j as f64 * 0.5).collect();

        for fmt in FormatId::ALL {
            let mut a = banded(300);
            a.convert_to(fmt, &limits).unwrap();

            let mut serial = vec![1.0; 300];
            let mut threads = vec![1.0; 300];
            multiply(ExecutionSpace::Serial, &a, &x, &mut serial, SpmvUpdate::Accumulate).unwrap();
            multiply(ExecutionSpace::Threads, &a, &x, &mut threads, SpmvUpdate::Accumulate).unwrap();

            for (s, t) in serial.iter().zip(&threads) {
                assert!((s - t).abs() < 1e-9, "format {}: {} vs {}", fmt, s, t);
            }
        }
    }
}
