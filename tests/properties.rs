//! Property-based tests for structural counts, features and selection

use proptest::prelude::*;

use sparsetune::structure::{count_nnz_per_diagonal, count_nnz_per_row};
use sparsetune::{
    extract, select, ConversionLimits, CooMatrix, DynamicMatrix, Feature, FormatId, TimingTable,
};

/// Random matrix up to 24x24 with small integer values
fn arb_matrix() -> impl Strategy<Value = CooMatrix<f64>> {
    (1usize..24, 1usize..24).prop_flat_map(|(rows, cols)| {
        prop::collection::vec((0..rows, 0..cols, 1i32..10), 0..80).prop_map(move |entries| {
            let triplets = entries
                .into_iter()
                .map(|(r, c, v)| (r, c, v as f64))
                .collect();
            CooMatrix::from_triplets(rows, cols, triplets)
        })
    })
}

/// Matrix whose rows all hold the same number of nonzeros
fn arb_uniform_rows() -> impl Strategy<Value = CooMatrix<f64>> {
    (1usize..24, 1usize..24)
        .prop_flat_map(|(rows, cols)| (Just(rows), Just(cols), 0..=cols, 0..cols))
        .prop_map(|(rows, cols, per_row, shift)| {
            let triplets = (0..rows)
                .flat_map(|r| (0..per_row).map(move |k| (r, (r + shift + k) % cols, 1.0)))
                .collect();
            CooMatrix::from_triplets(rows, cols, triplets)
        })
}

fn arb_format() -> impl Strategy<Value = FormatId> {
    prop::sample::select(FormatId::ALL.to_vec())
}

fn limits() -> ConversionLimits {
    ConversionLimits {
        dia_max_fill: f64::INFINITY,
        ell_max_fill: f64::INFINITY,
        hyb_breakeven_threshold: 0,
        ..ConversionLimits::default()
    }
}

proptest! {
    #[test]
    fn histograms_sum_to_nnz(coo in arb_matrix(), fmt in arb_format()) {
        let mut a: DynamicMatrix<f64> = coo.into();
        a.convert_to(fmt, &limits()).unwrap();

        let rows = count_nnz_per_row(&a);
        let diags = count_nnz_per_diagonal(&a);
        prop_assert_eq!(rows.len(), a.nrows());
        prop_assert_eq!(diags.len(), a.nrows() + a.ncols() - 1);
        prop_assert_eq!(rows.iter().sum::<usize>(), a.nnz());
        prop_assert_eq!(diags.iter().sum::<usize>(), a.nnz());
    }

    #[test]
    fn feature_bounds(coo in arb_matrix()) {
        let a: DynamicMatrix<f64> = coo.into();
        let f = extract(&a).unwrap();

        prop_assert!(f.get(Feature::MinRowNnnz) <= f.get(Feature::AvgNnnz));
        prop_assert!(f.get(Feature::AvgNnnz) <= f.get(Feature::MaxRowNnnz));
        prop_assert!(f.get(Feature::StdRowNnnz) >= 0.0);
        prop_assert!(f.get(Feature::Density) >= 0.0 && f.get(Feature::Density) <= 1.0);
        prop_assert!(f.get(Feature::NDiags) <= f.get(Feature::Nrows) + f.get(Feature::Ncols) - 1.0);
        prop_assert!(f.get(Feature::NTrueDiags) <= f.get(Feature::NDiags));
    }

    #[test]
    fn row_std_zero_iff_rows_uniform(coo in arb_matrix()) {
        let a: DynamicMatrix<f64> = coo.into();
        let rows = count_nnz_per_row(&a);
        let uniform = rows.iter().all(|&n| n == rows[0]);

        prop_assert_eq!(extract(&a).unwrap().get(Feature::StdRowNnnz) == 0.0, uniform);
    }

    #[test]
    fn uniform_rows_have_zero_std(coo in arb_uniform_rows()) {
        let a: DynamicMatrix<f64> = coo.into();
        let f = extract(&a).unwrap();

        prop_assert_eq!(f.get(Feature::StdRowNnnz), 0.0);
        prop_assert_eq!(f.get(Feature::MinRowNnnz), f.get(Feature::MaxRowNnnz));
    }

    #[test]
    fn features_survive_conversion(coo in arb_matrix(), fmt in arb_format()) {
        let reference = extract(&DynamicMatrix::from(coo.clone())).unwrap();

        let mut a: DynamicMatrix<f64> = coo.into();
        a.convert_to(fmt, &limits()).unwrap();
        prop_assert_eq!(extract(&a).unwrap(), reference);
    }

    #[test]
    fn conversion_preserves_entries(coo in arb_matrix(), fmt in arb_format()) {
        let mut a: DynamicMatrix<f64> = coo.clone().into();
        a.convert_to(fmt, &limits()).unwrap();
        prop_assert_eq!(a.to_coo(), coo);
    }

    #[test]
    fn selection_picks_a_minimum(
        times in prop::collection::vec(prop::option::of(0.0f64..1.0), 6),
    ) {
        let mut table = TimingTable::new(1);
        for (fmt, t) in FormatId::ALL.iter().zip(&times) {
            if let Some(t) = t {
                table.set(*fmt, 0, *t);
            }
        }

        match select(&table) {
            Ok(selection) => {
                let best = times[selection.format.index()].unwrap();
                prop_assert!(times.iter().flatten().all(|&t| best <= t));
                // No earlier format ties with the winner
                prop_assert!(times[..selection.format.index()]
                    .iter()
                    .flatten()
                    .all(|&t| t > best));
                prop_assert_eq!(select(&table).unwrap(), selection);
            }
            Err(_) => prop_assert!(times.iter().all(Option::is_none)),
        }
    }
}
