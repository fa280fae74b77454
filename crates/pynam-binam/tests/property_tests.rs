// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for generation, training and information measures

use proptest::prelude::*;
use pynam_binam::{
    calculate_errs, entropy_hetero, generate, generate_random, max_information, BiNAM,
    BinaryMatrix, RandomSource, Threshold,
};

// (n_bits, n_ones, n_samples, seed)
fn code_strategy() -> impl Strategy<Value = (usize, usize, usize, u64)> {
    (1usize..48)
        .prop_flat_map(|n_bits| (Just(n_bits), 0..=n_bits, 0usize..40, any::<u64>()))
}

// Random 0/1 matrix with the given shape
fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = BinaryMatrix> {
    prop::collection::vec(prop::collection::vec(0u8..=1, cols), rows)
        .prop_map(|rows| BinaryMatrix::from_rows(&rows).unwrap())
}

proptest! {
    // Property: every generated row has exactly n_ones set bits
    #[test]
    fn test_generated_rows_have_fixed_weight((n_bits, n_ones, n_samples, seed) in code_strategy()) {
        let mut rng = RandomSource::from_seed(seed);
        let balanced = generate(n_bits, n_ones, n_samples, &mut rng).unwrap();
        let random = generate_random(n_bits, n_ones, n_samples, &mut rng).unwrap();
        prop_assert_eq!(balanced.shape(), (n_samples, n_bits));
        for k in 0..n_samples {
            prop_assert_eq!(balanced.row_weight(k), n_ones);
            prop_assert_eq!(random.row_weight(k), n_ones);
        }
    }

    // Property: training never clears a weight
    #[test]
    fn test_training_is_monotone(
        xs in matrix_strategy(12, 10),
        ys in matrix_strategy(12, 7),
    ) {
        let mut mem = BiNAM::new(10, 7);
        let mut previous: Vec<(usize, usize)> = Vec::new();
        for k in 0..12 {
            mem.train(xs.row(k), ys.row(k)).unwrap();
            let cells: Vec<(usize, usize)> = mem.nonzero_cells().collect();
            for cell in &previous {
                prop_assert!(cells.contains(cell));
            }
            previous = cells;
        }
    }

    // Property: a single stored pair is recalled exactly under the adaptive threshold
    #[test]
    fn test_single_pair_clean_recall(
        (n_in, ones_in, n_out, ones_out, seed) in (1usize..32, 1usize..32)
            .prop_flat_map(|(n_in, n_out)| (Just(n_in), 1..=n_in, Just(n_out), 0..=n_out, any::<u64>())),
    ) {
        let mut rng = RandomSource::from_seed(seed);
        let x = generate(n_in, ones_in, 1, &mut rng).unwrap();
        let y = generate(n_out, ones_out, 1, &mut rng).unwrap();
        let mut mem = BiNAM::new(n_in, n_out);
        mem.train(x.row(0), y.row(0)).unwrap();
        let recalled = mem.evaluate(x.row(0), Threshold::Adaptive).unwrap();
        prop_assert_eq!(recalled.view(), y.row(0));
    }

    // Property: comparing a matrix with itself gives no errors and maximal information
    #[test]
    fn test_zero_errors_are_maximal((n_bits, n_ones, n_samples, seed) in code_strategy()) {
        let mut rng = RandomSource::from_seed(seed);
        let ys = generate(n_bits, n_ones, n_samples, &mut rng).unwrap();
        let errs = calculate_errs(&ys, &ys).unwrap();
        prop_assert!(errs.iter().all(|e| e.is_exact()));
        let info = entropy_hetero(&errs, n_bits, n_ones);
        prop_assert!((info - max_information(n_samples, n_bits, n_ones)).abs() < 1e-6);
    }

    // Property: information is finite, non-negative and bounded by the maximum
    #[test]
    fn test_information_is_bounded(
        xs in matrix_strategy(8, 12),
        ys in matrix_strategy(8, 12),
        n_ones in 0usize..=12,
    ) {
        let errs = calculate_errs(&xs, &ys).unwrap();
        let info = entropy_hetero(&errs, 12, n_ones);
        prop_assert!(info.is_finite());
        prop_assert!(info >= 0.0);
        prop_assert!(info <= max_information(8, 12, n_ones) + 1e-6);
    }
}
