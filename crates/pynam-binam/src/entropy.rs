// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Retrieval error counting and information measures.

The information stored in a hetero-associative memory is measured against a
fixed-weight output code: a perfectly retrieved sample carries
`log2 C(n, c)` bits, where `n` is the output width and `c` the number of ones.
False positives and false negatives leave a residual set of candidate
patterns; its log-size is subtracted from the perfect value.
*/

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{BinamError, Result};

/// Retrieval errors of one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleError {
    /// Bits set in the result but not in the expected output
    #[serde(rename = "fp")]
    pub false_positives: usize,
    /// Bits set in the expected output but missing in the result
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl SampleError {
    pub fn is_exact(&self) -> bool {
        self.false_positives == 0 && self.false_negatives == 0
    }
}

/// Matrix cell that can be read as a logical bit
pub trait BitValue: Copy {
    fn is_set(self) -> bool;
}

impl BitValue for u8 {
    fn is_set(self) -> bool {
        self != 0
    }
}

impl BitValue for bool {
    fn is_set(self) -> bool {
        self
    }
}

/// Reconstructed outputs are normalised spike counts; a unit counts as
/// active from half its expected activity on.
impl BitValue for f64 {
    fn is_set(self) -> bool {
        self >= 0.5
    }
}

impl BitValue for f32 {
    fn is_set(self) -> bool {
        self >= 0.5
    }
}

/// Count false positives and false negatives for every sample row
pub fn calculate_errs<'a, 'b, A, B>(
    actual: impl Into<ArrayView2<'a, A>>,
    expected: impl Into<ArrayView2<'b, B>>,
) -> Result<Vec<SampleError>>
where
    A: BitValue + 'a,
    B: BitValue + 'b,
{
    let actual = actual.into();
    let expected = expected.into();
    BinamError::check_dim("error calculation (samples)", expected.nrows(), actual.nrows())?;
    BinamError::check_dim("error calculation (bits)", expected.ncols(), actual.ncols())?;

    let errs = actual
        .rows()
        .into_iter()
        .zip(expected.rows())
        .map(|(a_row, e_row)| {
            let mut err = SampleError::default();
            for (&a, &e) in a_row.iter().zip(e_row.iter()) {
                match (a.is_set(), e.is_set()) {
                    (true, false) => err.false_positives += 1,
                    (false, true) => err.false_negatives += 1,
                    _ => {}
                }
            }
            err
        })
        .collect();
    Ok(errs)
}

/// `log2` of the binomial coefficient `C(n, k)`; `-inf` for `k > n`
pub fn log2_binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64 / i as f64).log2())
        .sum()
}

/// `log2 C(c + x, c)` evaluated for real `x >= 0` via the product form
fn log2_binomial_shifted(c: usize, x: f64) -> f64 {
    (1..=c).map(|i| ((x + i as f64) / i as f64).log2()).sum()
}

/// Information of a perfect retrieval of `n_samples` fixed-weight outputs
pub fn max_information(n_samples: usize, n_bits_out: usize, n_ones_out: usize) -> f64 {
    n_samples as f64 * log2_binomial(n_bits_out, n_ones_out.min(n_bits_out))
}

/// Information in bits retrieved from the memory, given per-sample errors
///
/// Error counts are clamped to what a fixed-weight code admits
/// (`fn <= n_ones_out`, `fp <= n_bits_out - n_ones_out`), so the result is
/// always finite and non-negative.
pub fn entropy_hetero(errs: &[SampleError], n_bits_out: usize, n_ones_out: usize) -> f64 {
    let n = n_bits_out;
    let c = n_ones_out.min(n);
    let perfect = log2_binomial(n, c);

    let total: f64 = errs
        .iter()
        .map(|err| {
            let fneg = err.false_negatives.min(c);
            let fpos = err.false_positives.min(n - c);
            let ones = c - fneg + fpos;
            let residual = log2_binomial(ones, c - fneg) + log2_binomial(n - ones, fneg);
            perfect - residual
        })
        .sum();
    total.max(0.0)
}

/// Probability that a given weight is set after `n_samples` random samples
fn weight_density(n_samples: usize, n_bits_in: usize, n_bits_out: usize, n_ones_in: usize, n_ones_out: usize) -> f64 {
    let p_single = (n_ones_in * n_ones_out) as f64 / (n_bits_in * n_bits_out) as f64;
    1.0 - (1.0 - p_single).powf(n_samples as f64)
}

/// Expected false positives per sample for a BiNAM storing `n_samples` random
/// balanced samples under the adaptive threshold
pub fn expected_false_positives(
    n_samples: usize,
    n_bits_in: usize,
    n_bits_out: usize,
    n_ones_in: usize,
    n_ones_out: usize,
) -> f64 {
    if n_bits_in == 0 || n_bits_out == 0 {
        return 0.0;
    }
    let p = weight_density(n_samples, n_bits_in, n_bits_out, n_ones_in, n_ones_out);
    (n_bits_out - n_ones_out.min(n_bits_out)) as f64 * p.powi(n_ones_in as i32)
}

/// Expected information stored in a BiNAM holding `n_samples` samples
pub fn expected_entropy(
    n_samples: usize,
    n_bits_in: usize,
    n_bits_out: usize,
    n_ones_in: usize,
    n_ones_out: usize,
) -> f64 {
    if n_bits_out == 0 {
        return 0.0;
    }
    let c = n_ones_out.min(n_bits_out);
    let fp = expected_false_positives(n_samples, n_bits_in, n_bits_out, n_ones_in, n_ones_out);
    let per_sample = log2_binomial(n_bits_out, c) - log2_binomial_shifted(c, fp);
    (n_samples as f64 * per_sample).max(0.0)
}

/// Upper end of the doubling search in [`optimal_sample_count`]
const MAX_BRACKET: usize = {
    let cap = 1u64 << 40;
    let limit = (usize::MAX / 4) as u64;
    (if cap < limit { cap } else { limit }) as usize
};

/// Sample count maximising [`expected_entropy`]
///
/// Returns 0 for degenerate memories that cannot store information.
pub fn optimal_sample_count(n_bits_in: usize, n_bits_out: usize, n_ones_in: usize, n_ones_out: usize) -> usize {
    let info = |n: usize| expected_entropy(n, n_bits_in, n_bits_out, n_ones_in, n_ones_out);
    if info(1) <= 0.0 {
        return 0;
    }

    // Bracket the maximum by doubling, then narrow down by ternary search
    let mut hi = 1usize;
    while hi < MAX_BRACKET && info(hi * 2) > info(hi) {
        hi *= 2;
    }
    let mut lo = hi / 2;
    hi *= 2;
    while hi - lo > 2 {
        let m1 = lo + (hi - lo) / 3;
        let m2 = hi - (hi - lo) / 3;
        if info(m1) < info(m2) {
            lo = m1;
        } else {
            hi = m2;
        }
    }
    (lo.max(1)..=hi)
        .max_by(|&a, &b| info(a).total_cmp(&info(b)))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_calculate_errs_counts() {
        let actual = array![[1u8, 1, 0, 0], [0, 0, 0, 1]];
        let expected = array![[1u8, 0, 1, 0], [0, 0, 0, 1]];
        let errs = calculate_errs(&actual, &expected).unwrap();
        assert_eq!(
            errs[0],
            SampleError {
                false_positives: 1,
                false_negatives: 1
            }
        );
        assert!(errs[1].is_exact());
    }

    #[test]
    fn test_calculate_errs_fractional_output() {
        let actual = array![[0.75f64, 0.25, 0.5]];
        let expected = array![[1u8, 1, 0]];
        let errs = calculate_errs(&actual, &expected).unwrap();
        assert_eq!(errs[0].false_negatives, 1);
        assert_eq!(errs[0].false_positives, 1);
    }

    #[test]
    fn test_calculate_errs_shape_mismatch() {
        let actual = array![[1u8, 0]];
        let expected = array![[1u8, 0, 0]];
        assert!(matches!(
            calculate_errs(&actual, &expected),
            Err(BinamError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_errors_serialize_short_names() {
        let err = SampleError {
            false_positives: 2,
            false_negatives: 1,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"fp":2,"fn":1}"#);
    }

    #[test]
    fn test_log2_binomial() {
        assert_eq!(log2_binomial(5, 0), 0.0);
        assert!((log2_binomial(4, 2) - 6f64.log2()).abs() < 1e-12);
        assert!((log2_binomial(10, 7) - 120f64.log2()).abs() < 1e-12);
        assert_eq!(log2_binomial(2, 3), f64::NEG_INFINITY);
    }

    #[test]
    fn test_entropy_perfect_is_maximal() {
        let errs = vec![SampleError::default(); 5];
        let info = entropy_hetero(&errs, 16, 3);
        assert!((info - max_information(5, 16, 3)).abs() < 1e-9);
        assert!((info - 5.0 * 560f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_decreases_with_errors() {
        let perfect = entropy_hetero(&[SampleError::default()], 16, 3);
        let one_fp = entropy_hetero(
            &[SampleError {
                false_positives: 1,
                false_negatives: 0,
            }],
            16,
            3,
        );
        // One extra bit leaves C(4, 3) = 4 candidate patterns
        assert!((perfect - one_fp - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_total_failure_is_zero() {
        // Every zero reported as one: nothing is known about the pattern
        let errs = [SampleError {
            false_positives: 13,
            false_negatives: 0,
        }];
        assert!(entropy_hetero(&errs, 16, 3).abs() < 1e-9);

        // Counts beyond the code's capacity are clamped
        let errs = [SampleError {
            false_positives: 100,
            false_negatives: 100,
        }];
        let info = entropy_hetero(&errs, 16, 3);
        assert!(info.is_finite() && info >= 0.0);
    }

    #[test]
    fn test_expected_false_positives_grows_with_load() {
        let few = expected_false_positives(10, 96, 96, 8, 8);
        let many = expected_false_positives(5000, 96, 96, 8, 8);
        assert!(few < many);
        assert!(many <= 88.0);
    }

    #[test]
    fn test_optimal_sample_count_is_local_maximum() {
        let n = optimal_sample_count(96, 96, 8, 8);
        assert!(n > 1);
        let at = expected_entropy(n, 96, 96, 8, 8);
        assert!(at >= expected_entropy(n - 1, 96, 96, 8, 8));
        assert!(at >= expected_entropy(n + 1, 96, 96, 8, 8));
    }

    #[test]
    fn test_optimal_sample_count_large_memory() {
        // Doubling past the bracket must not overflow on any pointer width
        assert!(MAX_BRACKET.checked_mul(4).is_some());

        let n = optimal_sample_count(4096, 4096, 1, 1);
        assert!(n > 1 << 20);
        assert!(n <= 2 * MAX_BRACKET);
        assert!(expected_entropy(n, 4096, 4096, 1, 1).is_finite());
    }

    #[test]
    fn test_optimal_sample_count_degenerate() {
        assert_eq!(optimal_sample_count(16, 16, 0, 3), 0);
        assert_eq!(optimal_sample_count(16, 16, 3, 0), 0);
    }
}
