// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Sample data generation.

All generators produce balanced codes: every row has exactly `n_ones` set bits.
They differ in how the bits are placed:

- [`generate`] picks the least used columns so far, ties broken at random,
  which keeps the per-column load of the memory even
- [`generate_random`] picks a uniformly random subset per row
- [`generate_naive`] enumerates subsets in lexicographic order and draws no
  random numbers at all
*/

use ndarray::Array2;
use pynam_config::{DataParameters, GeneratorKind};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::entropy::optimal_sample_count;
use crate::error::{BinamError, Result};
use crate::matrix::BinaryMatrix;
use crate::rng::RandomSource;

fn check_weight(n_bits: usize, n_ones: usize) -> Result<()> {
    if n_ones > n_bits {
        return Err(BinamError::InvalidParameter(format!(
            "n_ones = {} exceeds n_bits = {}",
            n_ones, n_bits
        )));
    }
    Ok(())
}

/// Balanced generator: each row takes the `n_ones` least used columns
pub fn generate<R: Rng + ?Sized>(
    n_bits: usize,
    n_ones: usize,
    n_samples: usize,
    rng: &mut R,
) -> Result<BinaryMatrix> {
    check_weight(n_bits, n_ones)?;

    let mut bits = Array2::zeros((n_samples, n_bits));
    let mut usage = vec![0usize; n_bits];
    let mut order: Vec<usize> = (0..n_bits).collect();
    for k in 0..n_samples {
        // Shuffle first so the stable sort breaks ties randomly
        order.shuffle(rng);
        order.sort_by_key(|&i| usage[i]);
        for &i in &order[..n_ones] {
            bits[[k, i]] = 1;
            usage[i] += 1;
        }
    }
    Ok(BinaryMatrix::from_array_unchecked(bits))
}

/// Uniform generator: each row is a random permutation of the columns, the
/// first `n_ones` of which are set
pub fn generate_random<R: Rng + ?Sized>(
    n_bits: usize,
    n_ones: usize,
    n_samples: usize,
    rng: &mut R,
) -> Result<BinaryMatrix> {
    check_weight(n_bits, n_ones)?;

    let mut bits = Array2::zeros((n_samples, n_bits));
    let mut order: Vec<usize> = (0..n_bits).collect();
    for k in 0..n_samples {
        let (chosen, _) = order.partial_shuffle(rng, n_ones);
        for &i in chosen.iter() {
            bits[[k, i]] = 1;
        }
    }
    Ok(BinaryMatrix::from_array_unchecked(bits))
}

/// Deterministic generator: the `n_ones`-subsets of `n_bits` in lexicographic
/// order, starting over once all subsets are used
pub fn generate_naive(n_bits: usize, n_ones: usize, n_samples: usize) -> Result<BinaryMatrix> {
    check_weight(n_bits, n_ones)?;

    let mut bits = Array2::zeros((n_samples, n_bits));
    let mut combination: Vec<usize> = (0..n_ones).collect();
    for k in 0..n_samples {
        for &i in &combination {
            bits[[k, i]] = 1;
        }
        if !next_combination(&mut combination, n_bits) {
            combination = (0..n_ones).collect();
        }
    }
    Ok(BinaryMatrix::from_array_unchecked(bits))
}

/// Advance to the lexicographically next subset; false once exhausted
fn next_combination(combination: &mut [usize], n: usize) -> bool {
    let k = combination.len();
    let Some(pos) = (0..k).rev().find(|&i| combination[i] < n - k + i) else {
        return false;
    };
    combination[pos] += 1;
    for i in pos + 1..k {
        combination[i] = combination[i - 1] + 1;
    }
    true
}

/// Generate a matrix with the named strategy
pub fn generate_with(
    kind: GeneratorKind,
    n_bits: usize,
    n_ones: usize,
    n_samples: usize,
    rng: &mut RandomSource,
) -> Result<BinaryMatrix> {
    match kind {
        GeneratorKind::Balanced => generate(n_bits, n_ones, n_samples, rng),
        GeneratorKind::Random => generate_random(n_bits, n_ones, n_samples, rng),
        GeneratorKind::Naive => generate_naive(n_bits, n_ones, n_samples),
    }
}

/// Number of samples configured, or the optimal count for the memory size
pub fn resolve_sample_count(params: &DataParameters) -> usize {
    params.n_samples.unwrap_or_else(|| {
        optimal_sample_count(
            params.n_bits_in,
            params.n_bits_out,
            params.n_ones_in,
            params.n_ones_out,
        )
    })
}

/// Generate the input and output matrices described by `params`
///
/// With a configured seed both matrices are reproducible and the outer
/// random stream is left untouched.
pub fn generate_data(
    params: &DataParameters,
    rng: &mut RandomSource,
) -> Result<(BinaryMatrix, BinaryMatrix)> {
    let n_samples = resolve_sample_count(params);
    debug!(
        n_samples,
        n_bits_in = params.n_bits_in,
        n_bits_out = params.n_bits_out,
        strategy = ?params.strategy,
        "Generating sample data"
    );
    let mat_in = rng.scoped(params.seed, 0, |rng| {
        generate_with(params.strategy, params.n_bits_in, params.n_ones_in, n_samples, rng)
    })?;
    let mat_out = rng.scoped(params.seed, 1, |rng| {
        generate_with(params.strategy, params.n_bits_out, params.n_ones_out, n_samples, rng)
    })?;
    Ok((mat_in, mat_out))
}

fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(BinamError::InvalidParameter(format!(
            "probability must be in [0, 1], got {}",
            p
        )));
    }
    Ok(())
}

/// Clear every set bit with probability `p`
pub fn drop_bits<R: Rng + ?Sized>(mat: &BinaryMatrix, p: f64, rng: &mut R) -> Result<BinaryMatrix> {
    check_probability(p)?;
    let mut bits = mat.view().to_owned();
    for b in bits.iter_mut() {
        if *b != 0 && rng.gen_bool(p) {
            *b = 0;
        }
    }
    Ok(BinaryMatrix::from_array_unchecked(bits))
}

/// Set every clear bit with probability `p`
pub fn add_bits<R: Rng + ?Sized>(mat: &BinaryMatrix, p: f64, rng: &mut R) -> Result<BinaryMatrix> {
    check_probability(p)?;
    let mut bits = mat.view().to_owned();
    for b in bits.iter_mut() {
        if *b == 0 && rng.gen_bool(p) {
            *b = 1;
        }
    }
    Ok(BinaryMatrix::from_array_unchecked(bits))
}
