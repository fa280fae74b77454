// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Shared random source for sample generation and spike jitter.

One `RandomSource` is created per experiment and handed by `&mut` to every
operation that draws random numbers. Code paths that must be reproducible
regardless of what ran before use [`RandomSource::scoped`], which reseeds the
generator for the duration of a closure and restores the previous stream
afterwards.
*/

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seed values are folded into this range
const SEED_MODULUS: u128 = 1 << 30;

/// Derive the seed used for sequence number `seq` of a seeded run
pub fn derive_seed(seed: u64, seq: u64) -> u64 {
    ((seed as u128 * (seq as u128 + 1)) % SEED_MODULUS) as u64
}

/// Process-wide random number stream
#[derive(Debug, Clone, PartialEq)]
pub struct RandomSource {
    rng: StdRng,
}

/// Saved generator state, see [`RandomSource::snapshot`]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomState(StdRng);

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded stream if an experiment seed is configured, fresh entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn snapshot(&self) -> RandomState {
        RandomState(self.rng.clone())
    }

    pub fn restore(&mut self, state: RandomState) {
        self.rng = state.0;
    }

    /// Run `f` on a stream reseeded from `(seed, seq)`, then restore the
    /// previous state.
    ///
    /// With `seed == None` the closure runs on the current stream and the
    /// numbers it draws stay consumed.
    pub fn scoped<R>(&mut self, seed: Option<u64>, seq: u64, f: impl FnOnce(&mut Self) -> R) -> R {
        let Some(seed) = seed else {
            return f(self);
        };
        let saved = self.snapshot();
        self.reseed(derive_seed(seed, seq));
        let result = f(self);
        self.restore(saved);
        result
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
