// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike trains labelled with the sample that caused each spike.

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Spikes of one unit: times and producing sample indices, kept in parallel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpikeTrain {
    times: Vec<f64>,
    samples: Vec<usize>,
}

impl SpikeTrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(times: Vec<f64>, samples: Vec<usize>) -> Result<Self> {
        NetworkError::check_dim("spike train samples", times.len(), samples.len())?;
        Ok(Self { times, samples })
    }

    pub fn push(&mut self, time: f64, sample: usize) {
        self.times.push(time);
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn samples(&self) -> &[usize] {
        &self.samples
    }

    /// `(time, sample)` pairs in stored order
    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.times.iter().copied().zip(self.samples.iter().copied())
    }

    pub fn max_sample(&self) -> Option<usize> {
        self.samples.iter().copied().max()
    }

    /// Sort by time, ties by sample index
    pub fn sort(&mut self) {
        let mut pairs: Vec<(f64, usize)> = self.iter().collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let (times, samples) = pairs.into_iter().unzip();
        self.times = times;
        self.samples = samples;
    }

    pub(crate) fn shift(&mut self, delta: f64) {
        for t in &mut self.times {
            *t += delta;
        }
    }

    /// Spikes whose sample lies in `[k0, k1)`, with samples re-based to `k0`
    pub fn window(&self, k0: usize, k1: usize) -> SpikeTrain {
        let mut part = SpikeTrain::new();
        for (time, sample) in self.iter() {
            if (k0..k1).contains(&sample) {
                part.push(time, sample - k0);
            }
        }
        part
    }
}

/// Highest sample index over a set of trains
pub(crate) fn max_sample(trains: &[SpikeTrain]) -> Option<usize> {
    trains.iter().filter_map(SpikeTrain::max_sample).max()
}
