// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Temporal encoding of sample matrices into spike bursts.

Samples are presented one after another, each within its own time window.
Every active input bit makes each of its `multiplicity` source units emit a
burst. Several input parameter blocks can be encoded back to back; they are
separated by a pause of `block_delay` time windows and the sample index keeps
counting across blocks, so the blocks can be told apart again with the
temporal split descriptor returned alongside the trains.
*/

use ndarray::ArrayView2;
use pynam_config::{InputParameters, PynamConfig};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::train::SpikeTrain;

/// Pause between parameter blocks, in time windows
pub const DEFAULT_BLOCK_DELAY: f64 = 10.0;

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| {
        NetworkError::InvalidParameter(format!("normal({}, {}): {}", mean, std_dev, e))
    })
}

/// Spike times of one burst starting around `offset`, sorted ascending
pub fn build_spike_train<R: Rng + ?Sized>(
    params: &InputParameters,
    offset: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let offset = if params.sigma_t_offs > 0.0 {
        normal(offset, params.sigma_t_offs)?.sample(rng)
    } else {
        offset
    };
    let jitter = if params.sigma_t > 0.0 {
        Some(normal(0.0, params.sigma_t)?)
    } else {
        None
    };

    let mut times: Vec<f64> = (0..params.burst_size)
        .map(|i| {
            let t = offset + i as f64 * params.isi;
            match &jitter {
                Some(dist) => t + dist.sample(&mut *rng),
                None => t,
            }
        })
        .collect();
    times.sort_by(f64::total_cmp);
    Ok(times)
}

/// Input spike trains of one experiment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedInput {
    /// One train per source unit; input bit `i` copy `c` is unit `i * s + c`
    pub trains: Vec<SpikeTrain>,
    /// Cumulative sample index at which each parameter block ends
    pub split: Vec<usize>,
}

impl EncodedInput {
    /// Spike times per unit, as injected into source populations
    pub fn spike_times(&self) -> Vec<Vec<f64>> {
        self.trains.iter().map(|t| t.times().to_vec()).collect()
    }

    pub fn spike_count(&self) -> usize {
        self.trains.iter().map(SpikeTrain::len).sum()
    }
}

/// Turns sample matrices into labelled input spike trains
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeEncoder {
    multiplicity: usize,
    start_time: f64,
    block_delay: f64,
}

impl SpikeEncoder {
    pub fn new(multiplicity: usize) -> Self {
        Self {
            multiplicity,
            start_time: 0.0,
            block_delay: DEFAULT_BLOCK_DELAY,
        }
    }

    pub fn from_config(config: &PynamConfig) -> Self {
        Self::new(config.topology.multiplicity)
            .with_start_time(config.experiment.time_offset)
            .with_block_delay(config.experiment.input_block_delay)
    }

    /// Time of the earliest spike
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Pause after each parameter block, in time windows of that block
    pub fn with_block_delay(mut self, block_delay: f64) -> Self {
        self.block_delay = block_delay;
        self
    }

    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    fn validate(&self, params: &[InputParameters]) -> Result<()> {
        if self.multiplicity == 0 {
            return Err(NetworkError::InvalidParameter(
                "multiplicity must be at least 1".to_string(),
            ));
        }
        if !(self.block_delay.is_finite() && self.block_delay >= 0.0) {
            return Err(NetworkError::InvalidParameter(format!(
                "block delay must be non-negative, got {}",
                self.block_delay
            )));
        }
        if !self.start_time.is_finite() {
            return Err(NetworkError::InvalidParameter(format!(
                "start time must be finite, got {}",
                self.start_time
            )));
        }
        if params.is_empty() {
            return Err(NetworkError::InvalidParameter(
                "at least one input parameter set is required".to_string(),
            ));
        }
        for p in params {
            p.validate().map_err(NetworkError::invalid)?;
        }
        Ok(())
    }

    /// Encode the first `k` samples of `xs` once per parameter block
    ///
    /// `k = None` or `k` beyond the sample count encodes all samples.
    pub fn encode<'a, R: Rng + ?Sized>(
        &self,
        xs: impl Into<ArrayView2<'a, u8>>,
        k: Option<usize>,
        params: &[InputParameters],
        rng: &mut R,
    ) -> Result<EncodedInput> {
        let xs = xs.into();
        self.validate(params)?;

        let s = self.multiplicity;
        let k = k.map_or(xs.nrows(), |k| k.min(xs.nrows()));
        let mut trains = vec![SpikeTrain::new(); xs.ncols() * s];

        let mut offset = 0.0;
        let mut sample = 0;
        let mut earliest = f64::INFINITY;
        for p in params {
            for l in 0..k {
                let active = xs
                    .row(l)
                    .into_iter()
                    .enumerate()
                    .filter(|(_, b)| **b != 0)
                    .map(|(i, _)| i);
                for i in active {
                    for train in &mut trains[i * s..(i + 1) * s] {
                        let burst = build_spike_train(p, offset, rng)?;
                        if let Some(&first) = burst.first() {
                            earliest = earliest.min(first);
                        }
                        for t in burst {
                            train.push(t, sample);
                        }
                    }
                }
                sample += 1;
                offset += p.time_window;
            }
            offset += p.time_window * self.block_delay;
        }

        if earliest.is_finite() {
            let delta = self.start_time - earliest;
            for train in &mut trains {
                train.shift(delta);
            }
        }
        for train in &mut trains {
            train.sort();
        }

        let split = (1..=params.len()).map(|block| block * k).collect();
        let encoded = EncodedInput { trains, split };
        debug!(
            samples = k,
            blocks = params.len(),
            spikes = encoded.spike_count(),
            "Encoded input spike trains"
        );
        Ok(encoded)
    }
}
