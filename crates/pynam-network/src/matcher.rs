// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Temporal decoding of output spikes.

Every output spike is attributed to the sample of the most recent input
spike at or before it, searched across all input units. The input spikes are
pooled into one time-sorted [`SpikeIndex`] once per decode call and queried
by binary search.
*/

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{NetworkError, Result};
use crate::train::SpikeTrain;

/// All input spikes of an experiment sorted by time, ties by sample
#[derive(Debug, Clone, Default)]
pub struct SpikeIndex {
    times: Vec<f64>,
    samples: Vec<usize>,
}

impl SpikeIndex {
    pub fn new(trains: &[SpikeTrain]) -> Self {
        let mut spikes: Vec<(f64, usize)> = trains.iter().flat_map(|t| t.iter()).collect();
        spikes.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let (times, samples) = spikes.into_iter().unzip();
        Self { times, samples }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sample of the latest input spike with a time `<= t`
    pub fn preceding(&self, t: f64) -> Option<usize> {
        let idx = self.times.partition_point(|&x| x <= t);
        idx.checked_sub(1).map(|i| self.samples[i])
    }
}

/// What happens to output spikes that precede every input spike
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnmatchedPolicy {
    /// Drop them from the trains and list them in [`DecodedOutput::unmatched`]
    #[default]
    Report,
    /// Attribute them to sample 0 without further notice
    AssignFirstSample,
}

/// Output spike without a preceding input spike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedSpike {
    pub unit: usize,
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedOutput {
    /// One labelled train per output unit
    pub trains: Vec<SpikeTrain>,
    pub unmatched: Vec<UnmatchedSpike>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpikeMatcher {
    policy: UnmatchedPolicy,
}

impl SpikeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnmatchedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// Label the raw spike times of every output unit with sample indices
    pub fn decode(&self, input: &[SpikeTrain], output: &[Vec<f64>]) -> DecodedOutput {
        let index = SpikeIndex::new(input);
        let mut decoded = DecodedOutput {
            trains: Vec::with_capacity(output.len()),
            unmatched: Vec::new(),
        };

        for (unit, times) in output.iter().enumerate() {
            let mut train = SpikeTrain::new();
            for &time in times {
                match (index.preceding(time), self.policy) {
                    (Some(sample), _) => train.push(time, sample),
                    (None, UnmatchedPolicy::AssignFirstSample) => train.push(time, 0),
                    (None, UnmatchedPolicy::Report) => {
                        decoded.unmatched.push(UnmatchedSpike { unit, time })
                    }
                }
            }
            decoded.trains.push(train);
        }

        if !decoded.unmatched.is_empty() {
            warn!(
                count = decoded.unmatched.len(),
                "Output spikes without preceding input spike"
            );
        }
        debug!(
            input_spikes = index.len(),
            output_units = output.len(),
            "Decoded output spikes"
        );
        decoded
    }

    /// Decode the recordings of all populations of one network
    ///
    /// Recordings are ordered input populations first; those are skipped.
    pub fn decode_recorded(&self, input: &[SpikeTrain], recorded: &[Vec<f64>]) -> Result<DecodedOutput> {
        if recorded.len() < input.len() {
            return Err(NetworkError::DimensionMismatch {
                what: "recorded populations",
                expected: input.len(),
                actual: recorded.len(),
            });
        }
        Ok(self.decode(input, &recorded[input.len()..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Vec<SpikeTrain> {
        vec![
            SpikeTrain::from_parts(vec![10.0, 30.0], vec![0, 2]).unwrap(),
            SpikeTrain::from_parts(vec![20.0], vec![1]).unwrap(),
        ]
    }

    #[test]
    fn test_preceding_is_inclusive() {
        let index = SpikeIndex::new(&input());
        assert_eq!(index.len(), 3);
        assert_eq!(index.preceding(5.0), None);
        assert_eq!(index.preceding(10.0), Some(0));
        assert_eq!(index.preceding(19.9), Some(0));
        assert_eq!(index.preceding(20.0), Some(1));
        assert_eq!(index.preceding(1e9), Some(2));
    }

    #[test]
    fn test_empty_index() {
        let index = SpikeIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.preceding(0.0), None);
    }

    #[test]
    fn test_decode_reports_unmatched() {
        let output = vec![vec![1.0, 12.0], vec![25.0, 31.0]];
        let decoded = SpikeMatcher::new().decode(&input(), &output);
        assert_eq!(decoded.trains[0].samples(), &[0]);
        assert_eq!(decoded.trains[1].samples(), &[1, 2]);
        assert_eq!(decoded.unmatched, vec![UnmatchedSpike { unit: 0, time: 1.0 }]);
    }

    #[test]
    fn test_decode_legacy_policy() {
        let output = vec![vec![1.0]];
        let decoded = SpikeMatcher::with_policy(UnmatchedPolicy::AssignFirstSample).decode(&input(), &output);
        assert_eq!(decoded.trains[0].samples(), &[0]);
        assert!(decoded.unmatched.is_empty());
    }

    #[test]
    fn test_decode_recorded_skips_inputs() {
        let recorded = vec![vec![10.0, 30.0], vec![20.0], vec![21.0]];
        let decoded = SpikeMatcher::new().decode_recorded(&input(), &recorded).unwrap();
        assert_eq!(decoded.trains.len(), 1);
        assert_eq!(decoded.trains[0].samples(), &[1]);

        let err = SpikeMatcher::new().decode_recorded(&input(), &recorded[..1]);
        assert!(matches!(err, Err(NetworkError::DimensionMismatch { .. })));
    }
}
