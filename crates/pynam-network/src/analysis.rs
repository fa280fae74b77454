// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Latency and storage capacity of one demultiplexed experiment.

use ndarray::Array2;
use pynam_binam::{calculate_errs, entropy_hetero, BinaryMatrix, SampleError};
use serde::Serialize;

use crate::error::{NetworkError, Result};
use crate::train::SpikeTrain;

/// Input and matched output spikes of one experiment and parameter block
///
/// Sample indices are relative to the start of the block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkAnalysis {
    pub input: Vec<SpikeTrain>,
    pub output: Vec<SpikeTrain>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageCapacity {
    /// Retrieved information in bits
    pub information: f64,
    /// Reconstructed output, one row per sample
    pub output_matrix: Array2<f64>,
    pub errors: Vec<SampleError>,
}

fn latest_per_sample(trains: &[SpikeTrain], n_samples: usize) -> Vec<Option<f64>> {
    let mut latest: Vec<Option<f64>> = vec![None; n_samples];
    for (time, sample) in trains.iter().flat_map(|t| t.iter()) {
        if let Some(slot) = latest.get_mut(sample) {
            *slot = Some(slot.map_or(time, |t| t.max(time)));
        }
    }
    latest
}

impl NetworkAnalysis {
    /// Time from the last input spike to the last output spike per sample
    ///
    /// `f64::INFINITY` marks samples without input or without any response.
    pub fn latencies(&self) -> Vec<f64> {
        let last_in = latest_per_sample(&self.input, self.sample_count);
        let last_out = latest_per_sample(&self.output, self.sample_count);
        last_in
            .into_iter()
            .zip(last_out)
            .map(|pair| match pair {
                (Some(t_in), Some(t_out)) => t_out - t_in,
                _ => f64::INFINITY,
            })
            .collect()
    }

    /// Output spike counts per sample and logical output unit, normalised to
    /// 1.0 for a unit whose copies all fired a full burst
    pub fn output_matrix(&self, multiplicity: usize, burst_size: usize) -> Result<Array2<f64>> {
        if multiplicity == 0 || burst_size == 0 {
            return Err(NetworkError::InvalidParameter(format!(
                "multiplicity ({}) and burst size ({}) must be positive",
                multiplicity, burst_size
            )));
        }
        if self.output.len() % multiplicity != 0 {
            return Err(NetworkError::DimensionMismatch {
                what: "output units (multiple of multiplicity)",
                expected: self.output.len().next_multiple_of(multiplicity),
                actual: self.output.len(),
            });
        }
        let n_units = self.output.len() / multiplicity;
        let mut res = Array2::<f64>::zeros((self.sample_count, n_units));
        for (unit, train) in self.output.iter().enumerate() {
            let j = unit / multiplicity;
            for &sample in train.samples() {
                if sample < self.sample_count {
                    res[[sample, j]] += 1.0;
                }
            }
        }
        res /= multiplicity as f64;
        res /= burst_size as f64;
        Ok(res)
    }

    /// Score the reconstructed output against the expected one
    pub fn storage_capacity(
        &self,
        expected: &BinaryMatrix,
        n_ones_out: usize,
        multiplicity: usize,
        burst_size: usize,
    ) -> Result<StorageCapacity> {
        let output_matrix = self.output_matrix(multiplicity, burst_size)?;
        let errors = calculate_errs(&output_matrix, expected)?;
        let information = entropy_hetero(&errors, output_matrix.ncols(), n_ones_out);
        Ok(StorageCapacity {
            information,
            output_matrix,
            errors,
        })
    }
}
