// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spatial and temporal multiplexing of experiments.

A [`NetworkInstance`] is one experiment, possibly presenting several input
parameter blocks one after another (temporal multiplex). A [`NetworkPool`]
places several instances side by side in one simulation (spatial multiplex).
After the simulation both are taken apart again into one
[`NetworkAnalysis`] per experiment and parameter block.
*/

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::NetworkAnalysis;
use crate::encoder::EncodedInput;
use crate::error::{NetworkError, Result};
use crate::matcher::SpikeMatcher;
use crate::topology::{Connection, Population, Topology};
use crate::train::{max_sample, SpikeTrain};

/// One experiment as handed to the simulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInstance {
    pub populations: Vec<Population>,
    pub connections: Vec<Connection>,
    /// Labelled spike trains of the source populations, in population order
    pub input: Vec<SpikeTrain>,
    /// Cumulative sample index at which each parameter block ends
    pub input_split: Vec<usize>,
}

impl NetworkInstance {
    /// Combine a topology with its input, injecting the spike times
    pub fn new(mut topology: Topology, input: EncodedInput) -> Result<Self> {
        topology.inject_input(&input)?;
        Ok(Self {
            populations: topology.populations,
            connections: topology.connections,
            input: input.trains,
            input_split: input.split,
        })
    }

    /// Split the recorded spikes of every population into analysis units
    pub fn build_analysis(&self, recorded: &[Vec<f64>]) -> Result<Vec<NetworkAnalysis>> {
        self.build_analysis_with(&SpikeMatcher::default(), recorded)
    }

    pub fn build_analysis_with(
        &self,
        matcher: &SpikeMatcher,
        recorded: &[Vec<f64>],
    ) -> Result<Vec<NetworkAnalysis>> {
        NetworkError::check_dim("recorded populations", self.populations.len(), recorded.len())?;
        demultiplex(matcher, &self.input, recorded, &self.input_split)
    }
}

/// Decode one network and cut it at the temporal split points
fn demultiplex(
    matcher: &SpikeMatcher,
    input: &[SpikeTrain],
    recorded: &[Vec<f64>],
    split: &[usize],
) -> Result<Vec<NetworkAnalysis>> {
    let decoded = matcher.decode_recorded(input, recorded)?;

    let default_split;
    let split = if split.is_empty() {
        default_split = [max_sample(input).map_or(0, |k| k + 1)];
        &default_split[..]
    } else {
        split
    };

    let mut k0 = 0;
    let mut res = Vec::with_capacity(split.len());
    for &k1 in split {
        res.push(NetworkAnalysis {
            input: input.iter().map(|t| t.window(k0, k1)).collect(),
            output: decoded.trains.iter().map(|t| t.window(k0, k1)).collect(),
            sample_count: k1.saturating_sub(k0),
        });
        k0 = k1;
    }
    debug!(parts = res.len(), "Split network into analysis units");
    Ok(res)
}

/// Cumulative population and input-unit counts after a pooled network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialSplit {
    pub population: usize,
    pub input: usize,
}

/// Several independent networks run in one simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkPool {
    pub populations: Vec<Population>,
    pub connections: Vec<Connection>,
    pub input: Vec<SpikeTrain>,
    /// Temporal split of every pooled network
    pub input_splits: Vec<Vec<usize>>,
    pub spatial_splits: Vec<SpatialSplit>,
}

impl NetworkPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network_count(&self) -> usize {
        self.spatial_splits.len()
    }

    /// Append a network; its connections are moved behind the populations
    /// already in the pool
    pub fn add_network(&mut self, network: NetworkInstance) {
        let offset = self.populations.len();
        self.populations.extend(network.populations);
        self.connections
            .extend(network.connections.iter().map(|c| c.offset(offset)));
        self.input.extend(network.input);
        self.input_splits.push(network.input_split);
        self.spatial_splits.push(SpatialSplit {
            population: self.populations.len(),
            input: self.input.len(),
        });
        debug!(
            networks = self.network_count(),
            populations = self.populations.len(),
            "Added network to pool"
        );
    }

    pub fn add_networks(&mut self, networks: impl IntoIterator<Item = NetworkInstance>) {
        for network in networks {
            self.add_network(network);
        }
    }

    pub fn build_analysis(&self, recorded: &[Vec<f64>]) -> Result<Vec<NetworkAnalysis>> {
        self.build_analysis_with(&SpikeMatcher::default(), recorded)
    }

    /// Demultiplex spatially by population range, then temporally per network
    ///
    /// Results are ordered by network, then by parameter block.
    pub fn build_analysis_with(
        &self,
        matcher: &SpikeMatcher,
        recorded: &[Vec<f64>],
    ) -> Result<Vec<NetworkAnalysis>> {
        NetworkError::check_dim("recorded populations", self.populations.len(), recorded.len())?;

        let mut res = Vec::new();
        let mut last = SpatialSplit::default();
        for (split, input_split) in self.spatial_splits.iter().zip(&self.input_splits) {
            res.extend(demultiplex(
                matcher,
                &self.input[last.input..split.input],
                &recorded[last.population..split.population],
                input_split,
            )?);
            last = *split;
        }
        info!(
            networks = self.network_count(),
            analyses = res.len(),
            "Demultiplexed network pool"
        );
        Ok(res)
    }
}

impl From<NetworkInstance> for NetworkPool {
    fn from(network: NetworkInstance) -> Self {
        let mut pool = Self::new();
        pool.add_network(network);
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Endpoint;

    // Two source units, one output unit; samples 0..4 in two blocks
    fn instance() -> NetworkInstance {
        NetworkInstance {
            populations: vec![
                Population::Source { spike_times: vec![] },
                Population::Source { spike_times: vec![] },
                Population::Neuron { record_spikes: true },
            ],
            connections: vec![Connection {
                source: Endpoint::new(0, 0),
                target: Endpoint::new(2, 0),
                weight: 1.0,
                delay: 0.0,
            }],
            input: vec![
                SpikeTrain::from_parts(vec![0.0, 200.0], vec![0, 2]).unwrap(),
                SpikeTrain::from_parts(vec![100.0, 300.0], vec![1, 3]).unwrap(),
            ],
            input_split: vec![2, 4],
        }
    }

    fn recorded() -> Vec<Vec<f64>> {
        vec![vec![], vec![], vec![1.0, 101.0, 301.0]]
    }

    #[test]
    fn test_temporal_split() {
        let parts = instance().build_analysis(&recorded()).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].sample_count, 2);
        assert_eq!(parts[0].output[0].samples(), &[0, 1]);
        assert_eq!(parts[1].output[0].samples(), &[1]);
        assert_eq!(parts[1].input[0].samples(), &[0]);
        assert_eq!(parts[1].input[0].times(), &[200.0]);
    }

    #[test]
    fn test_missing_split_uses_single_part() {
        let mut net = instance();
        net.input_split.clear();
        let parts = net.build_analysis(&recorded()).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].sample_count, 4);
    }

    #[test]
    fn test_pool_rebases_connections() {
        let mut pool = NetworkPool::from(instance());
        pool.add_network(instance());
        assert_eq!(pool.network_count(), 2);
        assert_eq!(pool.populations.len(), 6);
        assert_eq!(pool.connections[1].source, Endpoint::new(3, 0));
        assert_eq!(pool.connections[1].target, Endpoint::new(5, 0));
        assert_eq!(
            pool.spatial_splits,
            vec![
                SpatialSplit {
                    population: 3,
                    input: 2
                },
                SpatialSplit {
                    population: 6,
                    input: 4
                }
            ]
        );
    }

    #[test]
    fn test_pool_analysis_matches_instances() {
        let mut pool = NetworkPool::new();
        pool.add_networks([instance(), instance()]);
        let mut pooled_recording = recorded();
        pooled_recording.extend(vec![vec![], vec![], vec![205.0]]);

        let parts = pool.build_analysis(&pooled_recording).unwrap();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[..2], instance().build_analysis(&recorded()).unwrap()[..]);
        let second = instance()
            .build_analysis(&[vec![], vec![], vec![205.0]])
            .unwrap();
        assert_eq!(parts[2..], second[..]);
    }

    #[test]
    fn test_instance_rejects_wrong_population_count() {
        let net = instance();
        let mut too_many = recorded();
        too_many.push(vec![5.0]);
        for rec in [too_many, recorded()[..2].to_vec()] {
            assert!(matches!(
                net.build_analysis(&rec),
                Err(NetworkError::DimensionMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_pool_rejects_wrong_population_count() {
        let pool = NetworkPool::from(instance());
        assert!(matches!(
            pool.build_analysis(&recorded()[..2]),
            Err(NetworkError::DimensionMismatch { .. })
        ));
    }
}
