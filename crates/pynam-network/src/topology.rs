// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulator-independent network description.
//!
//! Every population holds exactly one neuron. Input units are spike sources,
//! output units are recorded neurons; the simulator backend decides which
//! neuron model to instantiate.

use pynam_config::TopologyParameters;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::encoder::EncodedInput;
use crate::error::{NetworkError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Population {
    /// Spike source replaying the given times
    Source { spike_times: Vec<f64> },
    /// Neuron whose output spikes are recorded when `record_spikes` is set
    Neuron { record_spikes: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub population: usize,
    pub neuron: usize,
}

impl Endpoint {
    pub fn new(population: usize, neuron: usize) -> Self {
        Self { population, neuron }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: Endpoint,
    pub target: Endpoint,
    pub weight: f64,
    pub delay: f64,
}

impl Connection {
    /// Same connection with both population indices moved by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self {
            source: Endpoint::new(self.source.population + offset, self.source.neuron),
            target: Endpoint::new(self.target.population + offset, self.target.neuron),
            ..*self
        }
    }
}

/// Populations and connections of one network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub populations: Vec<Population>,
    pub connections: Vec<Connection>,
}

impl Topology {
    /// Copy the input spike times into the leading source populations
    pub fn inject_input(&mut self, input: &EncodedInput) -> Result<()> {
        if input.trains.len() > self.populations.len() {
            return Err(NetworkError::DimensionMismatch {
                what: "source populations",
                expected: input.trains.len(),
                actual: self.populations.len(),
            });
        }
        for (unit, (population, train)) in self.populations.iter_mut().zip(&input.trains).enumerate() {
            match population {
                Population::Source { spike_times } => *spike_times = train.times().to_vec(),
                Population::Neuron { .. } => {
                    return Err(NetworkError::InvalidParameter(format!(
                        "population {} is not a spike source",
                        unit
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn source_count(&self) -> usize {
        self.populations
            .iter()
            .filter(|p| matches!(p, Population::Source { .. }))
            .count()
    }
}

/// Draw one synapse weight, never negative
pub fn draw_weight<R: Rng + ?Sized>(params: &TopologyParameters, rng: &mut R) -> Result<f64> {
    if params.sigma_w <= 0.0 {
        return Ok(params.w);
    }
    let dist = Normal::new(params.w, params.sigma_w)
        .map_err(|e| NetworkError::InvalidParameter(format!("weight distribution: {}", e)))?;
    let w = dist.sample(rng);
    if w < 0.0 {
        warn!(weight = w, "Clamped negative synapse weight to zero");
    }
    Ok(w.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::SpikeTrain;
    use pynam_binam::RandomSource;

    #[test]
    fn test_connection_offset() {
        let c = Connection {
            source: Endpoint::new(1, 0),
            target: Endpoint::new(4, 0),
            weight: 0.5,
            delay: 0.0,
        };
        let moved = c.offset(10);
        assert_eq!(moved.source, Endpoint::new(11, 0));
        assert_eq!(moved.target, Endpoint::new(14, 0));
        assert_eq!(moved.weight, 0.5);
    }

    #[test]
    fn test_draw_weight() {
        let mut rng = RandomSource::from_seed(3);
        let fixed = TopologyParameters::default();
        assert_eq!(draw_weight(&fixed, &mut rng).unwrap(), 0.03);

        let noisy = TopologyParameters {
            w: 0.0,
            sigma_w: 1.0,
            ..Default::default()
        };
        for _ in 0..100 {
            assert!(draw_weight(&noisy, &mut rng).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_inject_input() {
        let mut topology = Topology {
            populations: vec![
                Population::Source { spike_times: vec![] },
                Population::Neuron { record_spikes: true },
            ],
            connections: vec![],
        };
        let input = EncodedInput {
            trains: vec![SpikeTrain::from_parts(vec![1.0, 2.0], vec![0, 1]).unwrap()],
            split: vec![2],
        };
        topology.inject_input(&input).unwrap();
        assert_eq!(
            topology.populations[0],
            Population::Source {
                spike_times: vec![1.0, 2.0]
            }
        );
        assert_eq!(topology.source_count(), 1);

        let too_many = EncodedInput {
            trains: vec![SpikeTrain::new(); 3],
            split: vec![],
        };
        assert!(topology.inject_input(&too_many).is_err());
    }
}
