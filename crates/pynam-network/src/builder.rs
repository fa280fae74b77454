// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Builds spiking networks that implement a trained BiNAM.

Input bit `i` becomes `s` source populations (`i·s .. i·s + s`), output bit
`j` becomes `s` recorded neuron populations starting at `m·s + j·s`, where
`s` is the multiplicity. Every set weight of the memory is realised as `s²`
connections between the copies of its input and output unit.
*/

use pynam_binam::{generate_data, BiNAM, BinaryMatrix, RandomSource};
use pynam_config::{InputParameters, PynamConfig, TopologyParameters};
use rand::Rng;
use tracing::info;

use crate::encoder::{EncodedInput, SpikeEncoder, DEFAULT_BLOCK_DELAY};
use crate::error::{NetworkError, Result};
use crate::pool::NetworkInstance;
use crate::topology::{draw_weight, Connection, Endpoint, Population, Topology};

pub struct NetworkBuilder {
    inputs: BinaryMatrix,
    outputs: BinaryMatrix,
    memory: BiNAM,
    block_delay: f64,
}

impl NetworkBuilder {
    pub fn new(inputs: BinaryMatrix, outputs: BinaryMatrix) -> Result<Self> {
        NetworkError::check_dim("sample count", inputs.n_samples(), outputs.n_samples())?;
        let memory = BiNAM::new(inputs.n_bits(), outputs.n_bits());
        Ok(Self {
            inputs,
            outputs,
            memory,
            block_delay: DEFAULT_BLOCK_DELAY,
        })
    }

    /// Generate the sample data described by `config` and wrap it
    pub fn from_config(config: &PynamConfig, rng: &mut RandomSource) -> Result<Self> {
        config.data.validate().map_err(NetworkError::invalid)?;
        let (inputs, outputs) = generate_data(&config.data, rng)?;
        Ok(Self::new(inputs, outputs)?.with_block_delay(config.experiment.input_block_delay))
    }

    /// Pause between input parameter blocks, in time windows
    pub fn with_block_delay(mut self, block_delay: f64) -> Self {
        self.block_delay = block_delay;
        self
    }

    pub fn n_samples(&self) -> usize {
        self.inputs.n_samples()
    }

    pub fn inputs(&self) -> &BinaryMatrix {
        &self.inputs
    }

    pub fn outputs(&self) -> &BinaryMatrix {
        &self.outputs
    }

    /// Memory as trained by the last [`build_topology`](Self::build_topology) call
    pub fn memory(&self) -> &BiNAM {
        &self.memory
    }

    fn resolve_k(&self, k: Option<usize>) -> usize {
        k.map_or(self.n_samples(), |k| k.min(self.n_samples()))
    }

    /// Network of a memory that has learned samples `0..k`
    pub fn build_topology<R: Rng + ?Sized>(
        &mut self,
        k: Option<usize>,
        params: &TopologyParameters,
        rng: &mut R,
    ) -> Result<Topology> {
        params.validate().map_err(NetworkError::invalid)?;
        let k = self.resolve_k(k);
        self.memory.train_to(&self.inputs, &self.outputs, k)?;

        let s = params.multiplicity;
        let m = self.inputs.n_bits();
        let n = self.outputs.n_bits();

        let mut populations = Vec::with_capacity((m + n) * s);
        populations.extend((0..m * s).map(|_| Population::Source {
            spike_times: Vec::new(),
        }));
        populations.extend((0..n * s).map(|_| Population::Neuron {
            record_spikes: true,
        }));

        let mut connections = Vec::new();
        for (i, j) in self.memory.nonzero_cells() {
            for c_in in 0..s {
                for c_out in 0..s {
                    connections.push(Connection {
                        source: Endpoint::new(i * s + c_in, 0),
                        target: Endpoint::new(m * s + j * s + c_out, 0),
                        weight: draw_weight(params, rng)?,
                        delay: 0.0,
                    });
                }
            }
        }

        info!(
            samples = k,
            populations = populations.len(),
            connections = connections.len(),
            "Built BiNAM network topology"
        );
        Ok(Topology {
            populations,
            connections,
        })
    }

    /// Input spike trains presenting samples `0..k` once per parameter block
    pub fn build_input<R: Rng + ?Sized>(
        &self,
        k: Option<usize>,
        time_offs: f64,
        topology: &TopologyParameters,
        input_params: &[InputParameters],
        rng: &mut R,
    ) -> Result<EncodedInput> {
        SpikeEncoder::new(topology.multiplicity)
            .with_start_time(time_offs)
            .with_block_delay(self.block_delay)
            .encode(&self.inputs, k, input_params, rng)
    }

    /// Complete network with topology, encoding parameters and timing taken
    /// from `config`
    pub fn build_from_config<R: Rng + ?Sized>(
        &mut self,
        k: Option<usize>,
        config: &PynamConfig,
        rng: &mut R,
    ) -> Result<NetworkInstance> {
        let net = self.build_topology(k, &config.topology, rng)?;
        let input = SpikeEncoder::from_config(config).encode(&self.inputs, k, &config.input, rng)?;
        NetworkInstance::new(net, input)
    }

    /// Complete network with injected input, ready for the simulator
    pub fn build<R: Rng + ?Sized>(
        &mut self,
        k: Option<usize>,
        time_offs: f64,
        topology: &TopologyParameters,
        input_params: &[InputParameters],
        rng: &mut R,
    ) -> Result<NetworkInstance> {
        let net = self.build_topology(k, topology, rng)?;
        let input = self.build_input(k, time_offs, topology, input_params, rng)?;
        NetworkInstance::new(net, input)
    }
}
