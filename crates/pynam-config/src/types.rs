// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `pynam_configuration.toml`. The parameter structs are also used directly
//! by the memory and network crates, so each of them can validate itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ConfigError, ConfigResult};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PynamConfig {
    pub data: DataParameters,
    /// One entry per `[[input]]` table. Several entries produce a temporal
    /// multiplex of parameter sweeps within one experiment.
    pub input: Vec<InputParameters>,
    pub topology: TopologyParameters,
    pub output: OutputParameters,
    pub experiment: ExperimentConfig,
    pub logging: LoggingConfig,
}

impl Default for PynamConfig {
    fn default() -> Self {
        Self {
            data: DataParameters::default(),
            input: vec![InputParameters::default()],
            topology: TopologyParameters::default(),
            output: OutputParameters::default(),
            experiment: ExperimentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Strategy used to fill sample matrices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// Fixed-weight rows with balanced column usage
    #[default]
    Balanced,
    /// Fixed-weight rows, columns drawn uniformly at random
    Random,
    /// Deterministic lexicographic enumeration of fixed-weight rows
    Naive,
}

/// Shape of the sample data
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataParameters {
    pub n_bits_in: usize,
    pub n_bits_out: usize,
    pub n_ones_in: usize,
    pub n_ones_out: usize,
    /// `None` selects the theoretically optimal sample count
    pub n_samples: Option<usize>,
    pub strategy: GeneratorKind,
    pub seed: Option<u64>,
}

impl Default for DataParameters {
    fn default() -> Self {
        Self {
            n_bits_in: 96,
            n_bits_out: 96,
            n_ones_in: 8,
            n_ones_out: 8,
            n_samples: None,
            strategy: GeneratorKind::Balanced,
            seed: None,
        }
    }
}

impl DataParameters {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.n_bits_in == 0 || self.n_bits_out == 0 {
            return Err(ConfigError::InvalidValue(
                "data: bit counts must be positive".to_string(),
            ));
        }
        if self.n_ones_in > self.n_bits_in {
            return Err(ConfigError::InvalidValue(format!(
                "data.n_ones_in = {} exceeds n_bits_in = {}",
                self.n_ones_in, self.n_bits_in
            )));
        }
        if self.n_ones_out > self.n_bits_out {
            return Err(ConfigError::InvalidValue(format!(
                "data.n_ones_out = {} exceeds n_bits_out = {}",
                self.n_ones_out, self.n_bits_out
            )));
        }
        Ok(())
    }
}

/// Spike encoding of one input parameter block
///
/// Each active input bit is turned into a burst of `burst_size` spikes spaced
/// by `isi` milliseconds. `sigma_t_offs` jitters the burst onset,
/// `sigma_t` jitters every individual spike.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputParameters {
    pub burst_size: usize,
    pub time_window: f64,
    pub isi: f64,
    pub sigma_t: f64,
    pub sigma_t_offs: f64,
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            burst_size: 1,
            time_window: 100.0,
            isi: 1.0,
            sigma_t: 0.0,
            sigma_t_offs: 0.0,
        }
    }
}

impl InputParameters {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.burst_size == 0 {
            return Err(ConfigError::InvalidValue(
                "input.burst_size must be at least 1".to_string(),
            ));
        }
        if !(self.time_window.is_finite() && self.time_window > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "input.time_window must be positive, got {}",
                self.time_window
            )));
        }
        for (name, value) in [
            ("isi", self.isi),
            ("sigma_t", self.sigma_t),
            ("sigma_t_offs", self.sigma_t_offs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue(format!(
                    "input.{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// True if encoding with these parameters consumes random numbers
    pub fn is_jittered(&self) -> bool {
        self.sigma_t > 0.0 || self.sigma_t_offs > 0.0
    }
}

/// Network topology description handed to the simulator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TopologyParameters {
    /// Neurons (and signals) each logical unit is represented with
    pub multiplicity: usize,
    /// Synapse weight
    pub w: f64,
    /// Synapse weight standard deviation
    pub sigma_w: f64,
}

impl Default for TopologyParameters {
    fn default() -> Self {
        Self {
            multiplicity: 1,
            w: 0.03,
            sigma_w: 0.0,
        }
    }
}

impl TopologyParameters {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.multiplicity == 0 {
            return Err(ConfigError::InvalidValue(
                "topology.multiplicity must be at least 1".to_string(),
            ));
        }
        if !(self.w.is_finite() && self.w >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "topology.w must be non-negative, got {}",
                self.w
            )));
        }
        if !(self.sigma_w.is_finite() && self.sigma_w >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "topology.sigma_w must be non-negative, got {}",
                self.sigma_w
            )));
        }
        Ok(())
    }
}

/// How output spikes are interpreted
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputParameters {
    /// Spikes an output unit emits for one logical "1"
    pub burst_size: usize,
}

impl Default for OutputParameters {
    fn default() -> Self {
        Self { burst_size: 1 }
    }
}

/// Retrieval threshold policy, as written in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ThresholdKind {
    #[default]
    Adaptive,
    Fixed(u32),
}

/// Experiment-wide settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Time of the first input spike (ms)
    pub time_offset: f64,
    /// Pause between parameter blocks, in multiples of `time_window`
    pub input_block_delay: f64,
    pub seed: Option<u64>,
    pub threshold: ThresholdKind,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            time_offset: 0.0,
            input_block_delay: 10.0,
            seed: None,
            threshold: ThresholdKind::Adaptive,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Directory for file logs, if file logging is enabled
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}
