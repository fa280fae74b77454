// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module checks that configuration values are within valid ranges and
//! consistent with each other. All problems are collected and reported at once.

use crate::{ConfigError, ConfigResult, PynamConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    TooManyOnes { field: String, ones: usize, bits: usize },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyOnes { field, ones, bits } => {
                write!(
                    f,
                    "{} = {} exceeds the number of available bits ({})",
                    field, ones, bits
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Data shape (ones never exceed bits, bit counts positive)
/// - Input parameter blocks (burst size, time window, jitter)
/// - Topology and output parameters
/// - Experiment timing and logging level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &PynamConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_data(config, &mut errors);
    validate_input(config, &mut errors);
    validate_topology(config, &mut errors);
    validate_experiment(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_data(config: &PynamConfig, errors: &mut Vec<ConfigValidationError>) {
    let data = &config.data;
    for (field, bits) in [("data.n_bits_in", data.n_bits_in), ("data.n_bits_out", data.n_bits_out)] {
        if bits == 0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: field.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }
    if data.n_ones_in > data.n_bits_in {
        errors.push(ConfigValidationError::TooManyOnes {
            field: "data.n_ones_in".to_string(),
            ones: data.n_ones_in,
            bits: data.n_bits_in,
        });
    }
    if data.n_ones_out > data.n_bits_out {
        errors.push(ConfigValidationError::TooManyOnes {
            field: "data.n_ones_out".to_string(),
            ones: data.n_ones_out,
            bits: data.n_bits_out,
        });
    }
}

fn validate_input(config: &PynamConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.input.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "input".to_string(),
        });
    }
    for (i, params) in config.input.iter().enumerate() {
        if let Err(e) = params.validate() {
            errors.push(ConfigValidationError::InvalidValue {
                field: format!("input[{}]", i),
                reason: e.to_string(),
            });
        }
    }
}

fn validate_topology(config: &PynamConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Err(e) = config.topology.validate() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "topology".to_string(),
            reason: e.to_string(),
        });
    }
    if config.output.burst_size == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "output.burst_size".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
}

fn validate_experiment(config: &PynamConfig, errors: &mut Vec<ConfigValidationError>) {
    let experiment = &config.experiment;
    if !experiment.time_offset.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "experiment.time_offset".to_string(),
            reason: "must be finite".to_string(),
        });
    }
    if !(experiment.input_block_delay.is_finite() && experiment.input_block_delay >= 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "experiment.input_block_delay".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}
