// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # PyNAM BiNAM
//!
//! Binary associative memory and the data it stores:
//! - Balanced sample generation with a reseedable random source
//! - Training by superposition and thresholded retrieval
//! - Error counting and information measures for fixed-weight codes
//! - Matrix-only storage capacity evaluation
//!
//! Retrieval of large sample matrices runs row-parallel when the `parallel`
//! feature is enabled (default).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod binam;
pub mod capacity;
pub mod data;
pub mod entropy;
pub mod error;
pub mod matrix;
pub mod rng;

pub use binam::{BiNAM, BinamState, Threshold};
pub use capacity::{evaluate_pure, PureEvaluation};
pub use data::{
    add_bits, drop_bits, generate, generate_data, generate_naive, generate_random,
    generate_with, resolve_sample_count,
};
pub use entropy::{
    calculate_errs, entropy_hetero, expected_entropy, expected_false_positives, log2_binomial,
    max_information, optimal_sample_count, BitValue, SampleError,
};
pub use error::{BinamError, Result};
pub use matrix::BinaryMatrix;
pub use rng::{derive_seed, RandomSource, RandomState};
