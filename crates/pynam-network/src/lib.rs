// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # PyNAM Network
//!
//! Maps a BiNAM onto a spiking network and back:
//! - Temporal encoding of samples into labelled spike bursts
//! - Simulator-independent population and connection descriptions
//! - Decoding of output spikes by nearest preceding input spike
//! - Spatial and temporal demultiplexing of pooled experiments
//! - Latency and storage capacity analysis
//!
//! The simulator itself is not part of this crate. It receives a
//! [`NetworkInstance`] or [`NetworkPool`] and returns the recorded spike
//! times of every population, input populations first.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod analysis;
pub mod builder;
pub mod encoder;
pub mod error;
pub mod matcher;
pub mod pool;
pub mod topology;
pub mod train;

pub use analysis::{NetworkAnalysis, StorageCapacity};
pub use builder::NetworkBuilder;
pub use encoder::{build_spike_train, EncodedInput, SpikeEncoder, DEFAULT_BLOCK_DELAY};
pub use error::{NetworkError, Result};
pub use matcher::{DecodedOutput, SpikeIndex, SpikeMatcher, UnmatchedPolicy, UnmatchedSpike};
pub use pool::{NetworkInstance, NetworkPool, SpatialSplit};
pub use topology::{draw_weight, Connection, Endpoint, Population, Topology};
pub use train::SpikeTrain;
