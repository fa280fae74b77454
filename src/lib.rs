// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # PyNAM - Binary Associative Memories on Spiking Networks
//!
//! PyNAM measures how much information a binary associative memory (BiNAM)
//! retains once it is implemented as a spiking neural network. Sample
//! vectors are encoded into spike bursts, the network is run by an external
//! simulator, and the recorded output spikes are decoded and scored.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! pynam = "0.1"  # Default: row-parallel retrieval
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): Row-parallel BiNAM retrieval via rayon
//! - **`file-logging`**: JSON log files in timestamped run folders
//!
//! ## Usage Examples
//!
//! ### Matrix-only capacity
//!
//! ```rust
//! use pynam::prelude::*;
//!
//! let mut rng = RandomSource::from_seed(1234);
//! let xs = generate(64, 4, 100, &mut rng)?;
//! let ys = generate(64, 4, 100, &mut rng)?;
//!
//! let eval = evaluate_pure(&xs, &ys, 4, Threshold::Adaptive)?;
//! println!("stored {:.1} bits", eval.information);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Spiking experiment
//!
//! ```rust,no_run
//! use pynam::prelude::*;
//!
//! let config = load_config(None, None)?;
//! let mut rng = RandomSource::from_optional_seed(config.experiment.seed);
//!
//! let mut builder = NetworkBuilder::from_config(&config, &mut rng)?;
//! let network = builder.build_from_config(None, &config, &mut rng)?;
//!
//! // Hand `network.populations` and `network.connections` to a simulator,
//! // collect the spike times of every population, input populations first.
//! let recorded: Vec<Vec<f64>> = Vec::new();
//!
//! for analysis in network.build_analysis(&recorded)? {
//!     let capacity = analysis.storage_capacity(
//!         builder.outputs(),
//!         config.data.n_ones_out,
//!         config.topology.multiplicity,
//!         config.output.burst_size,
//!     )?;
//!     println!("{:.1} bits", capacity.information);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: pynam-config, pynam-observability          │
//! │  (Typed configuration, tracing subscriber setup)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Memory: pynam-binam                                    │
//! │  (Sample data, BiNAM, information metrics)              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Network: pynam-network                                 │
//! │  (Spike encoding/decoding, topology, multiplexing)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use pynam_config as config;
pub use pynam_observability as observability;

// Re-export algorithms
pub use pynam_binam as binam;
pub use pynam_network as network;

/// Logging settings for [`observability::init_logging`] taken from the
/// `[logging]` section of an experiment configuration
pub fn logging_config(config: &config::PynamConfig) -> observability::LoggingConfig {
    observability::LoggingConfig {
        level: config.logging.level.clone(),
        log_dir: config.logging.log_dir.clone(),
        ..Default::default()
    }
}

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{
        load_config, validate_config, InputParameters, PynamConfig, ThresholdKind,
        TopologyParameters,
    };

    pub use crate::binam::{
        calculate_errs, entropy_hetero, evaluate_pure, generate, generate_data, BiNAM, BinaryMatrix,
        RandomSource, SampleError, Threshold,
    };

    pub use crate::network::{
        NetworkAnalysis, NetworkBuilder, NetworkInstance, NetworkPool, SpikeEncoder, SpikeMatcher,
        SpikeTrain, StorageCapacity, UnmatchedPolicy,
    };

    pub use crate::observability::{init_logging, CrateDebugFlags};

    pub use crate::logging_config;
}
