// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for encoding, decoding and demultiplexing

use pynam_binam::BinamError;
use pynam_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Binam(#[from] BinamError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NetworkError {
    pub(crate) fn check_dim(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(NetworkError::DimensionMismatch {
                what,
                expected,
                actual,
            })
        }
    }

    /// Parameter validation failures are reported as invalid parameters
    pub(crate) fn invalid(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue(msg) => NetworkError::InvalidParameter(msg),
            other => NetworkError::Config(other),
        }
    }
}

pub type Result<T> = core::result::Result<T, NetworkError>;
