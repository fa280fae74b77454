// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for BiNAM operations

/// Errors raised by matrix generation, training and retrieval.
///
/// Every error is returned before any state is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinamError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl BinamError {
    pub(crate) fn check_dim(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(BinamError::DimensionMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}

pub type Result<T> = core::result::Result<T, BinamError>;
