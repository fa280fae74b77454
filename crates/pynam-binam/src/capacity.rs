// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Storage capacity of the plain matrix memory, without any spiking layer.

use serde::Serialize;
use tracing::info;

use crate::binam::{BiNAM, Threshold};
use crate::entropy::{calculate_errs, entropy_hetero, SampleError};
use crate::error::{BinamError, Result};
use crate::matrix::BinaryMatrix;

/// Result of a matrix-only capacity evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PureEvaluation {
    pub output: BinaryMatrix,
    pub errors: Vec<SampleError>,
    /// Stored information in bits
    pub information: f64,
}

/// Train a fresh memory on all samples, recall every input and score the
/// result against `ys`
pub fn evaluate_pure(
    xs: &BinaryMatrix,
    ys: &BinaryMatrix,
    n_ones_out: usize,
    threshold: Threshold,
) -> Result<PureEvaluation> {
    BinamError::check_dim("sample count", xs.n_samples(), ys.n_samples())?;

    let mut mem = BiNAM::new(xs.n_bits(), ys.n_bits());
    mem.train_matrix(xs, ys)?;
    let output = mem.evaluate_matrix(xs, threshold)?;
    let errors = calculate_errs(&output, ys)?;
    let information = entropy_hetero(&errors, ys.n_bits(), n_ones_out);

    info!(
        samples = xs.n_samples(),
        information, "Evaluated BiNAM storage capacity"
    );
    Ok(PureEvaluation {
        output,
        errors,
        information,
    })
}
