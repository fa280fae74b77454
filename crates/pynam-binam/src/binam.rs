// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Binary associative memory.

The memory is an m×n weight matrix of bits. Training ORs the outer product of
an input/output pair into the weights; retrieval sums the weights selected by
the active input bits and thresholds every output column.

```
use pynam_binam::{BiNAM, Threshold};

let mut mem = BiNAM::new(8, 8);
mem.train(&[1u8, 1, 0, 0, 0, 0, 0, 0], &[0u8, 0, 1, 1, 0, 0, 0, 0]).unwrap();
let y = mem.evaluate(&[1u8, 1, 0, 0, 0, 0, 0, 0], Threshold::Adaptive).unwrap();
assert_eq!(y.to_vec(), vec![0, 0, 1, 1, 0, 0, 0, 0]);
```
*/

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use pynam_config::ThresholdKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{BinamError, Result};
use crate::matrix::BinaryMatrix;

/// Output threshold used during retrieval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threshold {
    /// Threshold equals the number of active input bits
    #[default]
    Adaptive,
    /// Same threshold for every output column
    Fixed(u32),
}

impl Threshold {
    fn resolve(self, active_inputs: usize) -> u32 {
        match self {
            Threshold::Adaptive => active_inputs as u32,
            Threshold::Fixed(theta) => theta,
        }
    }
}

impl From<ThresholdKind> for Threshold {
    fn from(kind: ThresholdKind) -> Self {
        match kind {
            ThresholdKind::Adaptive => Threshold::Adaptive,
            ThresholdKind::Fixed(theta) => Threshold::Fixed(theta),
        }
    }
}

/// Training state of a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinamState {
    Empty,
    /// Number of samples folded into the weights
    Trained(usize),
}

/// Binary associative memory with `n_inputs` input and `n_outputs` output bits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiNAM {
    weights: Array2<u8>,
    trained: usize,
}

impl BiNAM {
    pub fn new(n_inputs: usize, n_outputs: usize) -> Self {
        Self {
            weights: Array2::zeros((n_inputs, n_outputs)),
            trained: 0,
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_outputs(&self) -> usize {
        self.weights.ncols()
    }

    pub fn state(&self) -> BinamState {
        match self.trained {
            0 => BinamState::Empty,
            k => BinamState::Trained(k),
        }
    }

    /// Number of samples folded into the weights
    pub fn trained_samples(&self) -> usize {
        self.trained
    }

    pub fn weight(&self, input: usize, output: usize) -> bool {
        self.weights[[input, output]] != 0
    }

    pub fn weights(&self) -> ArrayView2<'_, u8> {
        self.weights.view()
    }

    /// Clear all weights
    pub fn reset(&mut self) {
        self.weights.fill(0);
        self.trained = 0;
    }

    /// `(input, output)` coordinates of every set weight, row-major
    pub fn nonzero_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.weights
            .indexed_iter()
            .filter(|(_, w)| **w != 0)
            .map(|(idx, _)| idx)
    }

    /// Store one input/output pair
    pub fn train<'a, 'b>(
        &mut self,
        x: impl Into<ArrayView1<'a, u8>>,
        y: impl Into<ArrayView1<'b, u8>>,
    ) -> Result<()> {
        let x = x.into();
        let y = y.into();
        BinamError::check_dim("training input", self.n_inputs(), x.len())?;
        BinamError::check_dim("training output", self.n_outputs(), y.len())?;
        self.store(x, y);
        Ok(())
    }

    fn store(&mut self, x: ArrayView1<'_, u8>, y: ArrayView1<'_, u8>) {
        let active_out: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0)
            .map(|(j, _)| j)
            .collect();
        for (i, _) in x.iter().enumerate().filter(|(_, b)| **b != 0) {
            let mut row = self.weights.row_mut(i);
            for &j in &active_out {
                row[j] = 1;
            }
        }
        self.trained += 1;
    }

    fn check_pairs(&self, xs: &ArrayView2<'_, u8>, ys: &ArrayView2<'_, u8>) -> Result<()> {
        BinamError::check_dim("training samples", xs.nrows(), ys.nrows())?;
        BinamError::check_dim("training input", self.n_inputs(), xs.ncols())?;
        BinamError::check_dim("training output", self.n_outputs(), ys.ncols())?;
        Ok(())
    }

    /// Store every row pair of `xs` and `ys` in index order
    pub fn train_matrix<'a, 'b>(
        &mut self,
        xs: impl Into<ArrayView2<'a, u8>>,
        ys: impl Into<ArrayView2<'b, u8>>,
    ) -> Result<()> {
        let xs = xs.into();
        let ys = ys.into();
        self.check_pairs(&xs, &ys)?;
        for (x, y) in xs.rows().into_iter().zip(ys.rows()) {
            self.store(x, y);
        }
        debug!(samples = xs.nrows(), trained = self.trained, "Trained BiNAM");
        Ok(())
    }

    /// Bring the memory to the state of having learned samples `0..k`
    ///
    /// Only the missing samples are added when `k` exceeds the number of
    /// samples already stored. Otherwise the memory is cleared and retrained,
    /// since OR-superposition cannot forget.
    pub fn train_to<'a, 'b>(
        &mut self,
        xs: impl Into<ArrayView2<'a, u8>>,
        ys: impl Into<ArrayView2<'b, u8>>,
        k: usize,
    ) -> Result<()> {
        let xs = xs.into();
        let ys = ys.into();
        self.check_pairs(&xs, &ys)?;
        let k = k.min(xs.nrows());

        if k <= self.trained {
            self.reset();
        }
        let start = self.trained;
        for l in start..k {
            self.store(xs.row(l), ys.row(l));
        }
        debug!(from = start, to = k, "Incrementally trained BiNAM");
        Ok(())
    }

    /// Retrieve the output for one input vector
    pub fn evaluate<'a>(&self, x: impl Into<ArrayView1<'a, u8>>, threshold: Threshold) -> Result<Array1<u8>> {
        let x = x.into();
        BinamError::check_dim("retrieval input", self.n_inputs(), x.len())?;
        Ok(Array1::from(self.recall(x, threshold)))
    }

    /// Retrieve the output for every row of `xs`
    pub fn evaluate_matrix<'a>(
        &self,
        xs: impl Into<ArrayView2<'a, u8>>,
        threshold: Threshold,
    ) -> Result<BinaryMatrix> {
        let xs = xs.into();
        BinamError::check_dim("retrieval input", self.n_inputs(), xs.ncols())?;

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<u8>> = (0..xs.nrows())
            .into_par_iter()
            .map(|k| self.recall(xs.row(k), threshold))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<u8>> = xs.rows().into_iter().map(|x| self.recall(x, threshold)).collect();

        let mut out = Array2::zeros((xs.nrows(), self.n_outputs()));
        for (k, row) in rows.into_iter().enumerate() {
            out.row_mut(k).assign(&Array1::from(row));
        }
        Ok(BinaryMatrix::from_array_unchecked(out))
    }

    fn recall(&self, x: ArrayView1<'_, u8>, threshold: Threshold) -> Vec<u8> {
        let mut sums = vec![0u32; self.n_outputs()];
        let mut active = 0;
        for (i, _) in x.iter().enumerate().filter(|(_, b)| **b != 0) {
            active += 1;
            for (sum, &w) in sums.iter_mut().zip(self.weights.row(i).iter()) {
                *sum += w as u32;
            }
        }
        let theta = threshold.resolve(active);
        sums.into_iter().map(|s| u8::from(s >= theta)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(n: usize, ones: &[usize]) -> Vec<u8> {
        let mut v = vec![0u8; n];
        for &i in ones {
            v[i] = 1;
        }
        v
    }

    fn example_memory() -> BiNAM {
        let mut mem = BiNAM::new(8, 8);
        mem.train(&bits(8, &[0, 1]), &bits(8, &[2, 3])).unwrap();
        mem.train(&bits(8, &[4, 5]), &bits(8, &[6, 7])).unwrap();
        mem
    }

    #[test]
    fn test_new_memory_is_empty() {
        let mem = BiNAM::new(4, 3);
        assert_eq!(mem.state(), BinamState::Empty);
        assert_eq!(mem.nonzero_cells().count(), 0);
        assert_eq!((mem.n_inputs(), mem.n_outputs()), (4, 3));
    }

    #[test]
    fn test_training_sets_outer_product() {
        let mem = example_memory();
        assert_eq!(mem.state(), BinamState::Trained(2));
        let cells: Vec<_> = mem.nonzero_cells().collect();
        assert_eq!(
            cells,
            vec![(0, 2), (0, 3), (1, 2), (1, 3), (4, 6), (4, 7), (5, 6), (5, 7)]
        );
    }

    #[test]
    fn test_adaptive_recall() {
        let mem = example_memory();
        let y = mem.evaluate(&bits(8, &[0, 1]), Threshold::Adaptive).unwrap();
        assert_eq!(y.to_vec(), bits(8, &[2, 3]));
    }

    #[test]
    fn test_mixed_query_thresholds() {
        let mem = example_memory();
        let query = bits(8, &[0, 4]);
        let low = mem.evaluate(&query, Threshold::Fixed(1)).unwrap();
        assert_eq!(low.to_vec(), bits(8, &[2, 3, 6, 7]));
        // Each output column only sees one of the two active inputs
        let adaptive = mem.evaluate(&query, Threshold::Adaptive).unwrap();
        assert!(adaptive.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut mem = BiNAM::new(4, 4);
        let err = mem.train(&[1u8, 0, 0], &[1u8, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            BinamError::DimensionMismatch {
                what: "training input",
                expected: 4,
                actual: 3
            }
        );
        assert!(mem.evaluate(&[1u8; 5], Threshold::Adaptive).is_err());
        assert_eq!(mem.state(), BinamState::Empty);
    }

    #[test]
    fn test_train_matrix_row_mismatch_leaves_memory_untouched() {
        let xs = BinaryMatrix::from_active_bits(4, &[vec![0], vec![1]]).unwrap();
        let ys = BinaryMatrix::from_active_bits(4, &[vec![2]]).unwrap();
        let mut mem = BiNAM::new(4, 4);
        assert!(mem.train_matrix(&xs, &ys).is_err());
        assert_eq!(mem.state(), BinamState::Empty);
    }

    #[test]
    fn test_train_to_incremental_and_reset() {
        let xs = BinaryMatrix::from_active_bits(4, &[vec![0], vec![1], vec![2]]).unwrap();
        let ys = BinaryMatrix::from_active_bits(4, &[vec![0], vec![1], vec![2]]).unwrap();
        let mut mem = BiNAM::new(4, 4);

        mem.train_to(&xs, &ys, 2).unwrap();
        assert_eq!(mem.state(), BinamState::Trained(2));
        assert!(mem.weight(1, 1));
        assert!(!mem.weight(2, 2));

        mem.train_to(&xs, &ys, 10).unwrap();
        assert_eq!(mem.state(), BinamState::Trained(3));
        assert!(mem.weight(2, 2));

        // Going back forgets the later samples
        mem.train_to(&xs, &ys, 1).unwrap();
        assert_eq!(mem.state(), BinamState::Trained(1));
        assert!(!mem.weight(1, 1));

        mem.train_to(&xs, &ys, 0).unwrap();
        assert_eq!(mem.state(), BinamState::Empty);
    }

    #[test]
    fn test_evaluate_matrix_matches_rows() {
        let xs = BinaryMatrix::from_active_bits(8, &[vec![0, 1], vec![4, 5], vec![0, 4]]).unwrap();
        let mem = example_memory();
        let out = mem.evaluate_matrix(&xs, Threshold::Fixed(1)).unwrap();
        for k in 0..3 {
            let single = mem.evaluate(xs.row(k), Threshold::Fixed(1)).unwrap();
            assert_eq!(out.row(k), single.view());
        }
    }

    #[test]
    fn test_threshold_from_config() {
        assert_eq!(Threshold::from(ThresholdKind::Fixed(2)), Threshold::Fixed(2));
        assert_eq!(Threshold::from(ThresholdKind::Adaptive), Threshold::Adaptive);
    }
}
