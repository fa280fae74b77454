// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dense bit matrix holding one sample per row.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{BinamError, Result};

/// N×m matrix of bits, rows are samples
///
/// Cells are stored as `u8` and always hold 0 or 1. The matrix is immutable
/// once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<u8>", into = "Array2<u8>")]
pub struct BinaryMatrix {
    bits: Array2<u8>,
}

impl BinaryMatrix {
    /// All-zero matrix
    pub fn zeros(n_samples: usize, n_bits: usize) -> Self {
        Self {
            bits: Array2::zeros((n_samples, n_bits)),
        }
    }

    /// Wrap an existing array, rejecting cells other than 0 and 1
    pub fn from_array(bits: Array2<u8>) -> Result<Self> {
        if let Some(bad) = bits.iter().find(|&&b| b > 1) {
            return Err(BinaryMatrix::non_binary(*bad));
        }
        Ok(Self { bits })
    }

    pub(crate) fn from_array_unchecked(bits: Array2<u8>) -> Self {
        debug_assert!(bits.iter().all(|&b| b <= 1));
        Self { bits }
    }

    /// Build from row vectors; all rows must have the same length
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let n_bits = rows.first().map_or(0, |r| r.as_ref().len());
        let mut bits = Array2::zeros((rows.len(), n_bits));
        for (k, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            BinamError::check_dim("row length", n_bits, row.len())?;
            for (i, &b) in row.iter().enumerate() {
                if b > 1 {
                    return Err(BinaryMatrix::non_binary(b));
                }
                bits[[k, i]] = b;
            }
        }
        Ok(Self { bits })
    }

    /// Build from the indices of the set bits of every row
    pub fn from_active_bits<R: AsRef<[usize]>>(n_bits: usize, rows: &[R]) -> Result<Self> {
        let mut bits = Array2::zeros((rows.len(), n_bits));
        for (k, row) in rows.iter().enumerate() {
            for &i in row.as_ref() {
                if i >= n_bits {
                    return Err(BinamError::InvalidParameter(format!(
                        "bit index {} out of range for {} bits",
                        i, n_bits
                    )));
                }
                bits[[k, i]] = 1;
            }
        }
        Ok(Self { bits })
    }

    fn non_binary(value: u8) -> BinamError {
        BinamError::InvalidParameter(format!("matrix cell holds {}, expected 0 or 1", value))
    }

    pub fn n_samples(&self) -> usize {
        self.bits.nrows()
    }

    pub fn n_bits(&self) -> usize {
        self.bits.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.bits.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, sample: usize, bit: usize) -> bool {
        self.bits[[sample, bit]] != 0
    }

    pub fn row(&self, sample: usize) -> ArrayView1<'_, u8> {
        self.bits.row(sample)
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.bits.view()
    }

    pub fn into_array(self) -> Array2<u8> {
        self.bits
    }

    /// Indices of the set bits of one row
    pub fn active_bits(&self, sample: usize) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .row(sample)
            .into_iter()
            .enumerate()
            .filter(|(_, b)| **b != 0)
            .map(|(i, _)| i)
    }

    /// Hamming weight of one row
    pub fn row_weight(&self, sample: usize) -> usize {
        self.bits.row(sample).iter().filter(|&&b| b != 0).count()
    }

    /// Number of samples each bit is set in
    pub fn column_weights(&self) -> Vec<usize> {
        self.bits
            .columns()
            .into_iter()
            .map(|col| col.iter().filter(|&&b| b != 0).count())
            .collect()
    }
}

impl TryFrom<Array2<u8>> for BinaryMatrix {
    type Error = BinamError;

    fn try_from(bits: Array2<u8>) -> Result<Self> {
        Self::from_array(bits)
    }
}

impl From<BinaryMatrix> for Array2<u8> {
    fn from(matrix: BinaryMatrix) -> Self {
        matrix.bits
    }
}

impl<'a> From<&'a BinaryMatrix> for ArrayView2<'a, u8> {
    fn from(matrix: &'a BinaryMatrix) -> Self {
        matrix.bits.view()
    }
}
