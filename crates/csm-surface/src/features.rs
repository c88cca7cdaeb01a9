// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-vertex feature matrices.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{CsmError, CsmResult};
use crate::types::SurfaceKey;

/// Immutable [vertex_count × feature_dim] matrix; row `i` describes vertex `i`
/// of the mesh with the same key
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    key: SurfaceKey,
    data: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(key: SurfaceKey, data: Array2<f64>) -> Self {
        Self { key, data }
    }

    /// Build from flat row-major values
    ///
    /// # Errors
    ///
    /// `DataLoad` if `values.len() != rows * cols`.
    pub fn from_shape_vec(key: SurfaceKey, rows: usize, cols: usize, values: Vec<f64>) -> CsmResult<Self> {
        let data = Array2::from_shape_vec((rows, cols), values).map_err(|e| {
            CsmError::data_load(format!("{} features", key), format!("shape [{}, {}]: {}", rows, cols, e))
        })?;
        Ok(Self::new(key, data))
    }

    pub fn key(&self) -> SurfaceKey {
        self.key
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Copy of the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Array2<f64> {
        self.data.select(Axis(0), rows)
    }

    /// Euclidean norm of every row
    pub fn row_norms(&self) -> Array1<f64> {
        row_norms(self.data.view())
    }
}

/// Euclidean norm of every row of `matrix`
pub fn row_norms(matrix: ArrayView2<'_, f64>) -> Array1<f64> {
    matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt())
}
