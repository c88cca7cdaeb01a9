// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Source payload formats.

A geometry container is a list of typed data arrays, each tagged with a
NIFTI intent code. Meshes are assembled by intent, never by array position.
Feature payloads are a shape plus flat row-major values.
*/

use serde::{Deserialize, Serialize};

use csm_surface::{CsmError, CsmResult, FeatureMatrix, Mesh, SurfaceKey};

/// NIFTI intent codes relevant to surface geometry
pub mod intent {
    pub const NIFTI_INTENT_POINTSET: u32 = 1008;
    pub const NIFTI_INTENT_TRIANGLE: u32 = 1009;
}

/// One intent-tagged array of a geometry container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataArray {
    pub intent: u32,
    pub dims: Vec<usize>,
    /// Flat row-major values
    pub data: Vec<f64>,
}

impl DataArray {
    pub fn point_set(vertices: &[[f64; 3]]) -> Self {
        Self {
            intent: intent::NIFTI_INTENT_POINTSET,
            dims: vec![vertices.len(), 3],
            data: vertices.iter().flatten().copied().collect(),
        }
    }

    pub fn triangles(faces: &[[u32; 3]]) -> Self {
        Self {
            intent: intent::NIFTI_INTENT_TRIANGLE,
            dims: vec![faces.len(), 3],
            data: faces.iter().flatten().map(|&v| v as f64).collect(),
        }
    }

    /// Row count of an `N×3` array
    fn triplet_rows(&self, source: &str, what: &str) -> CsmResult<usize> {
        match self.dims.as_slice() {
            [rows, 3] if rows * 3 == self.data.len() => Ok(*rows),
            [_, 3] => Err(CsmError::data_load(
                source,
                format!(
                    "{} array declares dims {:?} but holds {} values",
                    what,
                    self.dims,
                    self.data.len()
                ),
            )),
            _ => Err(CsmError::data_load(
                source,
                format!("{} array has dims {:?}, expected [N, 3]", what, self.dims),
            )),
        }
    }
}

/// Geometry container holding at least a point-set and a triangle array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryContainer {
    #[serde(default)]
    pub name: Option<String>,
    pub darrays: Vec<DataArray>,
}

impl GeometryContainer {
    pub fn from_mesh_parts(vertices: &[[f64; 3]], faces: &[[u32; 3]]) -> Self {
        Self {
            name: None,
            darrays: vec![DataArray::point_set(vertices), DataArray::triangles(faces)],
        }
    }

    /// First array carrying `intent`
    pub fn find_intent(&self, intent: u32) -> Option<&DataArray> {
        self.darrays.iter().find(|array| array.intent == intent)
    }

    /// Assemble a `Mesh` for `key` from the first point-set and first triangle array
    ///
    /// # Errors
    ///
    /// `DataLoad` if either array is missing or malformed.
    pub fn into_mesh(self, key: SurfaceKey) -> CsmResult<Mesh> {
        let source = format!("{} surface", key);

        let points = self
            .find_intent(intent::NIFTI_INTENT_POINTSET)
            .ok_or_else(|| CsmError::data_load(&source, "surface does not contain vertices"))?;
        let triangles = self
            .find_intent(intent::NIFTI_INTENT_TRIANGLE)
            .ok_or_else(|| CsmError::data_load(&source, "surface does not contain faces"))?;

        points.triplet_rows(&source, "point set")?;
        triangles.triplet_rows(&source, "triangle")?;

        let vertices = points
            .data
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let mut faces = Vec::with_capacity(triangles.data.len() / 3);
        for chunk in triangles.data.chunks_exact(3) {
            let mut face = [0u32; 3];
            for (slot, &value) in face.iter_mut().zip(chunk) {
                *slot = vertex_index(value).ok_or_else(|| {
                    CsmError::data_load(&source, format!("invalid triangle index {}", value))
                })?;
            }
            faces.push(face);
        }

        Mesh::new(key, vertices, faces)
    }
}

fn vertex_index(value: f64) -> Option<u32> {
    let integral = value.is_finite() && value.fract() == 0.0;
    (integral && value >= 0.0 && value <= u32::MAX as f64).then_some(value as u32)
}

/// Vertex-aligned feature array, optionally with trailing singleton dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePayload {
    pub shape: Vec<usize>,
    /// Flat row-major values
    pub data: Vec<f64>,
}

impl FeaturePayload {
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        Self {
            shape: vec![rows.len(), cols],
            data: rows.iter().flatten().copied().collect(),
        }
    }

    /// Convert to a 2D matrix
    ///
    /// With `remove_singleton`, trailing size-1 dimensions beyond the second
    /// are squeezed. A 1D payload is read as a single feature column.
    ///
    /// # Errors
    ///
    /// `DataLoad` if the payload is not 2D after squeezing or the value count
    /// does not match the shape.
    pub fn into_matrix(self, key: SurfaceKey, remove_singleton: bool) -> CsmResult<FeatureMatrix> {
        let source = format!("{} features", key);

        let mut shape = self.shape.clone();
        if remove_singleton {
            while shape.len() > 2 && shape.last() == Some(&1) {
                shape.pop();
            }
        }

        let (rows, cols) = match shape.as_slice() {
            [rows] => (*rows, 1),
            [rows, cols] => (*rows, *cols),
            _ => {
                return Err(CsmError::data_load(
                    source,
                    format!("feature array has shape {:?}, expected [N, F]", self.shape),
                ))
            }
        };

        if rows * cols != self.data.len() {
            return Err(CsmError::data_load(
                source,
                format!(
                    "feature array declares shape {:?} but holds {} values",
                    self.shape,
                    self.data.len()
                ),
            ));
        }

        FeatureMatrix::from_shape_vec(key, rows, cols, self.data)
    }
}
