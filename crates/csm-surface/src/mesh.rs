// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Immutable triangulated cortical surface.

A `Mesh` owns its vertex positions and faces and lazily builds its
`SpatialIndex` on first use. The index shares the mesh's lifetime; meshes
are never mutated after construction, so the index is never rebuilt.
*/

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CsmError, CsmResult};
use crate::spatial::SpatialIndex;
use crate::types::SurfaceKey;

/// Triangulated hemispheric surface
#[derive(Debug)]
pub struct Mesh {
    key: SurfaceKey,
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    index: OnceCell<SpatialIndex>,
}

impl Mesh {
    /// Build a mesh, checking that it is non-empty, finite, and that every
    /// face references an existing vertex
    ///
    /// # Errors
    ///
    /// `DataLoad`, since a malformed mesh always comes from a malformed source.
    pub fn new(key: SurfaceKey, vertices: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> CsmResult<Self> {
        let source = format!("{} surface", key);
        if vertices.is_empty() {
            return Err(CsmError::data_load(source, "point set is empty"));
        }
        if let Some(i) = vertices.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(CsmError::data_load(
                source,
                format!("vertex {} has non-finite coordinates {:?}", i, vertices[i]),
            ));
        }
        let vertex_count = vertices.len();
        if let Some((f, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.iter().any(|&v| v as usize >= vertex_count))
        {
            return Err(CsmError::data_load(
                source,
                format!(
                    "face {} {:?} references a vertex outside 0..{}",
                    f, face, vertex_count
                ),
            ));
        }

        Ok(Self {
            key,
            vertices,
            faces,
            index: OnceCell::new(),
        })
    }

    pub fn key(&self) -> SurfaceKey {
        self.key
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> Option<&[f64; 3]> {
        self.vertices.get(index)
    }

    /// Spatial index over the vertices, built on first call
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.index.get_or_init(|| {
            debug!(surface = %self.key, vertices = self.vertices.len(), "Building spatial index");
            SpatialIndex::build(&self.vertices)
        })
    }

    /// Serializable view of the mesh
    pub fn to_hemisphere(&self) -> HemisphereSurface {
        HemisphereSurface {
            name: self.key.to_string(),
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
        }
    }
}

/// Hemisphere payload handed to visualization clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemisphereSurface {
    pub name: String,
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}
