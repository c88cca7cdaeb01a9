// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Memoized mesh loading.

`MeshStore` loads a `Mesh` the first time its key is requested and hands out
the same `Arc<Mesh>` for the rest of the process. Meshes are never reloaded;
a changed source requires a restart.
*/

use std::sync::Arc;

use tracing::{debug, error, info};

use csm_config::CsmConfig;
use csm_surface::{CsmError, CsmResult, Mesh, SurfaceKey};

use crate::cache::KeyedCache;
use crate::source::{FileSystemSource, SurfaceSource};

pub struct MeshStore {
    source: Arc<dyn SurfaceSource>,
    expected_vertex_count: Option<usize>,
    cache: KeyedCache<SurfaceKey, Mesh>,
}

impl MeshStore {
    pub fn new(source: Arc<dyn SurfaceSource>) -> Self {
        Self {
            source,
            expected_vertex_count: None,
            cache: KeyedCache::new(),
        }
    }

    /// Reject meshes whose vertex count differs from `count`
    pub fn with_expected_vertex_count(mut self, count: Option<usize>) -> Self {
        self.expected_vertex_count = count;
        self
    }

    /// File-backed store using the configured data directory and templates
    pub fn from_config(config: &CsmConfig) -> Self {
        Self::new(Arc::new(FileSystemSource::from_config(config)))
            .with_expected_vertex_count(config.data.expected_vertex_count())
    }

    /// Mesh for `key`, loading it on first request
    ///
    /// Concurrent first callers for the same key share a single load.
    ///
    /// # Errors
    ///
    /// `DataLoad` if the source cannot supply the surface or the surface is malformed.
    pub fn get_mesh(&self, key: SurfaceKey) -> CsmResult<Arc<Mesh>> {
        if let Some(mesh) = self.cache.get(&key) {
            debug!(species = %key.species, side = %key.side, "Mesh cache hit");
            return Ok(mesh);
        }

        self.cache.get_or_try_init(key, || self.load(key)).map_err(|e| {
            error!(species = %key.species, side = %key.side, error = %e, "Mesh load failed");
            e
        })
    }

    /// Mesh by `"{species}_{side}"` name
    ///
    /// # Errors
    ///
    /// `DataLoad` for an unrecognized name, otherwise as [`MeshStore::get_mesh`].
    pub fn get_mesh_by_name(&self, name: &str) -> CsmResult<Arc<Mesh>> {
        let key: SurfaceKey = name
            .parse()
            .map_err(|_| CsmError::data_load(format!("{} surface", name), "unrecognized surface key"))?;
        self.get_mesh(key)
    }

    /// Number of meshes currently loaded
    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    fn load(&self, key: SurfaceKey) -> CsmResult<Mesh> {
        let mesh = self.source.load_surface(key)?.into_mesh(key)?;

        if let Some(expected) = self.expected_vertex_count {
            if mesh.vertex_count() != expected {
                return Err(CsmError::data_load(
                    format!("{} surface", key),
                    format!("expected {} vertices, found {}", expected, mesh.vertex_count()),
                ));
            }
        }

        info!(
            species = %key.species,
            side = %key.side,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Loaded mesh"
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::GeometryContainer;
    use crate::source::InMemorySource;
    use csm_surface::{Side, Species};

    fn key() -> SurfaceKey {
        SurfaceKey::new(Species::Human, Side::Left)
    }

    fn store() -> MeshStore {
        let container = GeometryContainer::from_mesh_parts(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        );
        MeshStore::new(Arc::new(InMemorySource::new().with_surface(key(), container)))
    }

    #[test]
    fn test_get_mesh_returns_cached_instance() {
        let store = store();

        let first = store.get_mesh(key()).unwrap();
        let second = store.get_mesh(key()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loaded_count(), 1);
    }

    #[test]
    fn test_get_mesh_by_name() {
        let store = store();
        assert_eq!(store.get_mesh_by_name("human_left").unwrap().vertex_count(), 3);

        let err = store.get_mesh_by_name("mouse_left").unwrap_err();
        assert!(err.is_data_load());
    }

    #[test]
    fn test_missing_key_is_data_load_error() {
        let store = store();
        let err = store
            .get_mesh(SurfaceKey::new(Species::Macaque, Side::Right))
            .unwrap_err();
        assert!(err.is_data_load());
        assert_eq!(store.loaded_count(), 0);
    }

    #[test]
    fn test_vertex_count_mismatch_is_data_load_error() {
        let store = store().with_expected_vertex_count(Some(10242));
        let err = store.get_mesh(key()).unwrap_err();
        assert!(err.is_data_load());
        assert!(err.to_string().contains("expected 10242 vertices"));
    }
}
