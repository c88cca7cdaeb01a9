// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Memoized per-vertex feature matrices, one per surface key.

use std::sync::Arc;

use tracing::{debug, error, info};

use csm_config::CsmConfig;
use csm_surface::{CsmError, CsmResult, FeatureMatrix, SurfaceKey};

use crate::cache::KeyedCache;
use crate::source::{FeatureSource, FileSystemSource};

pub struct FeatureStore {
    source: Arc<dyn FeatureSource>,
    expected_vertex_count: Option<usize>,
    remove_singleton: bool,
    cache: KeyedCache<SurfaceKey, FeatureMatrix>,
}

impl FeatureStore {
    pub fn new(source: Arc<dyn FeatureSource>) -> Self {
        Self {
            source,
            expected_vertex_count: None,
            remove_singleton: true,
            cache: KeyedCache::new(),
        }
    }

    pub fn with_expected_vertex_count(mut self, count: Option<usize>) -> Self {
        self.expected_vertex_count = count;
        self
    }

    pub fn with_remove_singleton(mut self, remove_singleton: bool) -> Self {
        self.remove_singleton = remove_singleton;
        self
    }

    pub fn from_config(config: &CsmConfig) -> Self {
        Self::new(Arc::new(FileSystemSource::from_config(config)))
            .with_expected_vertex_count(config.data.expected_vertex_count())
            .with_remove_singleton(config.data.remove_singleton)
    }

    /// Feature matrix for `key`, loading it on first request
    pub fn get_features(&self, key: SurfaceKey) -> CsmResult<Arc<FeatureMatrix>> {
        if let Some(features) = self.cache.get(&key) {
            debug!(species = %key.species, side = %key.side, "Feature cache hit");
            return Ok(features);
        }

        self.cache.get_or_try_init(key, || self.load(key)).map_err(|e| {
            error!(species = %key.species, side = %key.side, error = %e, "Feature load failed");
            e
        })
    }

    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    fn load(&self, key: SurfaceKey) -> CsmResult<FeatureMatrix> {
        let features = self
            .source
            .load_features(key)?
            .into_matrix(key, self.remove_singleton)?;

        if let Some(expected) = self.expected_vertex_count {
            if features.rows() != expected {
                return Err(CsmError::data_load(
                    format!("{} features", key),
                    format!("expected {} rows, found {}", expected, features.rows()),
                ));
            }
        }

        info!(
            species = %key.species,
            side = %key.side,
            rows = features.rows(),
            feature_dim = features.cols(),
            "Loaded features"
        );
        Ok(features)
    }
}
