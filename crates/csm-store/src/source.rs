// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Where surfaces and features come from.

Stores only talk to the `SurfaceSource` and `FeatureSource` traits, so the
file layout, a remote service, or a test fixture can be swapped freely.
*/

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use csm_config::CsmConfig;
use csm_surface::{CsmError, CsmResult, SurfaceKey};

use crate::container::{FeaturePayload, GeometryContainer};

/// Supplies geometry containers by key
pub trait SurfaceSource: Send + Sync {
    fn load_surface(&self, key: SurfaceKey) -> CsmResult<GeometryContainer>;
}

/// Supplies feature payloads by key
pub trait FeatureSource: Send + Sync {
    fn load_features(&self, key: SurfaceKey) -> CsmResult<FeaturePayload>;
}

/// JSON files under a data directory, named by `{species}`/`{side}` templates
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    data_dir: PathBuf,
    surface_template: String,
    feature_template: String,
}

impl FileSystemSource {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        surface_template: impl Into<String>,
        feature_template: impl Into<String>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            surface_template: surface_template.into(),
            feature_template: feature_template.into(),
        }
    }

    pub fn from_config(config: &CsmConfig) -> Self {
        Self::new(
            config.system.data_dir.clone(),
            config.data.surface_file_template.clone(),
            config.data.feature_file_template.clone(),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn surface_path(&self, key: SurfaceKey) -> PathBuf {
        self.data_dir.join(key.render_template(&self.surface_template))
    }

    pub fn feature_path(&self, key: SurfaceKey) -> PathBuf {
        self.data_dir.join(key.render_template(&self.feature_template))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CsmResult<T> {
    debug!(path = %path.display(), "Reading source file");
    let source = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| CsmError::data_load(&source, e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CsmError::data_load(&source, e.to_string()))
}

impl SurfaceSource for FileSystemSource {
    fn load_surface(&self, key: SurfaceKey) -> CsmResult<GeometryContainer> {
        read_json(&self.surface_path(key))
    }
}

impl FeatureSource for FileSystemSource {
    fn load_features(&self, key: SurfaceKey) -> CsmResult<FeaturePayload> {
        read_json(&self.feature_path(key))
    }
}

/// Preloaded payloads, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    surfaces: HashMap<SurfaceKey, GeometryContainer>,
    features: HashMap<SurfaceKey, FeaturePayload>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, key: SurfaceKey, container: GeometryContainer) -> Self {
        self.surfaces.insert(key, container);
        self
    }

    pub fn with_features(mut self, key: SurfaceKey, payload: FeaturePayload) -> Self {
        self.features.insert(key, payload);
        self
    }
}

impl SurfaceSource for InMemorySource {
    fn load_surface(&self, key: SurfaceKey) -> CsmResult<GeometryContainer> {
        self.surfaces
            .get(&key)
            .cloned()
            .ok_or_else(|| CsmError::data_load(format!("{} surface", key), "no surface registered"))
    }
}

impl FeatureSource for InMemorySource {
    fn load_features(&self, key: SurfaceKey) -> CsmResult<FeaturePayload> {
        self.features
            .get(&key)
            .cloned()
            .ok_or_else(|| CsmError::data_load(format!("{} features", key), "no features registered"))
    }
}
