// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Seed-to-surface similarity across species and hemispheres.

`CrossSpeciesMapper` ties the stores to the engine: it resolves the seed
mesh and features, then computes the similarity vector against one target
surface or against every known surface.
*/

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use csm_config::CsmConfig;
use csm_store::{FeatureStore, MeshStore};
use csm_surface::{CsmError, CsmResult, HemisphereSurface, SurfaceKey};

use crate::engine::compute_similarity;
use crate::result::SimilarityResult;
use crate::weighting::Weighting;

/// Default ROI radius in mesh units
pub const DEFAULT_ROI_RADIUS: f64 = 5.0;

pub struct CrossSpeciesMapper {
    meshes: MeshStore,
    features: FeatureStore,
    roi_radius: f64,
    weighting: Weighting,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl CrossSpeciesMapper {
    pub fn new(meshes: MeshStore, features: FeatureStore) -> Self {
        Self {
            meshes,
            features,
            roi_radius: DEFAULT_ROI_RADIUS,
            weighting: Weighting::Gaussian,
            parallel: true,
        }
    }

    /// File-backed mapper using the `[data]` and `[similarity]` sections
    ///
    /// # Errors
    ///
    /// `Validation` if the configured weighting tag or radius is not usable.
    pub fn from_config(config: &CsmConfig) -> CsmResult<Self> {
        let weighting: Weighting = config.similarity.weighting.parse()?;
        let roi_radius = config.similarity.roi_radius;
        if !(roi_radius.is_finite() && roi_radius > 0.0) {
            return Err(CsmError::validation("roi_radius", roi_radius, "a positive finite radius"));
        }

        Ok(Self::new(MeshStore::from_config(config), FeatureStore::from_config(config))
            .with_roi_radius(roi_radius)
            .with_weighting(weighting)
            .with_parallel(config.similarity.parallel))
    }

    pub fn with_roi_radius(mut self, roi_radius: f64) -> Self {
        self.roi_radius = roi_radius;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Fan out over targets with rayon (only with the `parallel` feature)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn roi_radius(&self) -> f64 {
        self.roi_radius
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn meshes(&self) -> &MeshStore {
        &self.meshes
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    /// Similarity of `seed_vertex` on `seed_key` to every vertex of `target_key`
    pub fn similarity_to(
        &self,
        seed_key: SurfaceKey,
        seed_vertex: usize,
        target_key: SurfaceKey,
    ) -> CsmResult<SimilarityResult> {
        let seed_mesh = self.meshes.get_mesh(seed_key)?;
        let seed_features = self.features.get_features(seed_key)?;
        let target_features = self.features.get_features(target_key)?;

        compute_similarity(
            seed_vertex,
            &seed_mesh,
            &seed_features,
            &target_features,
            self.roi_radius,
            self.weighting,
        )
    }

    /// Similarity of `seed_vertex` on `seed_key` to every known surface
    ///
    /// Fails as a whole if any target fails; no partial map is returned.
    pub fn similarity_to_all(
        &self,
        seed_key: SurfaceKey,
        seed_vertex: usize,
    ) -> CsmResult<BTreeMap<SurfaceKey, SimilarityResult>> {
        info!(
            species = %seed_key.species,
            side = %seed_key.side,
            seed_vertex,
            roi_radius = self.roi_radius,
            weighting = %self.weighting,
            "Computing similarity to all surfaces"
        );

        let compute = |target: &SurfaceKey| {
            self.similarity_to(seed_key, seed_vertex, *target)
                .map(|result| (*target, result))
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            let results: Vec<CsmResult<(SurfaceKey, SimilarityResult)>> =
                SurfaceKey::ALL.par_iter().map(compute).collect();
            return results.into_iter().collect();
        }

        SurfaceKey::ALL.iter().map(compute).collect()
    }

    /// Serializable geometry for `key`
    pub fn hemisphere(&self, key: SurfaceKey) -> CsmResult<HemisphereSurface> {
        Ok(self.meshes.get_mesh(key)?.to_hemisphere())
    }
}
