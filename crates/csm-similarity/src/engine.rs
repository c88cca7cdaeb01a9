// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Seed-ROI similarity between two feature matrices.

Pipeline:
1. ROI = seed-mesh vertices strictly within `roi_radius` of the seed vertex
2. gather the ROI rows of the seed features
3. stabilized Fisher z of the cosine similarity of every ROI row against every target row
4. weight each ROI member by its distance from the seed
5. weighted mean over the ROI, one value per target vertex

All inputs are checked before any numeric work starts.
*/

use tracing::{debug, error};

use csm_surface::{CsmError, CsmResult, FeatureMatrix, Mesh};

use crate::numeric::{fisher_z_matrix, roi_weights, weighted_column_mean};
use crate::result::SimilarityResult;
use crate::weighting::Weighting;

/// Similarity of the seed vertex's neighbourhood to every target vertex
///
/// Returns a vector with one entry per row of `target_features`.
///
/// # Errors
///
/// `Validation` if `roi_radius` is not a positive finite number, `seed_vertex`
/// is not a vertex of `seed_mesh`, `seed_features` is not aligned with
/// `seed_mesh`, or the two feature matrices have different widths.
pub fn compute_similarity(
    seed_vertex: usize,
    seed_mesh: &Mesh,
    seed_features: &FeatureMatrix,
    target_features: &FeatureMatrix,
    roi_radius: f64,
    weighting: Weighting,
) -> CsmResult<SimilarityResult> {
    validate_inputs(seed_vertex, seed_mesh, seed_features, target_features, roi_radius).map_err(|e| {
        error!(seed_vertex, surface = %seed_mesh.key(), error = %e, "Rejected similarity request");
        e
    })?;

    let seed_point = seed_mesh.vertices()[seed_vertex];
    let roi = seed_mesh.spatial_index().radius_query(&seed_point, roi_radius);
    debug!(
        seed_vertex,
        surface = %seed_mesh.key(),
        target = %target_features.key(),
        roi_size = roi.len(),
        weighting = %weighting,
        "Selected ROI"
    );

    let roi_features = seed_features.select_rows(&roi.indices);
    let roi_norms = csm_surface::row_norms(roi_features.view());
    let target_norms = target_features.row_norms();

    let z = fisher_z_matrix(
        roi_features.view(),
        roi_norms.view(),
        target_features.view(),
        target_norms.view(),
    );
    let weights = roi_weights(&roi.distances, weighting);

    Ok(weighted_column_mean(z.view(), weights.view()).into())
}

fn validate_inputs(
    seed_vertex: usize,
    seed_mesh: &Mesh,
    seed_features: &FeatureMatrix,
    target_features: &FeatureMatrix,
    roi_radius: f64,
) -> CsmResult<()> {
    if !(roi_radius.is_finite() && roi_radius > 0.0) {
        return Err(CsmError::validation("roi_radius", roi_radius, "a positive finite radius"));
    }

    let vertex_count = seed_mesh.vertex_count();
    if seed_vertex >= vertex_count {
        return Err(CsmError::validation(
            "seed_vertex",
            seed_vertex,
            format!("< {} (vertices of {})", vertex_count, seed_mesh.key()),
        ));
    }

    if seed_features.rows() != vertex_count {
        return Err(CsmError::validation(
            "seed_features.rows",
            seed_features.rows(),
            format!("{} rows to match the {} mesh", vertex_count, seed_mesh.key()),
        ));
    }

    if seed_features.cols() != target_features.cols() {
        return Err(CsmError::validation(
            "target_features.cols",
            target_features.cols(),
            format!("{} columns to match the seed features", seed_features.cols()),
        ));
    }

    Ok(())
}
