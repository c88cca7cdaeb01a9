// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Volumetric grid helpers: spherical masks and world-to-grid coordinates.

Both are pure functions with no shared state.
*/

use glam::{DMat4, DVec3};
use ndarray::{ArrayD, IxDyn};

use crate::error::{CsmError, CsmResult};

const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Boolean mask of grid cells strictly closer than `radius` to `center`
///
/// Cell `(i, j, k, ...)` is at integer coordinates; `grid_size` and `center`
/// must have the same dimensionality.
pub fn create_sphere(grid_size: &[usize], center: &[f64], radius: f64) -> CsmResult<ArrayD<bool>> {
    if grid_size.len() != center.len() {
        return Err(CsmError::validation(
            "center",
            format!("{:?}", center),
            format!("{} coordinates to match grid size {:?}", grid_size.len(), grid_size),
        ));
    }

    let ndim = grid_size.len();
    Ok(ArrayD::from_shape_fn(IxDyn(grid_size), |cell| {
        let squared: f64 = (0..ndim)
            .map(|axis| (cell[axis] as f64 - center[axis]).powi(2))
            .sum();
        squared.sqrt() < radius
    }))
}

/// Map a world-space point to integer grid indices through the inverse of `affine`
///
/// `affine` is the row-major 4x4 grid-to-world matrix; its bottom row must be
/// `[0, 0, 0, 1]`. Indices are rounded to nearest.
pub fn apply_inverse_affine(point: [f64; 3], affine: &[[f64; 4]; 4]) -> CsmResult<[i64; 3]> {
    if affine[3] != [0.0, 0.0, 0.0, 1.0] {
        return Err(CsmError::validation(
            "affine",
            format!("{:?}", affine[3]),
            "a bottom row of [0, 0, 0, 1]",
        ));
    }

    // from_cols_array_2d reads each inner array as a column
    let grid_to_world = DMat4::from_cols_array_2d(affine).transpose();
    let determinant = grid_to_world.determinant();
    if !determinant.is_finite() || determinant.abs() < SINGULAR_DETERMINANT {
        return Err(CsmError::validation(
            "affine",
            format!("determinant {}", determinant),
            "an invertible transform",
        ));
    }

    let grid = grid_to_world
        .inverse()
        .transform_point3(DVec3::from_array(point));
    Ok([
        grid.x.round() as i64,
        grid.y.round() as i64,
        grid.z.round() as i64,
    ])
}
