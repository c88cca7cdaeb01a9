// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spatial utilities over mesh vertices and volumetric grids.

- `index`: k-d tree radius and nearest-vertex queries
- `volume`: spherical grid masks and world-to-grid coordinate transforms
*/

pub mod index;
pub mod volume;

pub use index::{Neighbourhood, SpatialIndex};
pub use volume::{apply_inverse_affine, create_sphere};
