// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CSM Surface

Data model for the cross-species mapper:
- Surface keys (`Species` × `Side`)
- Immutable meshes with a lazily built spatial index
- Per-vertex feature matrices
- The `CsmError` taxonomy shared by loaders and the similarity engine
- Volumetric helpers (sphere masks, inverse affine transforms)
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod features;
pub mod mesh;
pub mod spatial;
pub mod types;

pub use error::{CsmError, CsmResult};
pub use features::{row_norms, FeatureMatrix};
pub use mesh::{HemisphereSurface, Mesh};
pub use spatial::{apply_inverse_affine, create_sphere, Neighbourhood, SpatialIndex};
pub use types::{Side, Species, SurfaceKey};
