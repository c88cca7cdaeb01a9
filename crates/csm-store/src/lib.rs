// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CSM Store

Loading and process-wide caching of meshes and feature matrices.

- `container`: source payload formats (intent-tagged geometry arrays, feature arrays)
- `source`: `SurfaceSource` / `FeatureSource` contracts and the filesystem and in-memory sources
- `cache`: `KeyedCache`, a concurrent map of single-initialization cells
- `MeshStore` / `FeatureStore`: at-most-once loading per surface key
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cache;
pub mod container;
pub mod feature_store;
pub mod mesh_store;
pub mod source;

pub use cache::KeyedCache;
pub use container::{intent, DataArray, FeaturePayload, GeometryContainer};
pub use feature_store::FeatureStore;
pub use mesh_store::MeshStore;
pub use source::{FeatureSource, FileSystemSource, InMemorySource, SurfaceSource};
