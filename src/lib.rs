// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # CSM - Cross-Species Mapper
//!
//! Spatial similarity between human and macaque cortical surfaces. Given a
//! seed vertex on one hemisphere, CSM summarizes how well the features of the
//! seed's neighbourhood correlate with every vertex of any target hemisphere.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! csm = "0.1"  # Default: parallel similarity kernels
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): rayon-parallel similarity pass and per-target fan-out
//! - **`file-logging`**: JSON log files with daily rotation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use csm::prelude::*;
//!
//! let config = csm::config::load_config(None, None)?;
//! let mapper = CrossSpeciesMapper::from_config(&config)?;
//!
//! let seed = SurfaceKey::new(Species::Human, Side::Left);
//! let maps = mapper.similarity_to_all(seed, 5120)?;
//! println!("{}", serde_json::to_string(&maps)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: csm-config, csm-observability              │
//! │  (TOML configuration, tracing setup)                    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Data model: csm-surface                                │
//! │  (SurfaceKey, Mesh, FeatureMatrix, SpatialIndex)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Loading: csm-store                                     │
//! │  (Sources, MeshStore, FeatureStore)                     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: csm-similarity                             │
//! │  (compute_similarity, CrossSpeciesMapper)               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use csm_config as config;
pub use csm_observability as observability;
pub use csm_similarity as similarity;
pub use csm_store as store;
pub use csm_surface as surface;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::similarity::{compute_similarity, CrossSpeciesMapper, SimilarityResult, Weighting};
    pub use crate::store::{FeatureSource, FeatureStore, MeshStore, SurfaceSource};
    pub use crate::surface::{
        CsmError, CsmResult, FeatureMatrix, Mesh, Side, SpatialIndex, Species, SurfaceKey,
    };
}
