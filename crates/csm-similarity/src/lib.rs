// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# CSM Similarity

Spatial similarity between cortical surfaces.

Given a seed vertex, the seed mesh's features inside a Euclidean ROI are
compared against every vertex of a target feature matrix. Cosine
similarities are stabilized, Fisher z-transformed and averaged over the ROI
with uniform or gaussian weights.

## Usage

```rust,no_run
use csm_config::load_config;
use csm_similarity::CrossSpeciesMapper;
use csm_surface::SurfaceKey;

let config = load_config(None, None).expect("Failed to load config");
let mapper = CrossSpeciesMapper::from_config(&config).expect("Invalid similarity settings");

let seed: SurfaceKey = "human_left".parse().expect("Unknown surface");
let maps = mapper.similarity_to_all(seed, 5120).expect("Similarity failed");
for (target, values) in &maps {
    println!("{}: best match at vertex {:?}", target, values.argmax());
}
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cross_species;
pub mod engine;
pub mod numeric;
pub mod result;
pub mod weighting;

pub use cross_species::{CrossSpeciesMapper, DEFAULT_ROI_RADIUS};
pub use engine::compute_similarity;
pub use numeric::{stabilized_fisher_z, CORRELATION_CLAMP};
pub use result::SimilarityResult;
pub use weighting::Weighting;
