// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `csm_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vertex count of the fs_LR 10k meshes shipped for every species and hemisphere
pub const FS_LR_10K_VERTEX_COUNT: usize = 10242;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CsmConfig {
    pub system: SystemConfig,
    pub data: DataConfig,
    pub similarity: SimilarityConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
        }
    }
}

/// Surface and feature file layout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// File name template for surfaces; `{species}` and `{side}` are substituted
    pub surface_file_template: String,
    /// File name template for feature matrices
    pub feature_file_template: String,
    /// Required row count for meshes and feature matrices (0 disables the check)
    pub expected_vertex_count: usize,
    /// Squeeze trailing singleton dimensions from feature payloads
    pub remove_singleton: bool,
}

impl DataConfig {
    /// Expected vertex count, `None` when the check is disabled
    pub fn expected_vertex_count(&self) -> Option<usize> {
        match self.expected_vertex_count {
            0 => None,
            count => Some(count),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            surface_file_template: "{species}_{side}_inflated_10k_fs_lr.surf.json".to_string(),
            feature_file_template: "{species}_{side}_gradient_10k_fs_lr.json".to_string(),
            expected_vertex_count: FS_LR_10K_VERTEX_COUNT,
            remove_singleton: true,
        }
    }
}

/// Similarity computation defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// ROI radius in mesh units
    pub roi_radius: f64,
    /// Weighting tag ("uniform" or "gaussian"), resolved when the mapper is built
    pub weighting: String,
    /// Compute targets in parallel
    pub parallel: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            roi_radius: 5.0,
            weighting: "gaussian".to_string(),
            parallel: true,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "text" or "json"
    pub format: String,
    /// Base directory for file logs (file logging is off when unset)
    pub log_dir: Option<PathBuf>,
    /// Number of most recent run folders kept in `log_dir`
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            log_dir: None,
            retention_runs: 10,
        }
    }
}
