// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, CsmConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Find the CSM configuration file
///
/// Search order:
/// 1. `CSM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./csm_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("CSM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by CSM_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet CSM_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Call [`crate::validate_config`] on the result before use.
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CsmConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CsmConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Parse a radius override, warning when the value is rejected
fn parse_radius(source: &str, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(radius) => Some(radius),
        Err(e) => {
            warn!(
                source,
                value,
                error = %e,
                "Ignoring unparseable roi_radius override"
            );
            None
        }
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CSM_ENVIRONMENT` -> `system.environment`
/// - `CSM_DATA_DIR` -> `system.data_dir`
/// - `CSM_LOG_LEVEL` -> `system.log_level`
/// - `CSM_ROI_RADIUS` -> `similarity.roi_radius`
/// - `CSM_WEIGHTING` -> `similarity.weighting`
/// - `CSM_PARALLEL` -> `similarity.parallel`
pub fn apply_environment_overrides(config: &mut CsmConfig) {
    if let Ok(value) = env::var("CSM_ENVIRONMENT") {
        config.system.environment = value;
    }
    if let Ok(value) = env::var("CSM_DATA_DIR") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("CSM_LOG_LEVEL") {
        config.system.log_level = value;
    }
    if let Ok(value) = env::var("CSM_ROI_RADIUS") {
        if let Some(radius) = parse_radius("CSM_ROI_RADIUS", &value) {
            config.similarity.roi_radius = radius;
        }
    }
    if let Ok(value) = env::var("CSM_WEIGHTING") {
        config.similarity.weighting = value;
    }
    if let Ok(value) = env::var("CSM_PARALLEL") {
        config.similarity.parallel = parse_flag(&value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"roi_radius": "3.0", "weighting": "uniform"}`)
pub fn apply_cli_overrides(config: &mut CsmConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("data_dir") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }
    if let Some(value) = cli_args.get("roi_radius") {
        if let Some(radius) = parse_radius("roi_radius", value) {
            config.similarity.roi_radius = radius;
        }
    }
    if let Some(value) = cli_args.get("weighting") {
        config.similarity.weighting = value.clone();
    }
    if let Some(value) = cli_args.get("parallel") {
        config.similarity.parallel = parse_flag(value);
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
}
