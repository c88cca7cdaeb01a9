// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within valid ranges.

use crate::{ConfigError, ConfigResult, CsmConfig};

/// Weighting tags accepted by the similarity engine
pub const KNOWN_WEIGHTINGS: &[&str] = &["uniform", "gaussian"];

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];
const KNOWN_LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields
/// - File name templates carrying both placeholders
/// - Similarity parameters the engine accepts
/// - Known log levels and formats
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &CsmConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_templates(config, &mut errors);
    validate_similarity(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &CsmConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.system.data_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "system.data_dir".to_string(),
        });
    }
    if config.system.environment.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "system.environment".to_string(),
        });
    }
}

fn validate_templates(config: &CsmConfig, errors: &mut Vec<ConfigValidationError>) {
    let templates = [
        ("data.surface_file_template", &config.data.surface_file_template),
        ("data.feature_file_template", &config.data.feature_file_template),
    ];
    for (field, template) in templates {
        for placeholder in ["{species}", "{side}"] {
            if !template.contains(placeholder) {
                errors.push(ConfigValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{}' is missing the {} placeholder", template, placeholder),
                });
            }
        }
    }
}

fn validate_similarity(config: &CsmConfig, errors: &mut Vec<ConfigValidationError>) {
    let radius = config.similarity.roi_radius;
    if !radius.is_finite() || radius <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "similarity.roi_radius".to_string(),
            reason: format!("{} must be a finite positive number", radius),
        });
    }

    let weighting = config.similarity.weighting.to_lowercase();
    if !KNOWN_WEIGHTINGS.contains(&weighting.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "similarity.weighting".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.similarity.weighting,
                KNOWN_WEIGHTINGS.join(", ")
            ),
        });
    }
}

fn validate_logging(config: &CsmConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.system.log_level.to_lowercase();
    if !KNOWN_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "system.log_level".to_string(),
            reason: format!("unknown log level '{}'", config.system.log_level),
        });
    }

    let format = config.logging.format.to_lowercase();
    if !KNOWN_LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("unknown log format '{}'", config.logging.format),
        });
    }
}
