// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error taxonomy shared by the loaders and the similarity engine.

Two categories exist:
- `DataLoad`: a source payload is missing required arrays or is malformed.
  Source data is static per process, so these are never retried.
- `Validation`: a caller-supplied value is out of range or unrecognized.
*/

/// Result type for surface operations
pub type CsmResult<T> = Result<T, CsmError>;

/// Errors surfaced by loaders and the similarity engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsmError {
    #[error("Failed to load {source_name}: {reason}")]
    DataLoad { source_name: String, reason: String },

    #[error("Invalid {field} = {value}: expected {expected}")]
    Validation {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl CsmError {
    pub fn data_load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CsmError::DataLoad {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(
        field: &'static str,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        CsmError::Validation {
            field,
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub fn is_data_load(&self) -> bool {
        matches!(self, CsmError::DataLoad { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CsmError::Validation { .. })
    }
}
