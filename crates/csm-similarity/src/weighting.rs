// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ROI member weighting schemes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use csm_surface::{CsmError, CsmResult};

/// How each ROI member contributes to the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Every ROI member counts equally
    Uniform,
    /// Weight decays with distance from the seed vertex: `exp(-d² / 2)`
    #[default]
    Gaussian,
}

impl Weighting {
    pub const ALL: [Weighting; 2] = [Weighting::Uniform, Weighting::Gaussian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weighting::Uniform => "uniform",
            Weighting::Gaussian => "gaussian",
        }
    }

    /// Weight of an ROI member at `distance` from the seed
    #[inline]
    pub fn weight(&self, distance: f64) -> f64 {
        match self {
            Weighting::Uniform => 1.0,
            Weighting::Gaussian => (-(distance * distance) / 2.0).exp(),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weighting {
    type Err = CsmError;

    fn from_str(s: &str) -> CsmResult<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(Weighting::Uniform),
            "gaussian" => Ok(Weighting::Gaussian),
            _ => Err(CsmError::validation("weighting", s, "one of uniform, gaussian")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("uniform".parse::<Weighting>().unwrap(), Weighting::Uniform);
        assert_eq!("Gaussian".parse::<Weighting>().unwrap(), Weighting::Gaussian);
    }

    #[test]
    fn test_unknown_tag_is_validation_error() {
        let err = "invalid".parse::<Weighting>().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid weighting = invalid: expected one of uniform, gaussian"
        );
    }

    #[test]
    fn test_weights() {
        assert_eq!(Weighting::Uniform.weight(3.0), 1.0);
        assert_eq!(Weighting::Gaussian.weight(0.0), 1.0);
        assert!((Weighting::Gaussian.weight(2.0) - (-2.0f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_display_and_serde_agree() {
        for weighting in Weighting::ALL {
            let json = serde_json::to_string(&weighting).unwrap();
            assert_eq!(json, format!("\"{}\"", weighting));
        }
    }
}
