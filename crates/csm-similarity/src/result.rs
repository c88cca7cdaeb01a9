// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// One similarity value per target vertex, in target vertex order
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityResult {
    values: Vec<f64>,
}

impl SimilarityResult {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, vertex: usize) -> Option<f64> {
        self.values.get(vertex).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Target vertex with the highest similarity
    pub fn argmax(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(vertex, _)| vertex)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl From<Array1<f64>> for SimilarityResult {
    fn from(values: Array1<f64>) -> Self {
        Self::new(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_array() {
        let result = SimilarityResult::new(vec![0.5, -1.0]);
        assert_eq!(serde_json::to_string(&result).unwrap(), "[0.5,-1.0]");
    }

    #[test]
    fn test_argmax() {
        assert_eq!(SimilarityResult::new(vec![0.1, 0.7, 0.3]).argmax(), Some(1));
        assert_eq!(SimilarityResult::default().argmax(), None);
    }
}
