// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Numeric kernels of the similarity pipeline.

Per element, in this order:
1. cosine similarity `dot / (|a|·|b|)`
2. non-finite (zero-norm rows) → 0
3. clamp to `[-CORRELATION_CLAMP, CORRELATION_CLAMP]`
4. Fisher z-transform (`atanh`)

Then the ROI axis is reduced with a weighted mean.
*/

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::weighting::Weighting;

/// Largest absolute correlation passed to `atanh`
pub const CORRELATION_CLAMP: f64 = 0.9999;

/// Fisher z of the cosine similarity given a dot product and the product of both norms
#[inline]
pub fn stabilized_fisher_z(dot: f64, norm_product: f64) -> f64 {
    let cosine = dot / norm_product;
    let cosine = if cosine.is_finite() { cosine } else { 0.0 };
    cosine.clamp(-CORRELATION_CLAMP, CORRELATION_CLAMP).atanh()
}

/// Fisher z matrix `[roi.rows() × target.rows()]`
///
/// `roi_norms` and `target_norms` are the row norms of `roi` and `target`.
pub fn fisher_z_matrix(
    roi: ArrayView2<'_, f64>,
    roi_norms: ArrayView1<'_, f64>,
    target: ArrayView2<'_, f64>,
    target_norms: ArrayView1<'_, f64>,
) -> Array2<f64> {
    let mut z = roi.dot(&target.t());

    let zip = Zip::indexed(&mut z);
    let kernel = |(i, j): (usize, usize), value: &mut f64| {
        *value = stabilized_fisher_z(*value, roi_norms[i] * target_norms[j]);
    };

    #[cfg(feature = "parallel")]
    zip.par_for_each(kernel);
    #[cfg(not(feature = "parallel"))]
    zip.for_each(kernel);

    z
}

/// Per-member weights for the given distances from the seed
pub fn roi_weights(distances: &[f64], weighting: Weighting) -> Array1<f64> {
    distances.iter().map(|&d| weighting.weight(d)).collect()
}

/// Weighted mean over axis 0: `Σᵢ wᵢ zᵢⱼ / Σᵢ wᵢ`
pub fn weighted_column_mean(z: ArrayView2<'_, f64>, weights: ArrayView1<'_, f64>) -> Array1<f64> {
    let total = weights.sum();
    weights.dot(&z) / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn norms(m: &Array2<f64>) -> Array1<f64> {
        csm_surface::row_norms(m.view())
    }

    #[test]
    fn test_zero_norm_maps_to_zero() {
        assert_eq!(stabilized_fisher_z(0.0, 0.0), 0.0);
        assert_eq!(stabilized_fisher_z(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_saturates_at_clamp() {
        let ceiling = CORRELATION_CLAMP.atanh();
        assert_eq!(stabilized_fisher_z(10.0, 10.0), ceiling);
        assert_eq!(stabilized_fisher_z(-10.0, 10.0), -ceiling);
        // rounding above 1 still lands on the ceiling
        assert_eq!(stabilized_fisher_z(10.000000000000002, 10.0), ceiling);
    }

    #[test]
    fn test_inside_clamp_is_plain_atanh() {
        assert!((stabilized_fisher_z(1.0, 2.0) - 0.5f64.atanh()).abs() < 1e-15);
        assert_eq!(stabilized_fisher_z(0.0, 4.0), 0.0);
    }

    #[test]
    fn test_fisher_z_matrix_shape_and_values() {
        let roi = array![[1.0, 0.0], [0.0, 0.0]];
        let target = array![[1.0, 0.0], [0.0, 1.0], [-2.0, 0.0]];

        let z = fisher_z_matrix(roi.view(), norms(&roi).view(), target.view(), norms(&target).view());

        let ceiling = CORRELATION_CLAMP.atanh();
        assert_eq!(z.shape(), &[2, 3]);
        assert_eq!(z.row(0).to_vec(), vec![ceiling, 0.0, -ceiling]);
        assert_eq!(z.row(1).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weighted_column_mean() {
        let z = array![[1.0, 2.0], [3.0, 6.0]];
        let mean = weighted_column_mean(z.view(), array![1.0, 3.0].view());
        assert_eq!(mean, array![2.5, 5.0]);
    }

    #[test]
    fn test_roi_weights() {
        let weights = roi_weights(&[0.0, 1.0], Weighting::Gaussian);
        assert_eq!(weights[0], 1.0);
        assert!((weights[1] - (-0.5f64).exp()).abs() < 1e-15);
        assert_eq!(roi_weights(&[0.0, 5.0], Weighting::Uniform), array![1.0, 1.0]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fisher_z_is_bounded(dot in proptest::num::f64::ANY, norm in proptest::num::f64::ANY) {
                let z = stabilized_fisher_z(dot, norm);
                prop_assert!(z.is_finite());
                prop_assert!(z.abs() <= CORRELATION_CLAMP.atanh());
            }

            #[test]
            fn prop_weighted_mean_of_constant_column(
                weights in prop::collection::vec(0.01f64..10.0, 1..20),
                value in -5.0f64..5.0,
            ) {
                let z = Array2::from_elem((weights.len(), 1), value);
                let mean = weighted_column_mean(z.view(), Array1::from(weights).view());
                prop_assert!((mean[0] - value).abs() < 1e-9);
            }
        }
    }
}
