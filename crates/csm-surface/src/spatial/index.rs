// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Euclidean radius queries over mesh vertex positions.

Built once per mesh on an immutable k-d tree: O(n log n) construction,
O(log n + k) per query.
*/

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use std::fmt;

/// Vertices found by a radius query, sorted by (distance, index)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbourhood {
    pub indices: Vec<usize>,
    pub distances: Vec<f64>,
}

impl Neighbourhood {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Iterate `(index, distance)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// Read-only spatial index over a fixed vertex set
pub struct SpatialIndex {
    /// `None` for an empty vertex set
    tree: Option<ImmutableKdTree<f64, 3>>,
    points: Vec<[f64; 3]>,
}

/// Euclidean distance without intermediate underflow or overflow
fn euclidean(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1]).hypot(a[2] - b[2])
}

impl SpatialIndex {
    /// Build the index; vertex `i` is reported as index `i`
    pub fn build(vertices: &[[f64; 3]]) -> Self {
        let tree = if vertices.is_empty() {
            None
        } else {
            Some(ImmutableKdTree::new_from_slice(vertices))
        };
        Self {
            tree,
            points: vertices.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every vertex whose Euclidean distance to `point` is strictly less than `radius`
    ///
    /// Non-positive or non-finite radii and non-finite points yield an empty result.
    pub fn radius_query(&self, point: &[f64; 3], radius: f64) -> Neighbourhood {
        let Some(tree) = &self.tree else {
            return Neighbourhood::default();
        };
        if !(radius.is_finite() && radius > 0.0) || !point.iter().all(|c| c.is_finite()) {
            return Neighbourhood::default();
        }

        // Widened by a few ulp and floored above zero so radius² can neither
        // round nor underflow a hit away; the strict bound is applied on the
        // true distance below.
        let search = (radius * radius * (1.0 + 4.0 * f64::EPSILON)).max(f64::MIN_POSITIVE);
        let mut hits: Vec<(f64, usize)> = tree
            .within_unsorted::<SquaredEuclidean>(point, search)
            .into_iter()
            .map(|neighbour| {
                let index = neighbour.item as usize;
                (euclidean(point, &self.points[index]), index)
            })
            .filter(|(distance, _)| *distance < radius)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let (distances, indices) = hits.into_iter().unzip();
        Neighbourhood { indices, distances }
    }

    /// Closest vertex to `point` and its distance
    pub fn nearest(&self, point: &[f64; 3]) -> Option<(usize, f64)> {
        let tree = self.tree.as_ref()?;
        if !point.iter().all(|c| c.is_finite()) {
            return None;
        }
        let index = tree.nearest_one::<SquaredEuclidean>(point).item as usize;
        Some((index, euclidean(point, &self.points[index])))
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.points.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(n: usize) -> Vec<[f64; 3]> {
        (0..n).map(|i| [i as f64, 0.0, 0.0]).collect()
    }

    fn brute_force(points: &[[f64; 3]], query: &[f64; 3], radius: f64) -> Vec<usize> {
        let mut hits: Vec<(f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let d = ((p[0] - query[0]).powi(2)
                    + (p[1] - query[1]).powi(2)
                    + (p[2] - query[2]).powi(2))
                .sqrt();
                (d, i)
            })
            .filter(|(d, _)| *d < radius)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, i)| i).collect()
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let index = SpatialIndex::build(&line(10));

        let hits = index.radius_query(&[0.0, 0.0, 0.0], 2.0);

        assert_eq!(hits.indices, vec![0, 1]);
        assert_eq!(hits.distances, vec![0.0, 1.0]);
    }

    #[test]
    fn test_self_query_includes_vertex() {
        let index = SpatialIndex::build(&line(5));
        let hits = index.radius_query(&[3.0, 0.0, 0.0], 0.5);
        assert_eq!(hits.indices, vec![3]);
        assert_eq!(hits.distances, vec![0.0]);
    }

    #[test]
    fn test_ties_ordered_by_index() {
        let points = vec![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let index = SpatialIndex::build(&points);

        let hits = index.radius_query(&[0.0, 0.0, 0.0], 1.5);

        assert_eq!(hits.indices, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_degenerate_radius_and_empty_index() {
        let index = SpatialIndex::build(&line(3));
        assert!(index.radius_query(&[0.0, 0.0, 0.0], 0.0).is_empty());
        assert!(index.radius_query(&[0.0, 0.0, 0.0], f64::NAN).is_empty());
        assert!(index.radius_query(&[f64::NAN, 0.0, 0.0], 1.0).is_empty());

        let empty = SpatialIndex::build(&[]);
        assert!(empty.is_empty());
        assert!(empty.radius_query(&[0.0, 0.0, 0.0], 10.0).is_empty());
        assert_eq!(empty.nearest(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_nearest() {
        let index = SpatialIndex::build(&line(10));
        let (vertex, distance) = index.nearest(&[4.2, 0.0, 0.0]).unwrap();
        assert_eq!(vertex, 4);
        assert!((distance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_vertices_beyond_one_leaf() {
        let points = vec![[1.0, 2.0, 3.0]; 500];
        let index = SpatialIndex::build(&points);

        let hits = index.radius_query(&[1.0, 2.0, 3.0], 0.1);

        assert_eq!(hits.indices, (0..500).collect::<Vec<_>>());
        assert!(hits.distances.iter().all(|&d| d == 0.0));
        assert_eq!(index.nearest(&[1.0, 2.0, 3.5]).map(|(_, d)| d), Some(0.5));
    }

    #[test]
    fn test_planar_grid() {
        // every vertex shares z = 0, as on a flattened surface
        let points: Vec<[f64; 3]> = (0..101)
            .flat_map(|x| (0..101).map(move |y| [x as f64, y as f64, 0.0]))
            .collect();
        let index = SpatialIndex::build(&points);

        let center = [50.0, 50.0, 0.0];
        let hits = index.radius_query(&center, 1.5);

        assert_eq!(hits.len(), 9);
        assert_eq!(hits.indices[0], 50 * 101 + 50);
        assert_eq!(hits.indices, brute_force(&points, &center, 1.5));
    }

    #[test]
    fn test_collinear_line_beyond_one_leaf() {
        let points = line(200);
        let index = SpatialIndex::build(&points);

        let hits = index.radius_query(&[100.0, 0.0, 0.0], 3.0);

        assert_eq!(hits.indices, vec![100, 99, 101, 98, 102]);
    }

    #[test]
    fn test_tiny_radius_keeps_query_vertex() {
        let index = SpatialIndex::build(&line(3));

        let hits = index.radius_query(&[0.0, 0.0, 0.0], 1e-200);

        assert_eq!(hits.indices, vec![0]);
        assert_eq!(hits.distances, vec![0.0]);
    }

    #[test]
    fn test_tiny_radius_excludes_tiny_offsets() {
        let points = vec![[0.0, 0.0, 0.0], [1e-190, 0.0, 0.0], [0.0, 1e-210, 0.0]];
        let index = SpatialIndex::build(&points);

        let hits = index.radius_query(&[0.0, 0.0, 0.0], 1e-200);

        assert_eq!(hits.indices, vec![0, 2]);
        assert_eq!(hits.distances, vec![0.0, 1e-210]);
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            points in prop::collection::vec(
                (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| [x, y, z]),
                1..150,
            ),
            query_idx in any::<prop::sample::Index>(),
            radius in 0.01f64..8.0,
        ) {
            let index = SpatialIndex::build(&points);
            let query = points[query_idx.index(points.len())];

            let hits = index.radius_query(&query, radius);

            prop_assert_eq!(&hits.indices, &brute_force(&points, &query, radius));
            prop_assert!(hits.distances.iter().all(|d| *d < radius));
        }

        #[test]
        fn prop_self_query_contains_vertex(
            points in prop::collection::vec(
                (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| [x, y, z]),
                1..150,
            ),
            query_idx in any::<prop::sample::Index>(),
            radius in prop_oneof![1e-300f64..1e-150, 1e-6f64..5.0],
        ) {
            let index = SpatialIndex::build(&points);
            let v = query_idx.index(points.len());

            let hits = index.radius_query(&points[v], radius);

            prop_assert!(hits.iter().any(|(i, d)| i == v && d == 0.0));
        }
    }
}
