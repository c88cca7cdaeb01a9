// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// End-to-end tests for the similarity pipeline
///
/// A configuration file points at a temporary data directory holding
/// surfaces and features for all four hemispheres; the mapper is built from
/// that configuration exactly as the command-line tool builds it.
use csm::config::{load_config, validate_config};
use csm::prelude::*;
use csm::similarity::CORRELATION_CLAMP;
use csm::store::{FeaturePayload, GeometryContainer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Latitude/longitude grid on a sphere of the given radius
fn uv_sphere(rings: usize, segments: usize, radius: f64) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let mut vertices = Vec::new();
    for r in 1..rings {
        let phi = std::f64::consts::PI * r as f64 / rings as f64;
        for s in 0..segments {
            let theta = 2.0 * std::f64::consts::PI * s as f64 / segments as f64;
            vertices.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ]);
        }
    }
    let mut faces = Vec::new();
    for r in 0..rings - 2 {
        for s in 0..segments {
            let a = (r * segments + s) as u32;
            let b = (r * segments + (s + 1) % segments) as u32;
            let c = a + segments as u32;
            let d = b + segments as u32;
            faces.push([a, b, c]);
            faces.push([b, d, c]);
        }
    }
    (vertices, faces)
}

fn write_dataset(dir: &Path, vertex_feature: impl Fn(&[f64; 3]) -> Vec<f64>) -> usize {
    let (vertices, faces) = uv_sphere(12, 16, 40.0);
    for key in SurfaceKey::ALL {
        let surface = GeometryContainer::from_mesh_parts(&vertices, &faces);
        fs::write(
            dir.join(format!("{}.surf.json", key)),
            serde_json::to_string(&surface).unwrap(),
        )
        .unwrap();

        let rows: Vec<Vec<f64>> = vertices.iter().map(&vertex_feature).collect();
        let mut payload = FeaturePayload::from_rows(&rows);
        payload.shape.push(1);
        fs::write(
            dir.join(format!("{}.gradients.json", key)),
            serde_json::to_string(&payload).unwrap(),
        )
        .unwrap();
    }
    vertices.len()
}

fn write_config(dir: &Path, vertex_count: usize, weighting: &str) -> std::path::PathBuf {
    let path = dir.join("csm_configuration.toml");
    fs::write(
        &path,
        format!(
            r#"
[system]
data_dir = "{}"

[data]
surface_file_template = "{{species}}_{{side}}.surf.json"
feature_file_template = "{{species}}_{{side}}.gradients.json"
expected_vertex_count = {}

[similarity]
roi_radius = 12.0
weighting = "{}"
"#,
            dir.display(),
            vertex_count,
            weighting
        ),
    )
    .unwrap();
    path
}

// ============================================================================
// Configured pipeline
// ============================================================================

#[test]
fn test_configured_mapper_computes_all_targets() {
    let dir = TempDir::new().unwrap();
    let n = write_dataset(dir.path(), |v| vec![v[0], v[1], v[2], 1.0]);
    let config_path = write_config(dir.path(), n, "gaussian");

    let config = load_config(Some(&config_path), None).unwrap();
    validate_config(&config).unwrap();
    let mapper = CrossSpeciesMapper::from_config(&config).unwrap();

    let maps = mapper
        .similarity_to_all(SurfaceKey::new(Species::Human, Side::Right), 40)
        .unwrap();

    assert_eq!(maps.len(), 4);
    for result in maps.values() {
        assert_eq!(result.len(), n);
        assert!(result.iter().all(f64::is_finite));
        assert!(result.iter().all(|v| v.abs() <= CORRELATION_CLAMP.atanh() + 1e-12));
    }
    // identical surfaces and features: every target agrees
    let first = &maps[&SurfaceKey::ALL[0]];
    assert!(maps.values().all(|r| r == first));
    // the seed itself scores highest on a matching surface
    assert_eq!(first.argmax(), Some(40));

    assert_eq!(mapper.meshes().loaded_count(), 1);
    assert_eq!(mapper.features().loaded_count(), 4);
}

#[test]
fn test_cli_overrides_reach_the_mapper() {
    let dir = TempDir::new().unwrap();
    let n = write_dataset(dir.path(), |v| vec![v[2], 1.0]);
    let config_path = write_config(dir.path(), n, "gaussian");

    let overrides = HashMap::from([
        ("weighting".to_string(), "uniform".to_string()),
        ("roi_radius".to_string(), "3.0".to_string()),
    ]);
    let config = load_config(Some(&config_path), Some(&overrides)).unwrap();
    let mapper = CrossSpeciesMapper::from_config(&config).unwrap();

    assert_eq!(mapper.weighting(), Weighting::Uniform);
    assert_eq!(mapper.roi_radius(), 3.0);
}

#[test]
fn test_constant_features_saturate_everywhere() {
    let dir = TempDir::new().unwrap();
    let n = write_dataset(dir.path(), |_| vec![1.0; 10]);
    let config_path = write_config(dir.path(), n, "uniform");

    let config = load_config(Some(&config_path), None).unwrap();
    let mapper = CrossSpeciesMapper::from_config(&config).unwrap();

    let result = mapper
        .similarity_to(
            SurfaceKey::new(Species::Macaque, Side::Left),
            0,
            SurfaceKey::new(Species::Human, Side::Left),
        )
        .unwrap();

    let ceiling = CORRELATION_CLAMP.atanh();
    assert!(result.iter().all(|v| (v - ceiling).abs() < 1e-12));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_weighting_is_rejected_before_loading() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), 10242, "invalid");

    let config = load_config(Some(&config_path), None).unwrap();
    assert!(validate_config(&config).is_err());

    let err = CrossSpeciesMapper::from_config(&config).err().unwrap();
    assert!(err.is_validation());
}

#[test]
fn test_wrong_vertex_count_is_data_load_error() {
    let dir = TempDir::new().unwrap();
    let n = write_dataset(dir.path(), |v| vec![v[0], 1.0]);
    let config_path = write_config(dir.path(), n + 1, "gaussian");

    let config = load_config(Some(&config_path), None).unwrap();
    let mapper = CrossSpeciesMapper::from_config(&config).unwrap();

    let err = mapper
        .similarity_to_all(SurfaceKey::new(Species::Human, Side::Left), 0)
        .unwrap_err();
    assert!(err.is_data_load());
}

#[test]
fn test_results_serialize_with_surface_names() {
    let dir = TempDir::new().unwrap();
    let n = write_dataset(dir.path(), |v| vec![v[1], 0.5]);
    let config_path = write_config(dir.path(), n, "gaussian");

    let config = load_config(Some(&config_path), None).unwrap();
    let mapper = CrossSpeciesMapper::from_config(&config).unwrap();
    let maps = mapper
        .similarity_to_all(SurfaceKey::new(Species::Macaque, Side::Right), 3)
        .unwrap();

    let json = serde_json::to_value(&maps).unwrap();
    for name in ["human_left", "human_right", "macaque_left", "macaque_right"] {
        assert_eq!(json[name].as_array().unwrap().len(), n);
    }
}
