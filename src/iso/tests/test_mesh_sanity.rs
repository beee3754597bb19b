use std::collections::HashSet;

use crate::field::FnField;
use crate::iso::{
    Axis, FanPolicy, Grid3D, IsoMetrics, MeshOptions, build_mesh, build_mesh_with_metrics,
    sample_volume,
};

fn grid(n: usize) -> Grid3D {
    Grid3D::new(
        Axis::linspace("x", -2.0, 2.0, n).unwrap(),
        Axis::linspace("y", -2.0, 2.0, n).unwrap(),
        Axis::linspace("z", -2.0, 2.0, n).unwrap(),
    )
}

#[test]
fn mesh_has_finite_vertices_and_valid_faces() {
    let grid = grid(12);
    let field = FnField::xyz(|x, y, z| Some(x * y - z));
    let volume = sample_volume(&field, &grid);
    let (mesh, diag) = build_mesh(&volume, &grid, 0.0, MeshOptions::default()).unwrap();

    mesh.validate().expect("mesh validate");
    assert_eq!(diag.vertex_count, mesh.vertices.len());
    assert_eq!(diag.triangle_count, mesh.faces.len());
    assert_eq!(diag.cell_count, 11 * 11 * 11);
    assert_eq!(diag.invalid_cell_count, 0);
    assert_eq!(diag.degenerate_cell_count, 0);

    for face in &mesh.faces {
        assert_ne!(face[0], face[1]);
        assert_ne!(face[1], face[2]);
        assert_ne!(face[0], face[2]);
    }
}

#[test]
fn every_vertex_is_referenced_once_stored() {
    let grid = grid(9);
    let field = FnField::xyz(|x, y, z| Some(x + 0.3 * y - 0.2 * z));
    let volume = sample_volume(&field, &grid);
    let (mesh, _) = build_mesh(&volume, &grid, 0.137, MeshOptions::default()).unwrap();

    let used: HashSet<u32> = mesh.faces.iter().flatten().copied().collect();
    assert_eq!(used.len(), mesh.vertices.len());

    let distinct: HashSet<[u64; 3]> = mesh
        .vertices
        .iter()
        .map(|v| v.map(f64::to_bits))
        .collect();
    assert_eq!(distinct.len(), mesh.vertices.len());
}

#[test]
fn repeated_builds_are_identical() {
    let grid = grid(10);
    let field = FnField::xyz(|x, y, z| Some((x * x + y * y + z * z).sqrt() - 1.5));
    let volume = sample_volume(&field, &grid);

    let (first, _) = build_mesh(&volume, &grid, 0.0, MeshOptions::default()).unwrap();
    let (second, _) = build_mesh(&volume, &grid, 0.0, MeshOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn undefined_region_is_skipped_not_fatal() {
    let grid = grid(10);
    let field = FnField::xyz(|x, y, z| if x < 0.0 { None } else { Some(y * y + z * z) });
    let volume = sample_volume(&field, &grid);
    let (mesh, diag) = build_mesh(&volume, &grid, 1.0, MeshOptions::default()).unwrap();

    assert!(diag.invalid_cell_count > 0);
    assert!(mesh.vertices.iter().all(|v| v[0] >= 0.0));
}

#[test]
fn single_corner_policy_is_a_subset() {
    let grid = grid(10);
    let field = FnField::xyz(|x, y, z| Some(x * x + y * y + z * z));
    let volume = sample_volume(&field, &grid);

    let (all, all_diag) = build_mesh(&volume, &grid, 2.0, MeshOptions::default()).unwrap();
    let legacy = MeshOptions {
        fan_policy: FanPolicy::SingleCorner,
    };
    let (single, single_diag) = build_mesh(&volume, &grid, 2.0, legacy).unwrap();

    assert!(single.triangle_count() < all.triangle_count());
    assert_eq!(single_diag.crossing_cell_count, all_diag.crossing_cell_count);
    assert!(single_diag.skipped_by_policy_count > 0);
    // Single-corner cells always fan three edges into one triangle.
    assert_eq!(
        single.triangle_count(),
        single_diag.crossing_cell_count - single_diag.skipped_by_policy_count
    );
}

#[test]
fn metrics_context_reports_timing_only_when_enabled() {
    let grid = grid(6);
    let field = FnField::xyz(|x, _, _| Some(x));
    let volume = sample_volume(&field, &grid);
    let mut metrics = IsoMetrics::default();
    metrics.begin();
    let (_, diag) =
        build_mesh_with_metrics(&volume, &grid, 0.1, MeshOptions::default(), &mut metrics).unwrap();

    assert_eq!(
        diag.timing.is_some(),
        cfg!(all(feature = "iso_metrics", not(target_arch = "wasm32")))
    );
}
