use crate::field::FnField;
use crate::iso::{
    Axis, Grid3D, MeshError, MeshOptions, Point3, analyze, build_mesh, sample_volume,
};

fn cube(n: usize) -> Grid3D {
    Grid3D::new(
        Axis::linspace("x", -3.0, 3.0, n).unwrap(),
        Axis::linspace("y", -3.0, 3.0, n).unwrap(),
        Axis::linspace("z", -3.0, 3.0, n).unwrap(),
    )
}

fn sphere_field() -> FnField<impl Fn(f64, f64, f64) -> Option<f64> + Sync> {
    FnField::xyz(|x: f64, y: f64, z: f64| Some(x * x + y * y + z * z))
}

#[test]
fn sphere_vertices_lie_near_radius() {
    let grid = cube(20);
    let volume = sample_volume(&sphere_field(), &grid);
    let (mesh, diagnostics) = build_mesh(&volume, &grid, 9.0, MeshOptions::default()).unwrap();

    assert!(mesh.vertex_count() > 100);
    assert!(mesh.triangle_count() > 100);
    assert!(diagnostics.shared_vertex_count > 0);
    for &vertex in &mesh.vertices {
        let radius = Point3::from_array(vertex).distance_to(Point3::default());
        assert!((radius - 3.0).abs() < 0.05, "vertex at radius {radius}");
    }
}

#[test]
fn sphere_default_iso_is_midpoint() {
    let grid = cube(10);
    let volume = sample_volume(&sphere_field(), &grid);
    let range = analyze(volume.values()).unwrap();

    assert!(range.min > 0.0);
    assert!((range.max - 27.0).abs() < 1e-9);
    let iso = range.resolve_iso(None);
    assert!((iso - (range.min + range.max) / 2.0).abs() < 1e-12);

    let (mesh, _) = build_mesh(&volume, &grid, iso, MeshOptions::default()).unwrap();
    let expected = iso.sqrt();
    for [x, y, z] in &mesh.vertices {
        let radius = (x * x + y * y + z * z).sqrt();
        assert!((radius - expected).abs() < 0.25);
    }
}

#[test]
fn iso_outside_range_is_empty() {
    let grid = cube(8);
    let volume = sample_volume(&sphere_field(), &grid);
    assert_eq!(
        build_mesh(&volume, &grid, 100.0, MeshOptions::default()).unwrap_err(),
        MeshError::EmptyMesh
    );
}
