use isosurface_engine::config::{
    Bounds, DomainOptions, EngineConfig, GradientOptions, GradientPointOptions, SurfaceOptions,
};
use isosurface_engine::evaluator::{self, SurfaceResult};
use isosurface_engine::field::{FnField, ScalarField, Variable, VariableSet};
use isosurface_engine::iso::FanPolicy;
use isosurface_engine::{Engine, EngineError};

fn engine() -> Engine {
    Engine::from_config(EngineConfig::default())
}

#[test]
fn engine_uses_documented_defaults() {
    let engine = Engine::new();
    assert_eq!(engine.config(), &EngineConfig::default());
    assert_eq!(engine.config().surface.bounds, Bounds::uniform(-3.0, 3.0));
}

#[test]
fn height_field_expression_samples_exact_values() {
    let options = SurfaceOptions::default().with_resolution(7);
    let result = engine().surface("x^2 + y^2", &options).expect("surface");

    let SurfaceResult::ExplicitSurface(grid) = result else {
        panic!("expected the explicit path for an expression without z");
    };
    assert_eq!(grid.x.len(), 7);
    assert_eq!(grid.z.len(), 7);
    for (row, y) in grid.y.iter().enumerate() {
        for (col, x) in grid.x.iter().enumerate() {
            assert!((grid.z[row][col] - (x * x + y * y)).abs() < 1e-12);
        }
    }
}

#[test]
fn sphere_expression_meshes_at_radius_three() {
    let options = SurfaceOptions::default().with_resolution(20).with_iso(9.0);
    let result = engine().surface("x^2 + y^2 + z^2", &options).expect("surface");

    let mesh = result.as_implicit().expect("implicit path");
    assert_eq!(mesh.iso_value, 9.0);
    assert!(!mesh.vertices.is_empty());
    assert!(!mesh.faces.is_empty());
    assert!((mesh.value_range[1] - 27.0).abs() < 1e-9);
    for [x, y, z] in &mesh.vertices {
        let radius = (x * x + y * y + z * z).sqrt();
        assert!((radius - 3.0).abs() < 0.05, "vertex at radius {radius}");
    }
    let vertex_count = mesh.vertices.len() as u32;
    assert!(mesh.faces.iter().flatten().all(|&i| i < vertex_count));
}

#[test]
fn gradient_field_of_paraboloid_at_one_one() {
    let options = GradientOptions {
        grid_size: 7,
        ..Default::default()
    };
    let field = engine().gradient_field("x^2 + y^2", &options).expect("gradient");
    assert_eq!(field.vectors.len(), 49);

    let sample = field
        .vectors
        .iter()
        .find(|s| s.position[0] == 1.0 && s.position[1] == 1.0)
        .expect("grid contains (1, 1)");
    assert!((sample.position[2] - 2.0).abs() < 1e-12);
    assert!((sample.gradient[0] - 2.0).abs() < 1e-6);
    assert!((sample.gradient[1] - 2.0).abs() < 1e-6);
    assert_eq!(sample.gradient[2], 0.0);
    assert!((sample.magnitude - 2.0 * 2f64.sqrt()).abs() < 1e-6);
}

#[test]
fn gradient_field_with_supplied_partials() {
    let f = FnField::xy(|x, y, _| Some(x * x + y * y));
    let dfdx = FnField::xy(|x, _, _| Some(2.0 * x));
    let dfdy = FnField::xy(|_, y, _| Some(2.0 * y));
    let options = GradientOptions {
        grid_size: 7,
        ..Default::default()
    };
    let field = evaluator::evaluate_gradient_field(&f, &dfdx, &dfdy, &options).unwrap();

    let sample = field
        .vectors
        .iter()
        .find(|s| s.position[0] == 1.0 && s.position[1] == 1.0)
        .unwrap();
    assert_eq!(sample.gradient, [2.0, 2.0, 0.0]);
    assert!((sample.magnitude - 2.828_427_124_746_19).abs() < 1e-12);
}

#[test]
fn gradient_at_point() {
    let result = engine()
        .gradient_at_point("x^2 + 3*y", &GradientPointOptions::at(1.0, 2.0))
        .expect("gradient at point");
    assert!((result.gradient[0] - 2.0).abs() < 1e-6);
    assert!((result.gradient[1] - 3.0).abs() < 1e-6);
    assert!((result.magnitude - 13f64.sqrt()).abs() < 1e-6);

    assert_eq!(
        engine().gradient_at_point("x^2", &GradientPointOptions::default()),
        Err(EngineError::MissingParameter("x0"))
    );
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let options = SurfaceOptions::default().with_resolution(16);
    let expression = "sin(x) * cos(y) + z / 2";
    let first = engine().surface(expression, &options).unwrap();
    let second = engine().surface(expression, &options).unwrap();

    let (first, second) = (first.as_implicit().unwrap(), second.as_implicit().unwrap());
    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.faces, second.faces);
    assert_eq!(first.iso_value.to_bits(), second.iso_value.to_bits());
}

#[test]
fn singular_point_does_not_abort_the_sweep() {
    // x = 0 lies on the 5-sample grid.
    let options = SurfaceOptions::default().with_resolution(5).with_iso(0.5);
    let result = engine().surface("1/x + z", &options).expect("surface");
    let mesh = result.as_implicit().unwrap();
    assert!(!mesh.faces.is_empty());
    assert!(mesh.diagnostics.invalid_cell_count > 0);
}

#[test]
fn all_invalid_volume_reports_no_valid_samples() {
    let options = SurfaceOptions::default().with_resolution(8);
    assert_eq!(
        engine().surface("sqrt(-1 - x^2 - y^2 - z^2)", &options),
        Err(EngineError::NoValidSamples)
    );
    assert_eq!(
        engine().surface("log(-1 - x^2)", &options),
        Err(EngineError::NoValidSamples)
    );
}

#[test]
fn isovalue_outside_range_reports_empty_mesh() {
    let options = SurfaceOptions::default().with_resolution(10).with_iso(100.0);
    assert_eq!(
        engine().surface("x^2 + y^2 + z^2", &options),
        Err(EngineError::EmptyMesh)
    );
}

#[test]
fn input_rejections() {
    let options = SurfaceOptions::default().with_resolution(4);
    assert_eq!(
        engine().surface("x + t * w", &options),
        Err(EngineError::DisallowedVariable(vec![
            "t".to_string(),
            "w".to_string()
        ]))
    );
    assert!(matches!(
        engine().surface("x + * (", &options),
        Err(EngineError::InvalidExpression(_))
    ));

    let mut inverted = options;
    inverted.bounds = Bounds::uniform(1.0, -1.0);
    assert!(matches!(
        engine().surface("x + z", &inverted),
        Err(EngineError::InvalidGrid(_))
    ));
}

#[test]
fn oversized_sample_counts_are_rejected() {
    let huge = SurfaceOptions::default().with_resolution(1 << 22);
    assert!(matches!(
        engine().surface("x + y + z", &huge),
        Err(EngineError::InvalidGrid(_))
    ));
    assert!(matches!(
        engine().surface("x + y", &huge),
        Err(EngineError::InvalidGrid(_))
    ));

    let gradient = GradientOptions {
        grid_size: usize::MAX,
        ..Default::default()
    };
    assert!(matches!(
        engine().gradient_field("x * y", &gradient),
        Err(EngineError::InvalidGrid(_))
    ));

    let domain = DomainOptions {
        samples: 1 << 20,
        ..Default::default()
    };
    assert!(matches!(
        engine().domain("x", &domain),
        Err(EngineError::InvalidGrid(_))
    ));
}

#[test]
fn single_corner_policy_yields_fewer_triangles() {
    let options = SurfaceOptions::default().with_resolution(12).with_iso(4.0);
    let legacy = SurfaceOptions {
        fan_policy: FanPolicy::SingleCorner,
        ..options
    };
    let all = engine().surface("x^2 + y^2 + z^2", &options).unwrap();
    let single = engine().surface("x^2 + y^2 + z^2", &legacy).unwrap();

    let (all, single) = (all.as_implicit().unwrap(), single.as_implicit().unwrap());
    assert!(single.faces.len() < all.faces.len());
}

#[test]
fn domain_of_square_root() {
    let report = engine()
        .domain("sqrt(x)", &DomainOptions::default())
        .expect("domain");
    // x >= 0 covers columns 50..=100 of 101.
    assert_eq!(report.total_count, 101 * 101);
    assert_eq!(report.valid_count, 51 * 101);
    assert_eq!(report.range_min, Some(0.0));
    assert!((report.range_max.unwrap() - 3f64.sqrt()).abs() < 1e-12);

    let empty = engine()
        .domain("sqrt(-1 - x^2)", &DomainOptions::default())
        .expect("never fails on an empty domain");
    assert_eq!(empty.range_min, None);
    assert_eq!(empty.valid_ratio, 0.0);
}

#[test]
fn closure_fields_drive_the_same_pipeline() {
    let field = FnField::new(VariableSet::XYZ, |x: f64, y: f64, z: f64| {
        let r = (x * x + y * y + z * z).sqrt();
        (r > 0.0).then(|| 1.0 / r)
    });
    assert!(field.variables().contains(Variable::Z));

    let options = SurfaceOptions::default().with_resolution(15).with_iso(0.5);
    let result = evaluator::evaluate_surface(&field, &options).unwrap();
    let mesh = result.as_implicit().unwrap();
    for [x, y, z] in &mesh.vertices {
        let radius = (x * x + y * y + z * z).sqrt();
        assert!((radius - 2.0).abs() < 0.2);
    }
}

#[test]
fn results_serialize_for_transport() {
    let options = SurfaceOptions::default().with_resolution(6).with_iso(4.0);
    let result = engine().surface("x^2 + y^2 + z^2", &options).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["type"], "implicit_surface");
    assert_eq!(json["iso_value"], 4.0);
    assert!(json["vertices"][0].as_array().unwrap().len() == 3);
    assert!(json["faces"][0].as_array().unwrap().len() == 3);
    assert_eq!(json["value_range"].as_array().unwrap().len(), 2);
    assert!(json.get("diagnostics").is_none());
}

#[test]
fn options_fill_missing_fields_from_defaults() {
    let options: SurfaceOptions =
        serde_json::from_str(r#"{"nx": 20, "iso_value": 9.0, "xmin": -4.0}"#).unwrap();
    assert_eq!(options.nx, 20);
    assert_eq!(options.ny, 50);
    assert_eq!(options.bounds.xmin, -4.0);
    assert_eq!(options.bounds.xmax, 3.0);
    assert_eq!(options.requested_iso(), Some(9.0));

    let config: EngineConfig =
        serde_json::from_str(r#"{"gradient": {"grid_size": 4}, "surface": {"fan_policy": "single_corner"}}"#)
            .unwrap();
    assert_eq!(config.gradient.grid_size, 4);
    assert_eq!(config.surface.fan_policy, FanPolicy::SingleCorner);
    assert_eq!(config.domain, DomainOptions::default());
}
