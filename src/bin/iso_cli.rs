#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("iso_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use isosurface_engine::Engine;
    use isosurface_engine::config::{
        Bounds, DomainOptions, EngineConfig, GradientOptions, GradientPointOptions,
    };
    use isosurface_engine::evaluator::SurfaceResult;
    use isosurface_engine::iso::FanPolicy;
    use std::fs;
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"iso_cli (isosurface-engine)

USAGE:
  iso_cli surface <expr> [options]
  iso_cli gradient <expr> [--grid <n>] [--bounds <a,b>]
  iso_cli domain <expr> [--samples <n>] [--bounds <a,b>]
  iso_cli gradient-at <expr> --x0 <x> --y0 <y>

OPTIONS (surface):
  --iso <v>          Target isovalue (default: auto)
  --res <n>          Samples per axis (default 50)
  --bounds <a,b>     Same [a, b] bounds on every axis (default -3,3)
  --single-corner    Only fan cells with exactly one corner apart
  --obj <path>       Write the mesh as Wavefront OBJ
  --overwrite        Overwrite an existing OBJ file
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        let engine = Engine::from_config(EngineConfig::default());
        match command.as_str() {
            "surface" => cmd_surface(&engine, &mut args),
            "gradient" => cmd_gradient(&engine, &mut args),
            "domain" => cmd_domain(&engine, &mut args),
            "gradient-at" => cmd_gradient_at(&engine, &mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_surface(engine: &Engine, args: &mut Args) -> Result<(), String> {
        let expression = args.next().ok_or("missing expression")?;
        let mut options = engine.config().surface;
        let mut obj_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--iso" => options.iso_value = args.number("--iso")?,
                "--res" => options = options.with_resolution(args.count("--res")?),
                "--bounds" => options.bounds = args.bounds("--bounds")?,
                "--single-corner" => options.fan_policy = FanPolicy::SingleCorner,
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let result = engine
            .surface(&expression, &options)
            .map_err(|e| e.to_string())?;
        match result {
            SurfaceResult::ExplicitSurface(grid) => {
                if obj_path.is_some() {
                    return Err("expression has no z: explicit surfaces are not meshed".to_string());
                }
                let valid = grid.valid_count();
                let total = grid.x.len() * grid.y.len();
                println!("explicit surface {}x{}, {valid}/{total} valid", grid.x.len(), grid.y.len());
            }
            SurfaceResult::ImplicitSurface(mesh) => {
                println!(
                    "implicit surface iso={} range=[{}, {}]",
                    mesh.iso_value, mesh.value_range[0], mesh.value_range[1]
                );
                print!("{}", mesh.diagnostics);
                if let Some(path) = obj_path {
                    write_obj_file(&path, &mesh.to_mesh(), &expression, overwrite)?;
                    println!("wrote {}", path.display());
                }
            }
        }
        Ok(())
    }

    fn cmd_gradient(engine: &Engine, args: &mut Args) -> Result<(), String> {
        let expression = args.next().ok_or("missing expression")?;
        let mut options: GradientOptions = engine.config().gradient;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--grid" => options.grid_size = args.count("--grid")?,
                "--bounds" => options.bounds = args.bounds("--bounds")?,
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let field = engine
            .gradient_field(&expression, &options)
            .map_err(|e| e.to_string())?;
        for sample in &field.vectors {
            let [x, y, z] = sample.position;
            let [gx, gy, _] = sample.gradient;
            println!("({x:.4}, {y:.4}, {z:.4}) -> ({gx:.4}, {gy:.4}) |{:.4}|", sample.magnitude);
        }
        println!("{} vectors", field.vectors.len());
        Ok(())
    }

    fn cmd_domain(engine: &Engine, args: &mut Args) -> Result<(), String> {
        let expression = args.next().ok_or("missing expression")?;
        let mut options: DomainOptions = engine.config().domain;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--samples" => options.samples = args.count("--samples")?,
                "--bounds" => options.bounds = args.bounds("--bounds")?,
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let report = engine
            .domain(&expression, &options)
            .map_err(|e| e.to_string())?;
        match (report.range_min, report.range_max) {
            (Some(min), Some(max)) => println!("range: [{min}, {max}]"),
            _ => println!("range: none"),
        }
        println!(
            "valid: {}/{} ({:.1}%)",
            report.valid_count,
            report.total_count,
            report.valid_ratio * 100.0
        );
        Ok(())
    }

    fn cmd_gradient_at(engine: &Engine, args: &mut Args) -> Result<(), String> {
        let expression = args.next().ok_or("missing expression")?;
        let mut options = GradientPointOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--x0" => options.x0 = Some(args.number("--x0")?),
                "--y0" => options.y0 = Some(args.number("--y0")?),
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let result = engine
            .gradient_at_point(&expression, &options)
            .map_err(|e| e.to_string())?;
        println!(
            "grad f({}, {}) = ({}, {}), |grad| = {}",
            result.point[0], result.point[1], result.gradient[0], result.gradient[1], result.magnitude
        );
        Ok(())
    }

    fn write_obj_file(
        path: &Path,
        mesh: &isosurface_engine::iso::IsoMesh,
        name: &str,
        overwrite: bool,
    ) -> Result<(), String> {
        mesh.validate()
            .map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        let object_name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        fs::write(path, mesh.to_obj(&object_name))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }

        fn number(&mut self, flag: &str) -> Result<f64, String> {
            let raw = self.value(flag)?;
            raw.parse()
                .map_err(|_| format!("{flag} expects a number, got `{raw}`"))
        }

        fn count(&mut self, flag: &str) -> Result<usize, String> {
            let raw = self.value(flag)?;
            raw.parse()
                .map_err(|_| format!("{flag} expects a positive integer, got `{raw}`"))
        }

        fn bounds(&mut self, flag: &str) -> Result<Bounds, String> {
            let raw = self.value(flag)?;
            let (min, max) = raw
                .split_once(',')
                .ok_or_else(|| format!("{flag} expects `min,max`, got `{raw}`"))?;
            let min: f64 = min
                .trim()
                .parse()
                .map_err(|_| format!("{flag}: invalid min `{min}`"))?;
            let max: f64 = max
                .trim()
                .parse()
                .map_err(|_| format!("{flag}: invalid max `{max}`"))?;
            Ok(Bounds::uniform(min, max))
        }
    }
}
