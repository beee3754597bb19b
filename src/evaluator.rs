//! De publieke operaties: oppervlak, gradiëntveld, domein/bereik en gradiënt in een punt.
//!
//! Elke aanroep bouwt zijn eigen grid, volume en vertex-tabel op en geeft het
//! resultaat by value terug; er blijft niets achter tussen aanroepen.

use serde::Serialize;

use crate::config::{DomainOptions, GradientOptions, GradientPointOptions, SurfaceOptions};
use crate::error::{EngineError, EngineResult};
use crate::field::{ExpressionField, NumericPartial, ScalarField, Variable};
use crate::iso::{
    self, ExplicitGrid, GradientSample, IsoMeshDiagnostics, IsoMetrics, TimingBucket, ValueRange,
};

/// Resultaat van [`evaluate_surface`]: een hoogteveld of een isooppervlak.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceResult {
    ExplicitSurface(ExplicitGrid),
    ImplicitSurface(ImplicitMesh),
}

impl SurfaceResult {
    #[must_use]
    pub fn as_explicit(&self) -> Option<&ExplicitGrid> {
        match self {
            Self::ExplicitSurface(grid) => Some(grid),
            Self::ImplicitSurface(_) => None,
        }
    }

    #[must_use]
    pub fn as_implicit(&self) -> Option<&ImplicitMesh> {
        match self {
            Self::ImplicitSurface(mesh) => Some(mesh),
            Self::ExplicitSurface(_) => None,
        }
    }
}

/// Driehoeksmesh van het oppervlak f(x, y, z) = iso.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplicitMesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub iso_value: f64,
    /// `[min, max]` over de geldige samples.
    pub value_range: [f64; 2],
    #[serde(skip)]
    pub diagnostics: IsoMeshDiagnostics,
}

impl ImplicitMesh {
    #[must_use]
    pub fn to_mesh(&self) -> iso::IsoMesh {
        iso::IsoMesh {
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
        }
    }
}

/// Resultaat van [`evaluate_gradient_field`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "gradient_field")]
pub struct GradientField {
    pub vectors: Vec<GradientSample>,
}

/// Schatting van domein en bereik over een x/y-grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainReport {
    /// `None` wanneer geen enkel punt geldig was.
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    /// Aandeel geldige punten, tussen 0 en 1.
    pub valid_ratio: f64,
    pub valid_count: usize,
    pub total_count: usize,
}

/// Gradiënt van f(x, y) in één punt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientAtPoint {
    pub point: [f64; 2],
    pub gradient: [f64; 2],
    pub magnitude: f64,
}

/// Parseert een gebruikersexpressie tot een veld.
pub fn parse_expression(source: &str) -> EngineResult<ExpressionField> {
    Ok(ExpressionField::parse(source)?)
}

/// Evalueert een oppervlak.
///
/// Hangt het veld niet van z af, dan wordt z = f(x, y) rechtstreeks op een
/// `nx × ny`-grid bemonsterd. Anders wordt het volume op `nx × ny × nz`
/// bemonsterd en het isooppervlak op de gevraagde of automatisch gekozen
/// isowaarde geëxtraheerd.
pub fn evaluate_surface<F>(field: &F, options: &SurfaceOptions) -> EngineResult<SurfaceResult>
where
    F: ScalarField + ?Sized,
{
    if field.variables().contains(Variable::Z) {
        evaluate_implicit(field, options).map(SurfaceResult::ImplicitSurface)
    } else {
        evaluate_explicit(field, options).map(SurfaceResult::ExplicitSurface)
    }
}

fn evaluate_explicit<F>(field: &F, options: &SurfaceOptions) -> EngineResult<ExplicitGrid>
where
    F: ScalarField + ?Sized,
{
    if options.nx < 2 || options.ny < 2 {
        log::warn!(
            "expliciet oppervlak met minder dan twee samples per as ({}x{})",
            options.nx,
            options.ny
        );
    }
    let grid = options.bounds.grid_2d(options.nx, options.ny)?;
    let surface = iso::sample_surface_2d(field, &grid);
    if surface.valid_count() == 0 {
        return Err(EngineError::NoValidSamples);
    }
    Ok(surface)
}

fn evaluate_implicit<F>(field: &F, options: &SurfaceOptions) -> EngineResult<ImplicitMesh>
where
    F: ScalarField + ?Sized,
{
    let grid = options.bounds.grid_3d(options.nx, options.ny, options.nz)?;
    log::debug!("volume-grid {:?}, {} cellen", grid.dims(), grid.cell_count());

    let mut metrics = IsoMetrics::default();
    metrics.begin();

    let volume = metrics.time(TimingBucket::Sampling, || iso::sample_volume(field, &grid));
    let range: ValueRange =
        metrics.time(TimingBucket::RangeAnalysis, || iso::analyze(volume.values()))?;
    let iso_value = range.resolve_iso(options.requested_iso());
    log::debug!(
        "bereik [{}, {}], isowaarde {iso_value}{}",
        range.min,
        range.max,
        if options.requested_iso().is_none() {
            " (automatisch)"
        } else {
            ""
        }
    );

    let (mesh, diagnostics) = iso::build_mesh_with_metrics(
        &volume,
        &grid,
        iso_value,
        options.mesh_options(),
        &mut metrics,
    )?;

    Ok(ImplicitMesh {
        vertices: mesh.vertices,
        faces: mesh.faces,
        iso_value,
        value_range: range.as_array(),
        diagnostics,
    })
}

/// Bemonstert het gradiëntveld met expliciet aangeleverde partiële afgeleiden.
pub fn evaluate_gradient_field<F, Dx, Dy>(
    field: &F,
    dfdx: &Dx,
    dfdy: &Dy,
    options: &GradientOptions,
) -> EngineResult<GradientField>
where
    F: ScalarField + ?Sized,
    Dx: ScalarField + ?Sized,
    Dy: ScalarField + ?Sized,
{
    if field.variables().contains(Variable::Z) {
        log::warn!("gradiëntveld van een expressie met z: bemonsterd in het vlak z = 0");
    }
    let grid = options
        .bounds
        .grid_2d(options.grid_size, options.grid_size)?;

    let mut metrics = IsoMetrics::default();
    metrics.begin();
    let vectors = metrics.time(TimingBucket::GradientSampling, || {
        iso::sample_gradient(field, dfdx, dfdy, &grid)
    });
    if let Some(report) = metrics.end() {
        log::debug!("gradiëntveld in {} ms", report.total_ms());
    }

    if vectors.is_empty() {
        return Err(EngineError::NoValidSamples);
    }
    Ok(GradientField { vectors })
}

/// Zoals [`evaluate_gradient_field`], met numerieke partiële afgeleiden.
pub fn evaluate_gradient_field_numeric<F>(
    field: &F,
    options: &GradientOptions,
) -> EngineResult<GradientField>
where
    F: ScalarField + ?Sized,
{
    let dfdx = NumericPartial::new(field, Variable::X);
    let dfdy = NumericPartial::new(field, Variable::Y);
    evaluate_gradient_field(field, &dfdx, &dfdy, options)
}

/// Schat domein en bereik van f(x, y) op een `samples × samples`-grid (z = 0).
///
/// Faalt niet wanneer geen enkel punt geldig is: het bereik is dan leeg.
pub fn analyze_domain<F>(field: &F, options: &DomainOptions) -> EngineResult<DomainReport>
where
    F: ScalarField + ?Sized,
{
    if field.variables().contains(Variable::Z) {
        log::warn!("domeinanalyse van een expressie met z: bemonsterd in het vlak z = 0");
    }
    let grid = options.bounds.grid_2d(options.samples, options.samples)?;
    let values = iso::sample_plane(field, &grid, 0.0);
    let total_count = values.len();

    let report = match iso::analyze(&values) {
        Ok(range) => DomainReport {
            range_min: Some(range.min),
            range_max: Some(range.max),
            valid_ratio: range.valid_ratio(),
            valid_count: range.valid_count,
            total_count,
        },
        Err(_) => DomainReport {
            range_min: None,
            range_max: None,
            valid_ratio: 0.0,
            valid_count: 0,
            total_count,
        },
    };
    log::debug!(
        "domein: {}/{} geldig, bereik {:?}..{:?}",
        report.valid_count,
        report.total_count,
        report.range_min,
        report.range_max
    );
    Ok(report)
}

/// Gradiënt in `(x0, y0)` uit de gegeven partiële afgeleiden.
pub fn gradient_at<Dx, Dy>(
    dfdx: &Dx,
    dfdy: &Dy,
    options: &GradientPointOptions,
) -> EngineResult<GradientAtPoint>
where
    Dx: ScalarField + ?Sized,
    Dy: ScalarField + ?Sized,
{
    let x0 = options.x0.ok_or(EngineError::MissingParameter("x0"))?;
    let y0 = options.y0.ok_or(EngineError::MissingParameter("y0"))?;

    let gx = dfdx.sample(x0, y0, 0.0);
    let gy = dfdy.sample(x0, y0, 0.0);
    if !(gx.is_finite() && gy.is_finite()) {
        return Err(EngineError::NoValidSamples);
    }

    Ok(GradientAtPoint {
        point: [x0, y0],
        gradient: [gx, gy],
        magnitude: gx.hypot(gy),
    })
}

/// Zoals [`gradient_at`], met numerieke partiële afgeleiden van `field`.
pub fn gradient_at_numeric<F>(field: &F, options: &GradientPointOptions) -> EngineResult<GradientAtPoint>
where
    F: ScalarField + ?Sized,
{
    let dfdx = NumericPartial::new(field, Variable::X);
    let dfdy = NumericPartial::new(field, Variable::Y);
    gradient_at(&dfdx, &dfdy, options)
}
