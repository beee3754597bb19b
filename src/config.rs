//! Configuratie van de engine.
//!
//! Alle opties zijn gewone structs met `serde`-defaults, zodat een gedeeltelijk
//! JS-object of JSON-document de ontbrekende velden zelf aanvult. Er bestaan geen
//! globale defaults die tijdens het draaien veranderd kunnen worden: een
//! [`EngineConfig`] wordt bij constructie meegegeven.

use serde::{Deserialize, Serialize};

use crate::iso::{Axis, FanPolicy, Grid2D, Grid3D, GridError, MeshOptions, checked_point_count};

const DEFAULT_BOUND: f64 = 3.0;
const DEFAULT_RESOLUTION: usize = 50;
const DEFAULT_GRADIENT_GRID: usize = 10;
const DEFAULT_DOMAIN_SAMPLES: usize = 101;

/// Domeingrenzen per as.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::cube(DEFAULT_BOUND)
    }
}

impl Bounds {
    /// `[-half, half]` op elke as.
    #[must_use]
    pub fn cube(half: f64) -> Self {
        Self {
            xmin: -half,
            xmax: half,
            ymin: -half,
            ymax: half,
            zmin: -half,
            zmax: half,
        }
    }

    /// Dezelfde grenzen `[min, max]` op elke as.
    #[must_use]
    pub fn uniform(min: f64, max: f64) -> Self {
        Self {
            xmin: min,
            xmax: max,
            ymin: min,
            ymax: max,
            zmin: min,
            zmax: max,
        }
    }

    /// Grid over de x- en y-grenzen. Te grote aantallen geven
    /// [`GridError::TooManySamples`] voordat er iets gealloceerd wordt.
    pub fn grid_2d(&self, nx: usize, ny: usize) -> Result<Grid2D, GridError> {
        checked_point_count(&[nx, ny])?;
        Ok(Grid2D::new(
            Axis::linspace("x", self.xmin, self.xmax, nx)?,
            Axis::linspace("y", self.ymin, self.ymax, ny)?,
        ))
    }

    pub fn grid_3d(&self, nx: usize, ny: usize, nz: usize) -> Result<Grid3D, GridError> {
        checked_point_count(&[nx, ny, nz])?;
        Ok(Grid3D::new(
            Axis::linspace("x", self.xmin, self.xmax, nx)?,
            Axis::linspace("y", self.ymin, self.ymax, ny)?,
            Axis::linspace("z", self.zmin, self.zmax, nz)?,
        ))
    }
}

/// Opties voor `evaluate_surface`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Doelwaarde van het isooppervlak; `0` betekent automatisch kiezen.
    pub iso_value: f64,
    pub fan_policy: FanPolicy,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            nx: DEFAULT_RESOLUTION,
            ny: DEFAULT_RESOLUTION,
            nz: DEFAULT_RESOLUTION,
            iso_value: 0.0,
            fan_policy: FanPolicy::default(),
        }
    }
}

impl SurfaceOptions {
    /// De expliciet gevraagde isowaarde, of `None` voor automatische detectie.
    ///
    /// `0` en niet-eindige waarden gelden als "niet opgegeven".
    #[must_use]
    pub fn requested_iso(&self) -> Option<f64> {
        (self.iso_value != 0.0 && self.iso_value.is_finite()).then_some(self.iso_value)
    }

    #[must_use]
    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            fan_policy: self.fan_policy,
        }
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.nx = resolution;
        self.ny = resolution;
        self.nz = resolution;
        self
    }

    #[must_use]
    pub fn with_iso(mut self, iso_value: f64) -> Self {
        self.iso_value = iso_value;
        self
    }
}

/// Opties voor `evaluate_gradient_field`; alleen de x/y-grenzen worden gebruikt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub grid_size: usize,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            grid_size: DEFAULT_GRADIENT_GRID,
        }
    }
}

/// Opties voor `analyze_domain`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainOptions {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub samples: usize,
}

impl Default for DomainOptions {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            samples: DEFAULT_DOMAIN_SAMPLES,
        }
    }
}

/// Opties voor `gradient_at`; beide coördinaten zijn verplicht.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientPointOptions {
    pub x0: Option<f64>,
    pub y0: Option<f64>,
}

impl GradientPointOptions {
    #[must_use]
    pub fn at(x0: f64, y0: f64) -> Self {
        Self {
            x0: Some(x0),
            y0: Some(y0),
        }
    }
}

/// Standaardopties per operatie, vastgelegd bij het aanmaken van de engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub surface: SurfaceOptions,
    pub gradient: GradientOptions,
    pub domain: DomainOptions,
}
