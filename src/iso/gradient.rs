//! Gradient vectors of a height field `z = f(x, y)` over a 2D grid.

use serde::Serialize;

use super::grid::Grid2D;
use super::sampler::collect_indexed;
use crate::field::ScalarField;

/// One arrow of the gradient field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientSample {
    /// `[x, y, f(x, y)]`.
    pub position: [f64; 3],
    /// `[df/dx, df/dy, 0]`.
    pub gradient: [f64; 3],
    /// Euclidean length of the planar gradient.
    pub magnitude: f64,
}

impl GradientSample {
    /// Builds a sample, `None` when any of the three values is not finite.
    #[must_use]
    pub fn new(x: f64, y: f64, value: f64, gx: f64, gy: f64) -> Option<Self> {
        if !(value.is_finite() && gx.is_finite() && gy.is_finite()) {
            return None;
        }
        Some(Self {
            position: [x, y, value],
            gradient: [gx, gy, 0.0],
            magnitude: gx.hypot(gy),
        })
    }
}

/// Evaluates `field` and its partials at every grid point.
///
/// Points where any of the three evaluations is undefined or non-finite are left
/// out. Order is x-major: for each x, all y values in increasing order.
pub fn sample_gradient<F, Dx, Dy>(field: &F, dfdx: &Dx, dfdy: &Dy, grid: &Grid2D) -> Vec<GradientSample>
where
    F: ScalarField + ?Sized,
    Dx: ScalarField + ?Sized,
    Dy: ScalarField + ?Sized,
{
    let x = grid.x.values();
    let y = grid.y.values();
    let ny = y.len();

    let samples: Vec<GradientSample> = collect_indexed(grid.len(), |index| {
        let (xv, yv) = (x[index / ny], y[index % ny]);
        GradientSample::new(
            xv,
            yv,
            field.sample(xv, yv, 0.0),
            dfdx.sample(xv, yv, 0.0),
            dfdy.sample(xv, yv, 0.0),
        )
    })
    .into_iter()
    .flatten()
    .collect();

    log::debug!(
        "gradient field: {} of {} points kept",
        samples.len(),
        grid.len()
    );
    samples
}
