//! Grid sampling of scalar fields.
//!
//! Every grid point is evaluated exactly once. Evaluation faults and non-finite
//! values are stored as NaN; nothing raised by the field crosses this boundary.

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::grid::{Grid2D, Grid3D};
use crate::field::ScalarField;

/// Dense `nx × ny × nz` block of samples, x-major (see [`Grid3D::flat_index`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    dims: [usize; 3],
    values: Vec<f64>,
}

impl Volume {
    /// Wraps pre-sampled values. Returns `None` when the length does not match `dims`.
    #[must_use]
    pub fn from_values(dims: [usize; 3], values: Vec<f64>) -> Option<Self> {
        (dims[0] * dims[1] * dims[2] == values.len()).then_some(Self { dims, values })
    }

    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        let [_, ny, nz] = self.dims;
        self.values[(i * ny + j) * nz + k]
    }

    /// Number of finite samples.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }
}

/// Height samples `z = f(x, y)`, rows follow the y axis and columns the x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplicitGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// `z[row][col] = f(x[col], y[row])`, NaN where the field is undefined.
    pub z: Vec<Vec<f64>>,
}

impl ExplicitGrid {
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.z.iter().flatten().filter(|v| v.is_finite()).count()
    }
}

/// Samples `field` over every point of `grid`.
pub fn sample_volume<F: ScalarField + ?Sized>(field: &F, grid: &Grid3D) -> Volume {
    let x = grid.x.values();
    let y = grid.y.values();
    let z = grid.z.values();
    let [_, ny, nz] = grid.dims();

    let values = collect_indexed(grid.len(), |index| {
        let i = index / (ny * nz);
        let j = (index / nz) % ny;
        let k = index % nz;
        field.sample(x[i], y[j], z[k])
    });

    let volume = Volume {
        dims: grid.dims(),
        values,
    };
    log::debug!(
        "sampled volume {:?}: {} of {} samples valid",
        volume.dims,
        volume.valid_count(),
        volume.len()
    );
    volume
}

/// Samples `field` over the x/y grid at a fixed `z`, row-major over y.
pub fn sample_plane<F: ScalarField + ?Sized>(field: &F, grid: &Grid2D, z: f64) -> Vec<f64> {
    let x = grid.x.values();
    let y = grid.y.values();
    let nx = x.len();

    collect_indexed(grid.len(), |index| {
        let row = index / nx;
        let col = index % nx;
        field.sample(x[col], y[row], z)
    })
}

/// Explicit surface path: evaluates `z = f(x, y)` over the grid without meshing.
pub fn sample_surface_2d<F: ScalarField + ?Sized>(field: &F, grid: &Grid2D) -> ExplicitGrid {
    let nx = grid.x.len();
    let flat = sample_plane(field, grid, 0.0);
    let z: Vec<Vec<f64>> = if nx == 0 {
        Vec::new()
    } else {
        flat.chunks(nx).map(<[f64]>::to_vec).collect()
    };

    let surface = ExplicitGrid {
        x: grid.x.values().to_vec(),
        y: grid.y.values().to_vec(),
        z,
    };
    log::debug!(
        "sampled explicit surface {}x{}: {} samples valid",
        surface.x.len(),
        surface.y.len(),
        surface.valid_count()
    );
    surface
}

/// Maps `0..count` in order, on the rayon pool when the `parallel` feature is active.
#[cfg(feature = "parallel")]
pub(crate) fn collect_indexed<T, M>(count: usize, map: M) -> Vec<T>
where
    T: Send,
    M: Fn(usize) -> T + Sync + Send,
{
    (0..count).into_par_iter().map(map).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn collect_indexed<T, M>(count: usize, map: M) -> Vec<T>
where
    M: Fn(usize) -> T,
{
    (0..count).map(map).collect()
}
