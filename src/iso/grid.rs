//! Regular sample grids.
//!
//! Every axis is the evenly spaced sequence from `min` to `max` with `count` samples,
//! last sample landing exactly on `max`. Grids are built once per call and never mutated.

use super::core::Point3;

/// Upper bound on the number of points in one grid (2D or 3D).
///
/// Sample counts arrive from callers unchecked; a volume at this size already
/// holds 128 MiB of `f64` samples.
pub const MAX_GRID_POINTS: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("axis `{axis}` needs at least {min} samples, got {count}")]
    TooFewSamples {
        axis: &'static str,
        min: usize,
        count: usize,
    },
    #[error("axis `{axis}` bounds must be finite")]
    NonFiniteBounds { axis: &'static str },
    #[error("axis `{axis}` requires min < max (got {min} .. {max})")]
    InvertedBounds { axis: &'static str, min: f64, max: f64 },
    #[error("grid of {counts:?} samples exceeds the limit of {max} points")]
    TooManySamples { counts: Vec<usize>, max: usize },
}

/// Total point count for the per-axis `counts`, or [`GridError::TooManySamples`]
/// when the product overflows or exceeds [`MAX_GRID_POINTS`].
pub fn checked_point_count(counts: &[usize]) -> Result<usize, GridError> {
    counts
        .iter()
        .try_fold(1usize, |total, &count| total.checked_mul(count))
        .filter(|&total| total <= MAX_GRID_POINTS)
        .ok_or_else(|| GridError::TooManySamples {
            counts: counts.to_vec(),
            max: MAX_GRID_POINTS,
        })
}

/// One monotonically increasing coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    values: Vec<f64>,
}

impl Axis {
    /// Evenly spaced samples over `[min, max]`, like `numpy.linspace`.
    ///
    /// A single sample is allowed and sits at `min`; otherwise `min < max` is required.
    pub fn linspace(
        axis: &'static str,
        min: f64,
        max: f64,
        count: usize,
    ) -> Result<Self, GridError> {
        if count == 0 {
            return Err(GridError::TooFewSamples {
                axis,
                min: 1,
                count,
            });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(GridError::NonFiniteBounds { axis });
        }
        if count == 1 {
            return Ok(Self { values: vec![min] });
        }
        if min >= max {
            return Err(GridError::InvertedBounds { axis, min, max });
        }

        let step = (max - min) / (count - 1) as f64;
        let mut values: Vec<f64> = (0..count).map(|i| min + step * i as f64).collect();
        values[count - 1] = max;
        Ok(Self { values })
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
}

/// Cartesian product of an x and y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    pub x: Axis,
    pub y: Axis,
}

impl Grid2D {
    #[must_use]
    pub fn new(x: Axis, y: Axis) -> Self {
        Self { x, y }
    }

    /// Number of grid points (`nx * ny`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cartesian product of x, y and z axes.
///
/// Flat indices are x-major: `index = (i * ny + j) * nz + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3D {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl Grid3D {
    #[must_use]
    pub fn new(x: Axis, y: Axis, z: Axis) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        [self.x.len(), self.y.len(), self.z.len()]
    }

    /// Number of grid points (`nx * ny * nz`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells (`(nx-1) * (ny-1) * (nz-1)`), zero when any axis has < 2 samples.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let [nx, ny, nz] = self.dims();
        nx.saturating_sub(1) * ny.saturating_sub(1) * nz.saturating_sub(1)
    }

    #[must_use]
    pub fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [_, ny, nz] = self.dims();
        (i * ny + j) * nz + k
    }

    /// Inverse of [`Grid3D::flat_index`].
    #[must_use]
    pub fn grid_index(&self, index: usize) -> [usize; 3] {
        let [_, ny, nz] = self.dims();
        [index / (ny * nz), (index / nz) % ny, index % nz]
    }

    #[must_use]
    pub fn point(&self, [i, j, k]: [usize; 3]) -> Point3 {
        Point3::new(self.x.values[i], self.y.values[j], self.z.values[k])
    }
}
