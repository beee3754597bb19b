mod classify;
mod core;
mod diagnostics;
mod edge;
mod gradient;
mod grid;
mod mesh;
mod metrics;
mod range;
mod sampler;

pub use classify::{CORNER_OFFSETS, CUBE_EDGES, CubeConfig, classify, corner_indices};
pub use core::{Point3, Tolerance};
pub use diagnostics::IsoMeshDiagnostics;
pub use edge::{
    EdgeKey, GridIndex, VertexTable, edge_crossing, interpolate, interpolation_parameter,
    is_crossed,
};
pub use gradient::{GradientSample, sample_gradient};
pub use grid::{Axis, Grid2D, Grid3D, GridError, MAX_GRID_POINTS, checked_point_count};
pub use mesh::{
    FanPolicy, IsoMesh, MeshError, MeshOptions, build_mesh, build_mesh_with_metrics,
};
pub use metrics::{IsoMetrics, IsoTimingReport, TimingBucket};
pub use range::{RangeError, ValueRange, analyze};
pub use sampler::{ExplicitGrid, Volume, sample_plane, sample_surface_2d, sample_volume};

#[cfg(test)]
mod tests;
