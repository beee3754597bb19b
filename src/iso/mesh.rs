//! Cell-by-cell isosurface extraction.
//!
//! Each crossing cell contributes the interpolated crossing points of its edges,
//! fanned into triangles around the first of them. Cells are processed in two
//! phases: crossing points are computed per cell (on the rayon pool with the
//! `parallel` feature), then merged serially in cell order so vertex numbering
//! does not depend on scheduling.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::classify::{CUBE_EDGES, classify, corner_indices};
use super::core::Point3;
use super::diagnostics::IsoMeshDiagnostics;
use super::edge::{EdgeKey, VertexTable, edge_crossing, is_crossed};
use super::grid::Grid3D;
use super::metrics::{IsoMetrics, TimingBucket};
use super::sampler::{Volume, collect_indexed};

/// Which crossing cells get triangulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanPolicy {
    /// Every cell with mixed corner signs.
    #[default]
    AllCrossing,
    /// Only cells with exactly one corner on one side (popcount 1 or 7).
    /// Leaves holes in most surfaces; kept for output compatibility with older clients.
    SingleCorner,
}

impl FanPolicy {
    fn accepts(self, inside_count: u32) -> bool {
        match self {
            Self::AllCrossing => true,
            Self::SingleCorner => inside_count == 1 || inside_count == 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshOptions {
    pub fan_policy: FanPolicy,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("isosurface is empty: no cell crosses the isovalue")]
    EmptyMesh,
    #[error("volume dimensions {volume:?} do not match grid {grid:?}")]
    DimensionMismatch { volume: [usize; 3], grid: [usize; 3] },
}

/// Indexed triangle mesh. Faces index into `vertices`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IsoMesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl IsoMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.faces.iter().flatten().all(|&i| i < n)
    }

    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.vertices.iter().flatten().any(|c| !c.is_finite())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        Ok(())
    }

    /// Wavefront OBJ text (1-based face indices).
    #[must_use]
    pub fn to_obj(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# isosurface");
        let _ = writeln!(out, "o {name}");
        for [x, y, z] in &self.vertices {
            let _ = writeln!(out, "v {x} {y} {z}");
        }
        for [a, b, c] in &self.faces {
            let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
        }
        out
    }
}

enum CellOutcome {
    Empty,
    Invalid,
    SkippedByPolicy,
    Crossing(Vec<(EdgeKey, Point3)>),
}

/// Extracts the `iso` level set of `volume` sampled on `grid`.
///
/// Fails with [`MeshError::EmptyMesh`] when no cell yields a triangle.
pub fn build_mesh(
    volume: &Volume,
    grid: &Grid3D,
    iso: f64,
    options: MeshOptions,
) -> Result<(IsoMesh, IsoMeshDiagnostics), MeshError> {
    let mut metrics = IsoMetrics::default();
    build_mesh_with_metrics(volume, grid, iso, options, &mut metrics)
}

/// As [`build_mesh`], timing the per-cell and merge phases into `metrics`.
pub fn build_mesh_with_metrics(
    volume: &Volume,
    grid: &Grid3D,
    iso: f64,
    options: MeshOptions,
    metrics: &mut IsoMetrics,
) -> Result<(IsoMesh, IsoMeshDiagnostics), MeshError> {
    if volume.dims() != grid.dims() {
        return Err(MeshError::DimensionMismatch {
            volume: volume.dims(),
            grid: grid.dims(),
        });
    }

    let [nx, ny, nz] = grid.dims();
    let cells = [
        nx.saturating_sub(1),
        ny.saturating_sub(1),
        nz.saturating_sub(1),
    ];
    let cell_count = cells[0] * cells[1] * cells[2];

    let outcomes = metrics.time(TimingBucket::Classification, || {
        collect_indexed(cell_count, |index| {
            let origin = [
                index / (cells[1] * cells[2]),
                (index / cells[2]) % cells[1],
                index % cells[2],
            ];
            process_cell(volume, grid, origin, iso, options.fan_policy)
        })
    });

    let mut diagnostics = IsoMeshDiagnostics {
        cell_count,
        ..Default::default()
    };

    let (mesh, shared) = metrics.time(TimingBucket::Assembly, || {
        let mut table = VertexTable::new();
        let mut faces = Vec::new();
        let mut indices = Vec::with_capacity(12);

        for outcome in outcomes {
            let crossings = match outcome {
                CellOutcome::Empty => continue,
                CellOutcome::Invalid => {
                    diagnostics.invalid_cell_count += 1;
                    continue;
                }
                CellOutcome::SkippedByPolicy => {
                    diagnostics.crossing_cell_count += 1;
                    diagnostics.skipped_by_policy_count += 1;
                    continue;
                }
                CellOutcome::Crossing(crossings) => crossings,
            };
            diagnostics.crossing_cell_count += 1;

            indices.clear();
            indices.extend(
                crossings
                    .into_iter()
                    .map(|(key, point)| table.insert(key, point)),
            );
            if indices.len() < 3 {
                diagnostics.degenerate_cell_count += 1;
                continue;
            }
            let pivot = indices[0];
            faces.extend(indices.windows(2).skip(1).map(|w| [pivot, w[0], w[1]]));
        }

        let shared = table.dedup_hits();
        (
            IsoMesh {
                vertices: table.into_vertices(),
                faces,
            },
            shared,
        )
    });

    diagnostics.vertex_count = mesh.vertex_count();
    diagnostics.triangle_count = mesh.triangle_count();
    diagnostics.shared_vertex_count = shared;
    if diagnostics.invalid_ratio() > 0.5 {
        diagnostics.add_warning(format!(
            "{} of {} cells skipped for undefined samples",
            diagnostics.invalid_cell_count, diagnostics.cell_count
        ));
    }
    diagnostics.timing = metrics.end();

    log::debug!("iso {iso}: {}", diagnostics.summary());

    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok((mesh, diagnostics))
}

fn process_cell(
    volume: &Volume,
    grid: &Grid3D,
    origin: [usize; 3],
    iso: f64,
    policy: FanPolicy,
) -> CellOutcome {
    let corners = corner_indices(origin);
    let values = corners.map(|[i, j, k]| volume.get(i, j, k));

    let config = classify(&values, iso);
    if !config.valid {
        return CellOutcome::Invalid;
    }
    if !config.is_crossing() {
        return CellOutcome::Empty;
    }
    if !policy.accepts(config.inside_count()) {
        return CellOutcome::SkippedByPolicy;
    }

    let crossings = CUBE_EDGES
        .iter()
        .filter(|&&(a, b)| is_crossed(values[a], values[b], iso))
        .map(|&(a, b)| {
            edge_crossing(
                (corners[a], grid.point(corners[a]), values[a]),
                (corners[b], grid.point(corners[b]), values[b]),
                iso,
            )
        })
        .collect();

    CellOutcome::Crossing(crossings)
}
