//! Statistics collected while extracting an isosurface.
//!
//! Returned next to the mesh by [`super::build_mesh`]. Nothing here influences the
//! mesh itself; it exists for logging and for callers that want to explain an
//! empty or sparse result (most cells invalid, isovalue outside the range, ...).

use std::fmt;

use super::metrics::IsoTimingReport;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IsoMeshDiagnostics {
    /// Cells in the grid, `(nx-1)(ny-1)(nz-1)`.
    pub cell_count: usize,

    /// Cells with at least one corner on each side of the isovalue.
    pub crossing_cell_count: usize,

    /// Cells skipped because a corner sample was NaN.
    pub invalid_cell_count: usize,

    /// Crossing cells that produced fewer than three edge vertices.
    pub degenerate_cell_count: usize,

    /// Crossing cells left out by [`super::FanPolicy::SingleCorner`].
    pub skipped_by_policy_count: usize,

    pub vertex_count: usize,
    pub triangle_count: usize,

    /// Edge vertices answered by an already emitted vertex.
    pub shared_vertex_count: usize,

    /// Only populated with the `iso_metrics` feature outside WASM.
    pub timing: Option<IsoTimingReport>,

    pub warnings: Vec<String>,
}

impl IsoMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Fraction of cells that were skipped for NaN corners.
    #[must_use]
    pub fn invalid_ratio(&self) -> f64 {
        if self.cell_count == 0 {
            0.0
        } else {
            self.invalid_cell_count as f64 / self.cell_count as f64
        }
    }

    /// Short one-line form for logging: `"V:{vertices} T:{triangles} [details...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];
        parts.push(format!(
            "cells:{}/{}",
            self.crossing_cell_count, self.cell_count
        ));
        if self.invalid_cell_count > 0 {
            parts.push(format!("invalid:{}", self.invalid_cell_count));
        }
        if self.degenerate_cell_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_cell_count));
        }
        if self.skipped_by_policy_count > 0 {
            parts.push(format!("policy-skipped:{}", self.skipped_by_policy_count));
        }
        if self.shared_vertex_count > 0 {
            parts.push(format!("shared:{}", self.shared_vertex_count));
        }
        parts.join(" ")
    }
}

impl fmt::Display for IsoMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Isosurface Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(
            f,
            "  Cells: {} total, {} crossing",
            self.cell_count, self.crossing_cell_count
        )?;
        if self.invalid_cell_count > 0 {
            writeln!(f, "    - Skipped (invalid corners): {}", self.invalid_cell_count)?;
        }
        if self.degenerate_cell_count > 0 {
            writeln!(f, "    - Fewer than 3 vertices: {}", self.degenerate_cell_count)?;
        }
        if self.skipped_by_policy_count > 0 {
            writeln!(f, "    - Skipped by fan policy: {}", self.skipped_by_policy_count)?;
        }
        if self.shared_vertex_count > 0 {
            writeln!(f, "  Shared edge vertices: {}", self.shared_vertex_count)?;
        }
        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {}", warning)?;
            }
        }
        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }
        Ok(())
    }
}
