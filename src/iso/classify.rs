//! Cube corner layout and cell classification.

use super::edge::GridIndex;

/// Corner offsets relative to the cell origin `(i, j, k)`.
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// The twelve cube edges as corner pairs: bottom ring, top ring, verticals.
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Classification of one cell against the isovalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeConfig {
    /// Bit `c` is set when corner `c` is at or above the isovalue.
    pub mask: u8,
    /// Every corner value is finite.
    pub valid: bool,
}

impl CubeConfig {
    /// The surface passes through the cell.
    #[must_use]
    pub fn is_crossing(&self) -> bool {
        self.valid && self.mask != 0 && self.mask != 0xFF
    }

    /// Corners at or above the isovalue.
    #[must_use]
    pub fn inside_count(&self) -> u32 {
        self.mask.count_ones()
    }
}

/// Grid indices of the eight corners of the cell at `origin`.
#[must_use]
pub fn corner_indices([i, j, k]: GridIndex) -> [GridIndex; 8] {
    CORNER_OFFSETS.map(|[di, dj, dk]| [i + di, j + dj, k + dk])
}

/// Builds the corner mask. A cell with any non-finite corner is marked invalid.
#[must_use]
pub fn classify(values: &[f64; 8], iso: f64) -> CubeConfig {
    if values.iter().any(|v| !v.is_finite()) {
        return CubeConfig {
            mask: 0,
            valid: false,
        };
    }

    let mask = values
        .iter()
        .enumerate()
        .filter(|(_, value)| **value >= iso)
        .fold(0u8, |mask, (corner, _)| mask | (1 << corner));

    CubeConfig { mask, valid: true }
}
