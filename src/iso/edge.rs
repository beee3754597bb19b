//! Edge interpolation and vertex deduplication.
//!
//! A crossing point belongs to a grid edge, not to a cell: the four cells sharing
//! an edge must agree on one vertex index. Keys are the unordered pair of grid
//! indices of the edge's endpoints.

use std::collections::HashMap;

use super::core::{Point3, Tolerance};

/// Grid index triple `[i, j, k]`.
pub type GridIndex = [usize; 3];

/// Unordered grid edge. The smaller endpoint is always stored first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    low: GridIndex,
    high: GridIndex,
}

impl EdgeKey {
    #[must_use]
    pub fn new(a: GridIndex, b: GridIndex) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// True when `index` is the endpoint stored first.
    #[must_use]
    pub fn is_low(&self, index: GridIndex) -> bool {
        self.low == index
    }
}

/// Interpolation parameter along an edge from value `va` to `vb`.
///
/// Returns `0.5` for flat edges (`|va - vb|` at or below [`Tolerance::FLAT_EDGE`]),
/// otherwise `(iso - va) / (vb - va)` clamped to `[0, 1]`.
#[must_use]
pub fn interpolation_parameter(va: f64, vb: f64, iso: f64) -> f64 {
    let delta = vb - va;
    if Tolerance::FLAT_EDGE.approx_zero_f64(delta) {
        return 0.5;
    }
    ((iso - va) / delta).clamp(0.0, 1.0)
}

/// Crossing point on the edge `pa`-`pb`.
#[must_use]
pub fn interpolate(pa: Point3, va: f64, pb: Point3, vb: f64, iso: f64) -> Point3 {
    pa.lerp(pb, interpolation_parameter(va, vb, iso))
}

/// An edge is crossed when exactly one endpoint lies below the isovalue.
#[must_use]
pub fn is_crossed(va: f64, vb: f64, iso: f64) -> bool {
    (va < iso) != (vb < iso)
}

/// Key and crossing point of the grid edge `a`-`b`.
///
/// The point is always interpolated from the low endpoint of the key, so both
/// corner orders yield bit-identical coordinates.
#[must_use]
pub fn edge_crossing(
    (a, pa, va): (GridIndex, Point3, f64),
    (b, pb, vb): (GridIndex, Point3, f64),
    iso: f64,
) -> (EdgeKey, Point3) {
    let key = EdgeKey::new(a, b);
    let point = if key.is_low(a) {
        interpolate(pa, va, pb, vb, iso)
    } else {
        interpolate(pb, vb, pa, va, iso)
    };
    (key, point)
}

/// Deduplicating vertex store keyed by [`EdgeKey`].
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    vertices: Vec<[f64; 3]>,
    lookup: HashMap<EdgeKey, u32>,
    hits: usize,
}

impl VertexTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex for `key`, inserting `point` if the edge is new.
    ///
    /// `point` is ignored when the edge was already emitted.
    pub fn insert(&mut self, key: EdgeKey, point: Point3) -> u32 {
        if let Some(&index) = self.lookup.get(&key) {
            self.hits += 1;
            return index;
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(point.to_array());
        self.lookup.insert(key, index);
        index
    }

    /// Crossing vertex of the edge `a`-`b`, created on first request.
    ///
    /// Later requests for the same edge, in either corner order, return the
    /// stored point and index.
    pub fn vertex_for_edge(
        &mut self,
        a: (GridIndex, Point3, f64),
        b: (GridIndex, Point3, f64),
        iso: f64,
    ) -> (Point3, u32) {
        let (key, point) = edge_crossing(a, b, iso);
        let index = self.insert(key, point);
        (Point3::from_array(self.vertices[index as usize]), index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// How many lookups were answered by an existing vertex.
    #[must_use]
    pub fn dedup_hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub fn into_vertices(self) -> Vec<[f64; 3]> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_on_symmetric_edge() {
        let p = interpolate(
            Point3::new(0.0, 0.0, 0.0),
            0.0,
            Point3::new(1.0, 0.0, 0.0),
            10.0,
            5.0,
        );
        assert!((p.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn flat_edge_uses_midpoint() {
        assert_eq!(interpolation_parameter(2.0, 2.0, 2.0), 0.5);
        assert_eq!(interpolation_parameter(2.0, 2.0 + 1e-13, 7.0), 0.5);
    }

    #[test]
    fn parameter_is_clamped() {
        assert_eq!(interpolation_parameter(0.0, 1.0, 5.0), 1.0);
        assert_eq!(interpolation_parameter(0.0, 1.0, -5.0), 0.0);
        assert!((interpolation_parameter(1.0, 3.0, 1.5) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn crossing_uses_strict_below() {
        assert!(is_crossed(-1.0, 1.0, 0.0));
        assert!(is_crossed(-1.0, 0.0, 0.0));
        assert!(!is_crossed(0.0, 1.0, 0.0));
        assert!(!is_crossed(2.0, 3.0, 0.0));
    }

    #[test]
    fn edge_key_is_unordered() {
        let a = [1, 2, 3];
        let b = [1, 2, 4];
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert!(EdgeKey::new(b, a).is_low(a));
    }

    #[test]
    fn vertex_for_edge_ignores_corner_order() {
        let mut table = VertexTable::new();
        let a = ([2, 1, 1], Point3::new(2.0, 1.0, 1.0), 0.0);
        let b = ([2, 1, 2], Point3::new(2.0, 1.0, 2.0), 10.0);

        let (point, index) = table.vertex_for_edge(a, b, 5.0);
        let (again, same) = table.vertex_for_edge(b, a, 5.0);
        assert_eq!(point, Point3::new(2.0, 1.0, 1.5));
        assert_eq!(again, point);
        assert_eq!(index, same);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn vertex_table_dedups_shared_edges() {
        let mut table = VertexTable::new();
        let a = [0, 0, 0];
        let b = [1, 0, 0];
        let first = table.insert(EdgeKey::new(a, b), Point3::new(0.5, 0.0, 0.0));
        let second = table.insert(EdgeKey::new(b, a), Point3::new(9.0, 9.0, 9.0));
        let other = table.insert(EdgeKey::new(a, [0, 1, 0]), Point3::new(0.0, 0.5, 0.0));

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(table.len(), 2);
        assert_eq!(table.dedup_hits(), 1);
        assert_eq!(table.into_vertices()[0], [0.5, 0.0, 0.0]);
    }
}
