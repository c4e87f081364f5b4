//! Result of projecting a GPS fix onto its closest base edge.

use crate::graph::edge::GeoPoint;

/// Where on the edge the projection landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnappedPosition {
    /// On a tower node; routing starts at the real node, no virtual node
    /// is introduced
    Tower,
    /// On an intermediate geometry point
    Pillar,
    /// Strictly inside a geometry segment
    Edge,
}

/// One snapped GPS point, input to the query overlay
#[derive(Debug, Clone)]
pub struct Snap {
    pub query_point: GeoPoint,
    pub snapped_point: GeoPoint,
    /// Base edge the point was snapped onto
    pub closest_edge: u32,
    /// Segment index into the edge's full geometry (towers included) that
    /// the snapped point lies on
    pub way_index: usize,
    pub position: SnappedPosition,
    /// Haversine distance query -> snapped point, in meters
    pub distance_m: f64,
    /// Tower node for tower snaps (set at lookup time), virtual node id
    /// otherwise (set while the overlay is built)
    pub closest_node: Option<u32>,
}

impl Snap {
    pub fn new(
        query_point: GeoPoint,
        snapped_point: GeoPoint,
        closest_edge: u32,
        way_index: usize,
        position: SnappedPosition,
        distance_m: f64,
    ) -> Self {
        Snap {
            query_point,
            snapped_point,
            closest_edge,
            way_index,
            position,
            distance_m,
            closest_node: None,
        }
    }
}
