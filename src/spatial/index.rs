//! Location index: snaps GPS coordinates to their closest base edge.
//!
//! Every geometry point of every edge is fed into a [`SpatialHashtable`]
//! with the edge id as payload. A query grows a search circle around the
//! GPS fix, collects candidate edges and projects the fix exactly onto
//! each candidate's geometry.

use log::debug;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::geo::{haversine_distance, project_on_segment};
use crate::graph::base::BaseGraph;
use crate::graph::edge::{GeoPoint, GeometryMode};
use crate::graph::Graph;
use crate::query::snap::{Snap, SnappedPosition};
use crate::spatial::hashtable::{SpatialHashtable, TableConfig};

/// First search radius; doubled until a snap is confirmed
const INITIAL_RADIUS_M: f64 = 200.0;
/// Give up beyond this radius. Must reach the nearest stored geometry
/// point, not just the nearest edge interior.
const MAX_RADIUS_M: f64 = 120_000.0;

/// Coordinates closer than this count as the same point (~0.1 mm)
const COORD_EPS: f64 = 1e-9;

pub struct LocationIndex {
    table: SpatialHashtable,
}

impl LocationIndex {
    pub fn build(graph: &BaseGraph) -> Result<LocationIndex> {
        Self::build_with(graph, TableConfig::default())
    }

    pub fn build_with(graph: &BaseGraph, config: TableConfig) -> Result<LocationIndex> {
        let mut points = 0usize;
        for edge in 0..graph.edges() {
            points += graph
                .edge_way_geometry(edge, false, GeometryMode::All)
                .len();
        }
        let mut table = SpatialHashtable::init(config, points.max(1))?;
        for edge in 0..graph.edges() {
            let full = graph.edge_way_geometry(edge, false, GeometryMode::All);
            for p in full.iter() {
                table.add(p.lat, p.lon, edge as u64)?;
            }
        }
        debug!(
            "location index over {} edges holds {} points in {} buckets",
            graph.edges(),
            table.size(),
            table.max_buckets()
        );
        Ok(LocationIndex { table })
    }

    pub fn table(&self) -> &SpatialHashtable {
        &self.table
    }

    /// Snap to the closest edge, or None when nothing is within
    /// [`MAX_RADIUS_M`]
    pub fn find_closest(&self, graph: &BaseGraph, lat: f64, lon: f64) -> Option<Snap> {
        let mut best: Option<Snap> = None;
        let mut radius = INITIAL_RADIUS_M;
        while radius <= MAX_RADIUS_M {
            let mut candidates: FxHashSet<u32> = FxHashSet::default();
            for entry in self.table.nodes_near(lat, lon, radius / 1000.0) {
                candidates.insert(entry.value as u32);
            }
            for edge in candidates {
                let snap = snap_to_edge(graph, edge, lat, lon);
                if best
                    .as_ref()
                    .map(|b| snap.distance_m < b.distance_m)
                    .unwrap_or(true)
                {
                    best = Some(snap);
                }
            }
            // a snap is only trusted once the circle covers its distance;
            // a closer edge may hide just outside the current ring
            if let Some(ref b) = best {
                if b.distance_m <= radius {
                    return best;
                }
            }
            radius *= 2.0;
        }
        best
    }
}

fn snap_to_edge(graph: &BaseGraph, edge: u32, lat: f64, lon: f64) -> Snap {
    let full = graph.edge_way_geometry(edge, false, GeometryMode::All);
    let mut best_segment = 0usize;
    let mut best_point = full.get(0);
    let mut best_dist = f64::INFINITY;
    for i in 0..full.len() - 1 {
        let a = full.get(i);
        let b = full.get(i + 1);
        let (_, plat, plon) = project_on_segment(lat, lon, a.lat, a.lon, b.lat, b.lon);
        let dist = haversine_distance(lat, lon, plat, plon);
        if dist < best_dist {
            best_dist = dist;
            best_segment = i;
            best_point = GeoPoint::new(plat, plon);
        }
    }

    // landing on a geometry point makes the snap a pillar or tower snap
    let mut way_index = best_segment;
    let mut position = SnappedPosition::Edge;
    let mut closest_node = None;
    if same_point(best_point, full.get(best_segment + 1)) {
        way_index = best_segment + 1;
        best_point = full.get(way_index);
    }
    if same_point(best_point, full.get(way_index)) {
        if way_index == 0 {
            position = SnappedPosition::Tower;
            closest_node = Some(graph.edge_nodes(edge).0);
        } else if way_index == full.len() - 1 {
            position = SnappedPosition::Tower;
            closest_node = Some(graph.edge_nodes(edge).1);
            way_index -= 1;
        } else {
            position = SnappedPosition::Pillar;
        }
    }

    let mut snap = Snap::new(
        GeoPoint::new(lat, lon),
        best_point,
        edge,
        way_index,
        position,
        best_dist,
    );
    snap.closest_node = closest_node;
    snap
}

fn same_point(a: GeoPoint, b: GeoPoint) -> bool {
    (a.lat - b.lat).abs() < COORD_EPS && (a.lon - b.lon).abs() < COORD_EPS
}
