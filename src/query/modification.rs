//! Builds the per-request overlay state: virtual nodes, the four-edge
//! quadruple spliced in for every non-tower snap, and the edge deltas at
//! the affected real tower nodes.

use log::debug;
use rustc_hash::FxHashMap;

use crate::graph::base::BaseGraph;
use crate::graph::edge::{GeoPoint, GeometryMode, PointList};
use crate::graph::Graph;
use crate::query::snap::{Snap, SnappedPosition};
use crate::query::virtual_edge::VirtualEdgeState;

/// Slot offsets of the four virtual edges of one virtual node.
///
/// Slots `2i` and `2i + 1` are the two directions of the same physical
/// edge, so the reverse of slot `s` is always `s ^ 1`.
pub const VE_BASE: u32 = 0;
pub const VE_BASE_REV: u32 = 1;
pub const VE_ADJ: u32 = 2;
pub const VE_ADJ_REV: u32 = 3;

/// Edge deltas at one real tower node touched by at least one snap
#[derive(Debug, Default)]
pub struct EdgeChanges {
    /// Slots of the virtual edges whose base node is this tower
    pub additional_edges: Vec<u32>,
    /// Base edges hidden at this tower because a snap split them
    pub removed_edges: Vec<u32>,
}

/// Immutable overlay state computed once per routing request
#[derive(Debug)]
pub struct GraphModification {
    main_nodes: u32,
    main_edges: u32,
    virtual_nodes: PointList,
    virtual_edges: Vec<VirtualEdgeState>,
    /// Base edge each virtual node was placed on
    closest_edges: Vec<u32>,
    edge_changes: FxHashMap<u32, EdgeChanges>,
}

impl GraphModification {
    /// Splice `snaps` into `graph`. Tower snaps keep their real tower
    /// node; every other snap is assigned a virtual node id (written back
    /// into `closest_node`), duplicates collapsing onto one node.
    pub fn build(graph: &BaseGraph, snaps: &mut [Snap]) -> GraphModification {
        let main_nodes = graph.nodes();
        let main_edges = graph.edges();

        // assign virtual node ids in input order, collapsing duplicates
        let mut dedup: FxHashMap<(u32, u64, u64), u32> = FxHashMap::default();
        let mut virtual_nodes = PointList::new();
        let mut closest_edges: Vec<u32> = Vec::new();
        let mut way_indices: Vec<usize> = Vec::new();
        for snap in snaps.iter_mut() {
            if snap.position == SnappedPosition::Tower {
                continue;
            }
            let p = snap.snapped_point;
            let key = (snap.closest_edge, p.lat.to_bits(), p.lon.to_bits());
            let k = *dedup.entry(key).or_insert_with(|| {
                virtual_nodes.push_point(p);
                closest_edges.push(snap.closest_edge);
                way_indices.push(snap.way_index);
                virtual_nodes.len() as u32 - 1
            });
            snap.closest_node = Some(main_nodes + k);
        }
        let virtual_count = virtual_nodes.len();

        // group virtual nodes by the edge they split
        let mut groups: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for k in 0..virtual_count as u32 {
            groups.entry(closest_edges[k as usize]).or_default().push(k);
        }

        let mut virtual_edges: Vec<Option<VirtualEdgeState>> = Vec::new();
        virtual_edges.resize_with(virtual_count * 4, || None);

        for (&edge, ks) in &mut groups {
            let full = graph.edge_way_geometry(edge, false, GeometryMode::All);
            let flags = graph.edge_flags(edge);
            let (edge_base, edge_adj) = graph.edge_nodes(edge);

            // thread the chain through the snaps in geometric order
            let prefix = cumulative_lengths(&full);
            ks.sort_by(|&a, &b| {
                let da = distance_along(&full, &prefix, way_indices[a as usize], virtual_nodes.get(a as usize));
                let db = distance_along(&full, &prefix, way_indices[b as usize], virtual_nodes.get(b as usize));
                da.total_cmp(&db)
            });

            let mut prev_point = full.get(0);
            let mut prev_way_index = 0usize;
            let mut prev_node = edge_base;
            for (j, &k) in ks.iter().enumerate() {
                let point = virtual_nodes.get(k as usize);
                let way_index = way_indices[k as usize];
                let geometry =
                    slice_between(&full, prev_point, prev_way_index, point, way_index);
                let distance = geometry.distance_m();
                let virt_node = main_nodes + k;

                set_pair(
                    &mut virtual_edges,
                    main_edges,
                    4 * k + VE_BASE,
                    prev_node,
                    virt_node,
                    distance,
                    flags,
                    &geometry,
                );
                if j > 0 {
                    // the segment also serves as the previous node's adj pair
                    let prev_k = ks[j - 1];
                    set_pair(
                        &mut virtual_edges,
                        main_edges,
                        4 * prev_k + VE_ADJ,
                        prev_node,
                        virt_node,
                        distance,
                        flags,
                        &geometry,
                    );
                }

                prev_point = point;
                prev_way_index = way_index;
                prev_node = virt_node;
            }

            // suffix from the last virtual node to the adjacent tower
            let last_k = *ks.last().expect("group is never empty");
            let mut suffix = PointList::with_capacity(full.len() - prev_way_index + 1);
            suffix.push_dedup(prev_point);
            for i in prev_way_index + 1..full.len() {
                suffix.push_dedup(full.get(i));
            }
            let distance = suffix.distance_m();
            set_pair(
                &mut virtual_edges,
                main_edges,
                4 * last_k + VE_ADJ,
                prev_node,
                edge_adj,
                distance,
                flags,
                &suffix,
            );
        }

        let virtual_edges: Vec<VirtualEdgeState> = virtual_edges
            .into_iter()
            .map(|e| e.expect("every slot of a virtual node quadruple is filled"))
            .collect();

        let edge_changes =
            build_edge_changes(&virtual_edges, &closest_edges, main_nodes, virtual_count as u32);

        debug!(
            "built graph modification: {} virtual nodes, {} virtual edges, {} modified tower nodes",
            virtual_count,
            virtual_edges.len(),
            edge_changes.len()
        );

        GraphModification {
            main_nodes,
            main_edges,
            virtual_nodes,
            virtual_edges,
            closest_edges,
            edge_changes,
        }
    }

    pub fn main_nodes(&self) -> u32 {
        self.main_nodes
    }

    /// Smallest virtual edge id; everything below is a base edge
    pub fn first_virtual_edge_id(&self) -> u32 {
        self.main_edges
    }

    pub fn virtual_node_count(&self) -> u32 {
        self.virtual_nodes.len() as u32
    }

    pub fn virtual_edge_count(&self) -> u32 {
        self.virtual_edges.len() as u32
    }

    pub fn virtual_nodes(&self) -> &PointList {
        &self.virtual_nodes
    }

    pub fn virtual_edge(&self, slot: u32) -> &VirtualEdgeState {
        &self.virtual_edges[slot as usize]
    }

    pub fn closest_edge(&self, virtual_index: u32) -> u32 {
        self.closest_edges[virtual_index as usize]
    }

    pub fn edge_changes(&self) -> &FxHashMap<u32, EdgeChanges> {
        &self.edge_changes
    }
}

fn cumulative_lengths(full: &PointList) -> Vec<f64> {
    let mut prefix = Vec::with_capacity(full.len());
    let mut sum = 0.0;
    prefix.push(0.0);
    for i in 1..full.len() {
        let a = full.get(i - 1);
        let b = full.get(i);
        sum += crate::geo::haversine_distance(a.lat, a.lon, b.lat, b.lon);
        prefix.push(sum);
    }
    prefix
}

fn distance_along(full: &PointList, prefix: &[f64], way_index: usize, point: GeoPoint) -> f64 {
    let start = full.get(way_index);
    prefix[way_index] + crate::geo::haversine_distance(start.lat, start.lon, point.lat, point.lon)
}

/// Polyline from `prev_point` (on segment `prev_way_index`) to `point`
/// (on segment `way_index`), pillars in between included
fn slice_between(
    full: &PointList,
    prev_point: GeoPoint,
    prev_way_index: usize,
    point: GeoPoint,
    way_index: usize,
) -> PointList {
    let mut pl = PointList::with_capacity(way_index - prev_way_index + 2);
    pl.push_dedup(prev_point);
    for i in prev_way_index + 1..=way_index {
        pl.push_dedup(full.get(i));
    }
    pl.push_dedup(point);
    pl
}

#[allow(clippy::too_many_arguments)]
fn set_pair(
    edges: &mut [Option<VirtualEdgeState>],
    main_edges: u32,
    slot: u32,
    base_node: u32,
    adj_node: u32,
    distance: f64,
    flags: crate::graph::edge::EdgeFlags,
    geometry: &PointList,
) {
    edges[slot as usize] = Some(VirtualEdgeState::new(
        main_edges + slot,
        base_node,
        adj_node,
        distance,
        flags,
        geometry.clone(),
    ));
    edges[(slot ^ 1) as usize] = Some(VirtualEdgeState::new(
        main_edges + (slot ^ 1),
        adj_node,
        base_node,
        distance,
        flags.reversed(),
        geometry.reversed(),
    ));
}

/// For every real tower endpoint of a split edge, collect the virtual
/// edges based there and the base edges those virtual edges substitute.
fn build_edge_changes(
    virtual_edges: &[VirtualEdgeState],
    closest_edges: &[u32],
    main_nodes: u32,
    virtual_count: u32,
) -> FxHashMap<u32, EdgeChanges> {
    let mut changes: FxHashMap<u32, EdgeChanges> = FxHashMap::default();
    for k in 0..virtual_count {
        let base_rev = &virtual_edges[(4 * k + VE_BASE_REV) as usize];
        let tower = base_rev.adj_node();
        if tower < main_nodes {
            changes
                .entry(tower)
                .or_default()
                .additional_edges
                .push(4 * k + VE_BASE);
        }

        let adj = &virtual_edges[(4 * k + VE_ADJ) as usize];
        let tower = adj.adj_node();
        if tower < main_nodes {
            changes
                .entry(tower)
                .or_default()
                .additional_edges
                .push(4 * k + VE_ADJ_REV);
        }
    }

    for entry in changes.values_mut() {
        for &slot in &entry.additional_edges {
            let virt_node = virtual_edges[slot as usize].adj_node();
            let split_edge = closest_edges[(virt_node - main_nodes) as usize];
            if !entry.removed_edges.contains(&split_edge) {
                entry.removed_edges.push(split_edge);
            }
        }
    }
    changes
}
