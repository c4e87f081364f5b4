//! Virtual edge state: one direction of an ephemeral edge spliced into
//! the base graph for the duration of a single request.

use std::cell::Cell;

use crate::graph::edge::{EdgeFlags, GeometryMode, PointList};

/// One directed virtual edge.
///
/// States come in reverse pairs occupying neighboring slots; both carry
/// the same distance while base/adjacent node, access flags and geometry
/// direction are mirrored.
#[derive(Debug)]
pub struct VirtualEdgeState {
    edge: u32,
    base_node: u32,
    adj_node: u32,
    distance: f64,
    flags: EdgeFlags,
    /// Full polyline including both endpoints, oriented base -> adj
    geometry: PointList,
    unfavored: Cell<bool>,
}

impl VirtualEdgeState {
    pub(crate) fn new(
        edge: u32,
        base_node: u32,
        adj_node: u32,
        distance: f64,
        flags: EdgeFlags,
        geometry: PointList,
    ) -> Self {
        VirtualEdgeState {
            edge,
            base_node,
            adj_node,
            distance,
            flags,
            geometry,
            unfavored: Cell::new(false),
        }
    }

    pub fn edge(&self) -> u32 {
        self.edge
    }

    pub fn base_node(&self) -> u32 {
        self.base_node
    }

    pub fn adj_node(&self) -> u32 {
        self.adj_node
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    pub fn fetch_way_geometry(&self, mode: GeometryMode) -> PointList {
        let n = self.geometry.len();
        let (from, to) = match mode {
            GeometryMode::All => (0, n),
            GeometryMode::Pillars => (1, n.saturating_sub(1)),
            GeometryMode::WithBase => (0, n.saturating_sub(1)),
            GeometryMode::WithAdj => (1, n),
        };
        let mut result = PointList::with_capacity(to.saturating_sub(from));
        for i in from..to {
            result.push_point(self.geometry.get(i));
        }
        result
    }

    /// Weighting hint, see `QueryGraph::enforce_heading`
    pub fn is_unfavored(&self) -> bool {
        self.unfavored.get()
    }

    pub(crate) fn set_unfavored(&self, unfavored: bool) {
        self.unfavored.set(unfavored);
    }
}
