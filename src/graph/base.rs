//! In-memory base graph: densely numbered tower nodes and edges with
//! pillar geometry, per-node adjacency and optional turn costs.
//!
//! The graph is built once, then treated as immutable by everything in the
//! query layer. Persistence is a straight bincode dump of the storage.

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::edge::{EdgeFilter, EdgeFlags, EdgeRef, GeometryMode, PointList};
use crate::graph::{EdgeExplorer, Graph, NodeAccess};
use crate::shapes::BBox;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeData {
    base: u32,
    adj: u32,
    distance: f64,
    flags: EdgeFlags,
    /// Pillar points only, ordered base -> adj
    geometry: PointList,
}

/// The immutable road graph the query overlay is layered on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseGraph {
    nodes: PointList,
    edges: Vec<EdgeData>,
    adjacency: Vec<Vec<u32>>,
    bounds: BBox,
    turn_costs: FxHashMap<(u32, u32, u32), f64>,
}

impl Default for BaseGraph {
    fn default() -> Self {
        BaseGraph::new()
    }
}

impl BaseGraph {
    pub fn new() -> Self {
        BaseGraph {
            nodes: PointList::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            bounds: BBox::inverse(),
            turn_costs: FxHashMap::default(),
        }
    }

    pub fn add_node(&mut self, lat: f64, lon: f64) -> u32 {
        let id = self.nodes.len() as u32;
        self.nodes.push(lat, lon);
        self.adjacency.push(Vec::new());
        self.bounds.extend(lat, lon);
        id
    }

    pub fn add_edge(&mut self, base: u32, adj: u32, distance: f64, flags: EdgeFlags) -> u32 {
        let id = self.edges.len() as u32;
        self.edges.push(EdgeData {
            base,
            adj,
            distance,
            flags,
            geometry: PointList::new(),
        });
        self.adjacency[base as usize].push(id);
        if base != adj {
            self.adjacency[adj as usize].push(id);
        }
        id
    }

    /// Set the pillar geometry of an edge, ordered base -> adj, endpoints
    /// excluded
    pub fn set_way_geometry(&mut self, edge: u32, pillars: PointList) {
        self.edges[edge as usize].geometry = pillars;
    }

    pub fn add_turn_cost(&mut self, from_edge: u32, via_node: u32, to_edge: u32, cost: f64) {
        self.turn_costs.insert((from_edge, via_node, to_edge), cost);
    }

    pub fn turn_cost(&self, from_edge: u32, via_node: u32, to_edge: u32) -> f64 {
        self.turn_costs
            .get(&(from_edge, via_node, to_edge))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = File::create(path).context("Failed to create graph file")?;
        let writer = BufWriter::new(file);
        bincode::serialize_into(writer, self).context("Failed to serialize graph")?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = File::open(path).context("Failed to open graph file")?;
        let reader = BufReader::new(file);
        bincode::deserialize_from(reader).context("Failed to deserialize graph")
    }

    pub(crate) fn adjacency(&self, node: u32) -> &[u32] {
        &self.adjacency[node as usize]
    }

    pub(crate) fn edge_nodes(&self, edge: u32) -> (u32, u32) {
        let data = &self.edges[edge as usize];
        (data.base, data.adj)
    }

    pub(crate) fn edge_distance(&self, edge: u32) -> f64 {
        self.edges[edge as usize].distance
    }

    pub(crate) fn edge_flags(&self, edge: u32) -> EdgeFlags {
        self.edges[edge as usize].flags
    }

    pub(crate) fn edge_way_geometry(
        &self,
        edge: u32,
        reverse: bool,
        mode: GeometryMode,
    ) -> PointList {
        let data = &self.edges[edge as usize];
        let mut result = PointList::with_capacity(data.geometry.len() + 2);

        let (first_node, last_node) = if reverse {
            (data.adj, data.base)
        } else {
            (data.base, data.adj)
        };
        if matches!(mode, GeometryMode::WithBase | GeometryMode::All) {
            result.push(self.lat(first_node), self.lon(first_node));
        }
        if reverse {
            for i in (0..data.geometry.len()).rev() {
                result.push_point(data.geometry.get(i));
            }
        } else {
            for p in data.geometry.iter() {
                result.push_point(p);
            }
        }
        if matches!(mode, GeometryMode::WithAdj | GeometryMode::All) {
            result.push(self.lat(last_node), self.lon(last_node));
        }
        result
    }
}

impl NodeAccess for BaseGraph {
    fn lat(&self, node: u32) -> f64 {
        self.nodes.lat(node as usize)
    }

    fn lon(&self, node: u32) -> f64 {
        self.nodes.lon(node as usize)
    }
}

impl Graph for BaseGraph {
    fn nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    fn edges(&self) -> u32 {
        self.edges.len() as u32
    }

    fn bounds(&self) -> BBox {
        self.bounds
    }

    fn node_access(&self) -> &dyn NodeAccess {
        self
    }

    fn edge_state(&self, edge: u32, adj_node: Option<u32>) -> Result<EdgeRef<'_>> {
        if edge as usize >= self.edges.len() {
            return Err(Error::InvalidArgument(format!(
                "edge id {edge} out of range, graph has {} edges",
                self.edges.len()
            )));
        }
        let data = &self.edges[edge as usize];
        let reverse = match adj_node {
            None => false,
            Some(n) if data.adj == n => false,
            Some(n) if data.base == n => true,
            Some(n) => return Err(Error::EdgeNotFound { edge, adj_node: n }),
        };
        Ok(EdgeRef::Base {
            graph: self,
            edge,
            reverse,
        })
    }

    fn explorer_with(&self, filter: EdgeFilter) -> EdgeExplorer<'_> {
        EdgeExplorer::Base(BaseEdgeExplorer::new(self, filter))
    }

    fn other_node(&self, edge: u32, node: u32) -> Result<u32> {
        if edge as usize >= self.edges.len() {
            return Err(Error::InvalidArgument(format!("edge id {edge} out of range")));
        }
        let (base, adj) = self.edge_nodes(edge);
        Ok(if base == node { adj } else { base })
    }

    fn is_adjacent_to_node(&self, edge: u32, node: u32) -> Result<bool> {
        if edge as usize >= self.edges.len() {
            return Err(Error::InvalidArgument(format!("edge id {edge} out of range")));
        }
        let (base, adj) = self.edge_nodes(edge);
        Ok(base == node || adj == node)
    }

    fn all_edges(&self) -> Result<AllEdges<'_>> {
        Ok(AllEdges {
            graph: self,
            next: 0,
        })
    }

    fn edge(&mut self, base: u32, adj: u32, distance: f64, flags: EdgeFlags) -> Result<u32> {
        Ok(self.add_edge(base, adj, distance, flags))
    }

    fn copy_to(&self, target: &mut BaseGraph) -> Result<()> {
        *target = self.clone();
        Ok(())
    }
}

/// Iterates every edge once, in storage orientation
pub struct AllEdges<'g> {
    graph: &'g BaseGraph,
    next: u32,
}

impl<'g> Iterator for AllEdges<'g> {
    type Item = EdgeRef<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        if (self.next as usize) < self.graph.edges.len() {
            let edge = self.next;
            self.next += 1;
            Some(EdgeRef::Base {
                graph: self.graph,
                edge,
                reverse: false,
            })
        } else {
            None
        }
    }
}

/// Adjacency iterator over the base graph, reset per base node
pub struct BaseEdgeExplorer<'g> {
    graph: &'g BaseGraph,
    filter: EdgeFilter,
    node: u32,
    edges: &'g [u32],
    pos: usize,
    current: Option<(u32, bool)>,
}

impl<'g> BaseEdgeExplorer<'g> {
    pub(crate) fn new(graph: &'g BaseGraph, filter: EdgeFilter) -> Self {
        BaseEdgeExplorer {
            graph,
            filter,
            node: 0,
            edges: &[],
            pos: 0,
            current: None,
        }
    }

    pub fn set_base_node(&mut self, node: u32) {
        self.node = node;
        self.edges = self.graph.adjacency(node);
        self.pos = 0;
        self.current = None;
    }

    pub fn next(&mut self) -> bool {
        while self.pos < self.edges.len() {
            let edge = self.edges[self.pos];
            self.pos += 1;
            let (base, _) = self.graph.edge_nodes(edge);
            let reverse = base != self.node;
            let state = EdgeRef::Base {
                graph: self.graph,
                edge,
                reverse,
            };
            if self.filter.accept(&state) {
                self.current = Some((edge, reverse));
                return true;
            }
        }
        self.current = None;
        false
    }

    pub fn state(&self) -> EdgeRef<'g> {
        let (edge, reverse) = self
            .current
            .expect("iterator is not positioned, call next() first");
        EdgeRef::Base {
            graph: self.graph,
            edge,
            reverse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> BaseGraph {
        let mut g = BaseGraph::new();
        let a = g.add_node(0.0, 0.0);
        let b = g.add_node(0.0, 1.0);
        let e = g.add_edge(a, b, 111_195.0, EdgeFlags::both_directions());
        let mut pillars = PointList::new();
        pillars.push(0.0, 0.5);
        g.set_way_geometry(e, pillars);
        g
    }

    #[test]
    fn test_explorer_sees_edge_from_both_endpoints() {
        let g = two_node_graph();
        let mut ex = g.explorer();

        ex.set_base_node(0);
        assert!(ex.next());
        assert_eq!((ex.base_node(), ex.adj_node()), (0, 1));
        assert!(!ex.next());

        ex.set_base_node(1);
        assert!(ex.next());
        assert_eq!((ex.base_node(), ex.adj_node()), (1, 0));
        assert!(!ex.next());
    }

    #[test]
    fn test_oneway_filtering() {
        let mut g = BaseGraph::new();
        let a = g.add_node(0.0, 0.0);
        let b = g.add_node(0.0, 1.0);
        g.add_edge(a, b, 100.0, EdgeFlags::one_way());

        let mut out = g.explorer_with(EdgeFilter::Outgoing);
        out.set_base_node(b);
        assert!(!out.next(), "one-way edge must not leave its head");

        let mut inc = g.explorer_with(EdgeFilter::Incoming);
        inc.set_base_node(b);
        assert!(inc.next());
        assert_eq!(inc.adj_node(), a);
    }

    #[test]
    fn test_edge_state_orientation() {
        let g = two_node_graph();
        let fwd = g.edge_state(0, Some(1)).unwrap();
        assert_eq!((fwd.base_node(), fwd.adj_node()), (0, 1));
        let rev = g.edge_state(0, Some(0)).unwrap();
        assert_eq!((rev.base_node(), rev.adj_node()), (1, 0));
        assert_eq!(fwd.distance(), rev.distance());

        let geo_fwd = fwd.fetch_way_geometry(GeometryMode::All);
        let geo_rev = rev.fetch_way_geometry(GeometryMode::All);
        assert_eq!(geo_fwd, geo_rev.reversed());

        match g.edge_state(0, Some(77)) {
            Err(Error::EdgeNotFound { edge: 0, adj_node: 77 }) => {}
            other => panic!("expected EdgeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_way_geometry_modes() {
        let g = two_node_graph();
        let state = g.edge_state(0, None).unwrap();
        assert_eq!(state.fetch_way_geometry(GeometryMode::Pillars).len(), 1);
        assert_eq!(state.fetch_way_geometry(GeometryMode::WithBase).len(), 2);
        assert_eq!(state.fetch_way_geometry(GeometryMode::WithAdj).len(), 2);
        let all = state.fetch_way_geometry(GeometryMode::All);
        assert_eq!(all.len(), 3);
        assert_eq!(all.first().unwrap().lon, 0.0);
        assert_eq!(all.last().unwrap().lon, 1.0);
    }

    #[test]
    fn test_turn_costs_default_to_zero() {
        let mut g = two_node_graph();
        g.add_turn_cost(0, 1, 0, 3.5);
        assert_eq!(g.turn_cost(0, 1, 0), 3.5);
        assert_eq!(g.turn_cost(0, 0, 0), 0.0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let g = two_node_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");
        g.save(&path).unwrap();
        let loaded = BaseGraph::load(&path).unwrap();
        assert_eq!(loaded.nodes(), g.nodes());
        assert_eq!(loaded.edges(), g.edges());
        assert_eq!(loaded.bounds(), g.bounds());
        let state = loaded.edge_state(0, None).unwrap();
        assert_eq!(state.fetch_way_geometry(GeometryMode::All).len(), 3);
    }

    #[test]
    fn test_all_edges_iteration() {
        let g = two_node_graph();
        let ids: Vec<u32> = g.all_edges().unwrap().map(|e| e.edge()).collect();
        assert_eq!(ids, vec![0]);
    }
}
