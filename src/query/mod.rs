//! Query overlay: splices snapped GPS points into the base graph without
//! mutating it.
//!
//! A [`QueryGraph`] is built per routing request. It exposes the same
//! read-only [`Graph`] contract as the base graph over the widened id
//! spaces `[0, nodes + V)` / `[0, edges + 4V)`, answering modified
//! neighborhoods from the request's [`GraphModification`] and delegating
//! everything else.

pub mod modification;
pub mod snap;
pub mod virtual_edge;

pub use modification::{EdgeChanges, GraphModification, VE_ADJ, VE_ADJ_REV, VE_BASE, VE_BASE_REV};
pub use snap::{Snap, SnappedPosition};
pub use virtual_edge::VirtualEdgeState;

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::geo::{align_orientation, azimuth_to_xaxis_angle, calc_orientation};
use crate::graph::base::{AllEdges, BaseEdgeExplorer, BaseGraph};
use crate::graph::edge::{EdgeFilter, EdgeFlags, EdgeRef, GeometryMode};
use crate::graph::{EdgeExplorer, Graph, NodeAccess};
use crate::shapes::BBox;

/// Unfavor edges that require a turn of more than ~100 degrees away from
/// the favored heading
const HEADING_PENALTY_THRESHOLD_RAD: f64 = 1.74;

/// Ephemeral overlay graph for one routing request.
///
/// Read-only by construction; the mutating half of the [`Graph`] contract
/// answers with `NotSupported`. Not meant to be shared between requests
/// or threads, the base graph itself is.
pub struct QueryGraph<'g> {
    main: &'g BaseGraph,
    main_nodes: u32,
    main_edges: u32,
    mods: Rc<GraphModification>,
    node_access: ExtendedNodeAccess<'g>,
    use_explorer_cache: bool,
    explorer_cache: RefCell<FxHashMap<EdgeFilter, Rc<ExplorerData>>>,
    /// Unfavored virtual edge ids in insertion order
    unfavored: RefCell<Vec<u32>>,
}

impl<'g> QueryGraph<'g> {
    /// Build the overlay for `snaps`. Non-tower snaps get their virtual
    /// node id written back into `closest_node`.
    pub fn lookup(graph: &'g BaseGraph, snaps: &mut [Snap]) -> QueryGraph<'g> {
        let mods = Rc::new(GraphModification::build(graph, snaps));
        QueryGraph::with_modification(graph, mods)
    }

    fn with_modification(graph: &'g BaseGraph, mods: Rc<GraphModification>) -> QueryGraph<'g> {
        QueryGraph {
            main: graph,
            main_nodes: mods.main_nodes(),
            main_edges: mods.first_virtual_edge_id(),
            node_access: ExtendedNodeAccess {
                main: graph,
                mods: Rc::clone(&mods),
            },
            mods,
            use_explorer_cache: false,
            explorer_cache: RefCell::new(FxHashMap::default()),
            unfavored: RefCell::new(Vec::new()),
        }
    }

    /// Sibling view over the plain base graph, sharing this request's
    /// modification. With no shortcut hierarchy wrapped around the main
    /// graph the views are structurally identical; they still keep
    /// independent explorer caches.
    pub fn base_graph(&self) -> QueryGraph<'g> {
        QueryGraph::with_modification(self.main, Rc::clone(&self.mods))
    }

    /// Cache explorers per filter. Off by default; only sound while the
    /// graph is used single-threaded, which is the intended use anyway.
    pub fn set_use_explorer_cache(&mut self, use_cache: bool) {
        self.use_explorer_cache = use_cache;
    }

    pub fn is_virtual_node(&self, node: u32) -> bool {
        node >= self.main_nodes
    }

    pub fn is_virtual_edge(&self, edge: u32) -> bool {
        edge >= self.main_edges
    }

    /// The base edge a virtual node was placed on
    pub fn original_edge_from_virt_node(&self, node: u32) -> Result<u32> {
        if !self.is_virtual_node(node) {
            return Err(Error::InvalidArgument(format!(
                "node id {node} must be a virtual node"
            )));
        }
        Ok(self.mods.closest_edge(node - self.main_nodes))
    }

    /// Unfavor the edges at virtual node `node` that depart (or arrive,
    /// for `incoming`) more than ~100 degrees away from `favored_heading`
    /// (north-based azimuth, degrees). Returns whether any pair was
    /// unfavored; a NaN heading is a no-op.
    pub fn enforce_heading(
        &self,
        node: u32,
        favored_heading: f64,
        incoming: bool,
    ) -> Result<bool> {
        if favored_heading.is_nan() {
            return Ok(false);
        }
        if !self.is_virtual_node(node) {
            return Err(Error::InvalidArgument(format!(
                "node id {node} must be a virtual node"
            )));
        }

        let k = node - self.main_nodes;
        let favored = azimuth_to_xaxis_angle(favored_heading);
        let positions = if incoming {
            [VE_BASE, VE_ADJ_REV]
        } else {
            [VE_BASE_REV, VE_ADJ]
        };

        let mut enforced = false;
        for pos in positions {
            let slot = 4 * k + pos;
            let way_geo = self
                .mods
                .virtual_edge(slot)
                .fetch_way_geometry(GeometryMode::All);
            if way_geo.len() < 2 {
                continue;
            }
            // orientation of the terminal segment at the relevant end
            let orientation = if incoming {
                let n = way_geo.len();
                calc_orientation(
                    way_geo.lat(n - 2),
                    way_geo.lon(n - 2),
                    way_geo.lat(n - 1),
                    way_geo.lon(n - 1),
                )
            } else {
                calc_orientation(way_geo.lat(0), way_geo.lon(0), way_geo.lat(1), way_geo.lon(1))
            };
            let orientation = align_orientation(favored, orientation);

            if (orientation - favored).abs() > HEADING_PENALTY_THRESHOLD_RAD {
                self.mark_unfavored(slot);
                self.mark_unfavored(slot ^ 1);
                enforced = true;
            }
        }
        Ok(enforced)
    }

    /// Unfavor `virtual_edge` and its reverse pair at `virtual_node`,
    /// nudging the router towards the node's other side.
    pub fn unfavor_virtual_edge_pair(&self, virtual_node: u32, virtual_edge: u32) -> Result<()> {
        if !self.is_virtual_node(virtual_node) {
            return Err(Error::InvalidArgument(format!(
                "node id {virtual_node} must be a virtual node"
            )));
        }
        if !self.is_virtual_edge(virtual_edge) {
            return Err(Error::InvalidArgument(format!(
                "edge id {virtual_edge} must be a virtual edge"
            )));
        }
        let slot = virtual_edge - self.main_edges;
        if slot >= self.mods.virtual_edge_count() {
            return Err(Error::InvalidArgument(format!(
                "virtual edge id {virtual_edge} out of range"
            )));
        }
        let state = self.mods.virtual_edge(slot);
        if state.base_node() != virtual_node && state.adj_node() != virtual_node {
            return Err(Error::EdgeNotFound {
                edge: virtual_edge,
                adj_node: virtual_node,
            });
        }
        self.mark_unfavored(slot);
        self.mark_unfavored(slot ^ 1);
        Ok(())
    }

    /// Ids of all virtual edges currently unfavored, in insertion order
    pub fn unfavored_virtual_edges(&self) -> Vec<u32> {
        self.unfavored.borrow().clone()
    }

    /// Reset the unfavored flag on every tracked edge
    pub fn clear_unfavored_status(&self) {
        let mut unfavored = self.unfavored.borrow_mut();
        for &edge in unfavored.iter() {
            self.mods.virtual_edge(edge - self.main_edges).set_unfavored(false);
        }
        unfavored.clear();
    }

    /// Turn cost with virtual edges substituted by the base edges they
    /// were split from; a virtual via node never carries a turn cost.
    pub fn turn_cost(&self, from_edge: u32, via_node: u32, to_edge: u32) -> f64 {
        if self.is_virtual_node(via_node) {
            return 0.0;
        }
        let from = self.original_edge_of(from_edge);
        let to = self.original_edge_of(to_edge);
        self.main.turn_cost(from, via_node, to)
    }

    fn original_edge_of(&self, edge: u32) -> u32 {
        if self.is_virtual_edge(edge) {
            self.mods.closest_edge((edge - self.main_edges) / 4)
        } else {
            edge
        }
    }

    fn mark_unfavored(&self, slot: u32) {
        let state = self.mods.virtual_edge(slot);
        state.set_unfavored(true);
        let id = state.edge();
        let mut unfavored = self.unfavored.borrow_mut();
        if !unfavored.contains(&id) {
            unfavored.push(id);
        }
    }

    fn build_explorer_data(&self, filter: EdgeFilter) -> ExplorerData {
        let mods: &GraphModification = &self.mods;

        // per modified real node: accepted virtual edges plus the
        // surviving base edges
        let mut at_real = FxHashMap::with_capacity_and_hasher(
            mods.edge_changes().len(),
            Default::default(),
        );
        for (&node, changes) in mods.edge_changes() {
            let mut list = Vec::with_capacity(changes.additional_edges.len() + 4);
            for &slot in &changes.additional_edges {
                if filter.accept(&EdgeRef::Virtual { mods, slot }) {
                    list.push(EdgeEntry::Virtual(slot));
                }
            }
            let mut main_iter = BaseEdgeExplorer::new(self.main, filter);
            main_iter.set_base_node(node);
            while main_iter.next() {
                let state = main_iter.state();
                if changes.removed_edges.contains(&state.edge()) {
                    continue;
                }
                if let EdgeRef::Base { edge, reverse, .. } = state {
                    list.push(EdgeEntry::Base { edge, reverse });
                }
            }
            at_real.insert(node, list);
        }

        // per virtual node: the two outbound states
        let mut at_virtual = Vec::with_capacity(mods.virtual_node_count() as usize);
        for k in 0..mods.virtual_node_count() {
            let mut list = Vec::with_capacity(2);
            for pos in [VE_BASE_REV, VE_ADJ] {
                let slot = 4 * k + pos;
                if filter.accept(&EdgeRef::Virtual { mods, slot }) {
                    list.push(EdgeEntry::Virtual(slot));
                }
            }
            at_virtual.push(list);
        }

        ExplorerData {
            at_real,
            at_virtual,
        }
    }
}

impl NodeAccess for QueryGraph<'_> {
    fn lat(&self, node: u32) -> f64 {
        self.node_access.lat(node)
    }

    fn lon(&self, node: u32) -> f64 {
        self.node_access.lon(node)
    }
}

impl<'g> Graph for QueryGraph<'g> {
    fn nodes(&self) -> u32 {
        self.main_nodes + self.mods.virtual_node_count()
    }

    fn edges(&self) -> u32 {
        self.main_edges + self.mods.virtual_edge_count()
    }

    fn bounds(&self) -> BBox {
        self.main.bounds()
    }

    fn node_access(&self) -> &dyn NodeAccess {
        &self.node_access
    }

    fn edge_state(&self, edge: u32, adj_node: Option<u32>) -> Result<EdgeRef<'_>> {
        if !self.is_virtual_edge(edge) {
            return self.main.edge_state(edge, adj_node);
        }
        let slot = edge - self.main_edges;
        if slot >= self.mods.virtual_edge_count() {
            return Err(Error::InvalidArgument(format!(
                "virtual edge id {edge} out of range"
            )));
        }
        let mods: &GraphModification = &self.mods;
        let state = mods.virtual_edge(slot);
        let slot = match adj_node {
            None => slot,
            Some(n) if state.adj_node() == n => slot,
            Some(n) => {
                // the reverse-paired state sits in the neighboring slot
                let pair = slot ^ 1;
                if mods.virtual_edge(pair).adj_node() != n {
                    return Err(Error::EdgeNotFound { edge, adj_node: n });
                }
                pair
            }
        };
        Ok(EdgeRef::Virtual { mods, slot })
    }

    fn explorer_with(&self, filter: EdgeFilter) -> EdgeExplorer<'_> {
        let data = if self.use_explorer_cache {
            let mut cache = self.explorer_cache.borrow_mut();
            match cache.get(&filter) {
                Some(data) => Rc::clone(data),
                None => {
                    let data = Rc::new(self.build_explorer_data(filter));
                    cache.insert(filter, Rc::clone(&data));
                    data
                }
            }
        } else {
            Rc::new(self.build_explorer_data(filter))
        };

        EdgeExplorer::Query(QueryEdgeExplorer {
            graph: self.main,
            mods: &self.mods,
            main_nodes: self.main_nodes,
            data,
            main_iter: BaseEdgeExplorer::new(self.main, filter),
            cursor: Cursor::Unset,
            current: None,
        })
    }

    fn other_node(&self, edge: u32, node: u32) -> Result<u32> {
        if self.is_virtual_edge(edge) {
            Ok(self.edge_state(edge, Some(node))?.base_node())
        } else {
            self.main.other_node(edge, node)
        }
    }

    fn is_adjacent_to_node(&self, edge: u32, node: u32) -> Result<bool> {
        if self.is_virtual_edge(edge) {
            let slot = edge - self.main_edges;
            if slot >= self.mods.virtual_edge_count() {
                return Err(Error::InvalidArgument(format!(
                    "virtual edge id {edge} out of range"
                )));
            }
            let state = self.mods.virtual_edge(slot);
            Ok(state.base_node() == node || state.adj_node() == node)
        } else {
            self.main.is_adjacent_to_node(edge, node)
        }
    }

    fn all_edges(&self) -> Result<AllEdges<'_>> {
        Err(Error::NotSupported("iterating all edges of a query graph"))
    }

    fn edge(&mut self, _base: u32, _adj: u32, _distance: f64, _flags: EdgeFlags) -> Result<u32> {
        Err(Error::NotSupported("query graph cannot be modified"))
    }

    fn copy_to(&self, _target: &mut BaseGraph) -> Result<()> {
        Err(Error::NotSupported("query graph cannot be modified"))
    }
}

/// Node access over the widened id space: virtual ids resolve to their
/// snapped coordinate, everything else goes to the base graph.
pub struct ExtendedNodeAccess<'g> {
    main: &'g BaseGraph,
    mods: Rc<GraphModification>,
}

impl NodeAccess for ExtendedNodeAccess<'_> {
    fn lat(&self, node: u32) -> f64 {
        let main_nodes = self.mods.main_nodes();
        if node >= main_nodes {
            self.mods.virtual_nodes().lat((node - main_nodes) as usize)
        } else {
            self.main.lat(node)
        }
    }

    fn lon(&self, node: u32) -> f64 {
        let main_nodes = self.mods.main_nodes();
        if node >= main_nodes {
            self.mods.virtual_nodes().lon((node - main_nodes) as usize)
        } else {
            self.main.lon(node)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum EdgeEntry {
    Virtual(u32),
    Base { edge: u32, reverse: bool },
}

/// Pre-computed neighborhoods for one filter
struct ExplorerData {
    at_real: FxHashMap<u32, Vec<EdgeEntry>>,
    at_virtual: Vec<Vec<EdgeEntry>>,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Unset,
    List { at_virtual: bool, node: u32, pos: usize },
    Main,
}

/// Explorer over a [`QueryGraph`]: pre-built lists for modified and
/// virtual nodes, base-graph delegation for untouched ones.
pub struct QueryEdgeExplorer<'g> {
    graph: &'g BaseGraph,
    mods: &'g GraphModification,
    main_nodes: u32,
    data: Rc<ExplorerData>,
    main_iter: BaseEdgeExplorer<'g>,
    cursor: Cursor,
    current: Option<EdgeEntry>,
}

impl<'g> QueryEdgeExplorer<'g> {
    pub fn set_base_node(&mut self, node: u32) {
        self.current = None;
        if node >= self.main_nodes {
            self.cursor = Cursor::List {
                at_virtual: true,
                node,
                pos: 0,
            };
        } else if self.data.at_real.contains_key(&node) {
            self.cursor = Cursor::List {
                at_virtual: false,
                node,
                pos: 0,
            };
        } else {
            self.cursor = Cursor::Main;
            self.main_iter.set_base_node(node);
        }
    }

    pub fn next(&mut self) -> bool {
        match self.cursor {
            Cursor::Unset => false,
            Cursor::Main => self.main_iter.next(),
            Cursor::List {
                at_virtual,
                node,
                pos,
            } => {
                let entry = self.list(at_virtual, node).get(pos).copied();
                match entry {
                    Some(entry) => {
                        self.current = Some(entry);
                        self.cursor = Cursor::List {
                            at_virtual,
                            node,
                            pos: pos + 1,
                        };
                        true
                    }
                    None => {
                        self.current = None;
                        false
                    }
                }
            }
        }
    }

    pub fn state(&self) -> EdgeRef<'g> {
        if let Cursor::Main = self.cursor {
            return self.main_iter.state();
        }
        match self
            .current
            .expect("iterator is not positioned, call next() first")
        {
            EdgeEntry::Virtual(slot) => EdgeRef::Virtual {
                mods: self.mods,
                slot,
            },
            EdgeEntry::Base { edge, reverse } => EdgeRef::Base {
                graph: self.graph,
                edge,
                reverse,
            },
        }
    }

    fn list(&self, at_virtual: bool, node: u32) -> &[EdgeEntry] {
        if at_virtual {
            &self.data.at_virtual[(node - self.main_nodes) as usize]
        } else {
            &self.data.at_real[&node]
        }
    }
}
