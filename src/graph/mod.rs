//! Graph contract shared by the base graph and the query overlay.
//!
//! Routing code is written against [`Graph`] and never learns whether the
//! edges it walks are real or virtual.

pub mod base;
pub mod edge;

pub use base::{AllEdges, BaseEdgeExplorer, BaseGraph};
pub use edge::{EdgeFilter, EdgeFlags, EdgeRef, GeoPoint, GeometryMode, PointList};

use crate::error::Result;
use crate::query::QueryEdgeExplorer;
use crate::shapes::BBox;

/// Per-node coordinate lookup
pub trait NodeAccess {
    fn lat(&self, node: u32) -> f64;
    fn lon(&self, node: u32) -> f64;
}

/// Read-only routing graph contract.
///
/// `edge` and `copy_to` exist so that graph views can be passed where a
/// writable graph is expected; views that are read-only by construction
/// answer them with [`Error::NotSupported`](crate::Error::NotSupported).
pub trait Graph {
    fn nodes(&self) -> u32;

    fn edges(&self) -> u32;

    fn bounds(&self) -> BBox;

    fn node_access(&self) -> &dyn NodeAccess;

    /// Edge state oriented so that its adjacent node equals `adj_node`;
    /// `None` accepts the storage orientation.
    fn edge_state(&self, edge: u32, adj_node: Option<u32>) -> Result<EdgeRef<'_>>;

    fn explorer_with(&self, filter: EdgeFilter) -> EdgeExplorer<'_>;

    fn explorer(&self) -> EdgeExplorer<'_> {
        self.explorer_with(EdgeFilter::All)
    }

    fn other_node(&self, edge: u32, node: u32) -> Result<u32>;

    fn is_adjacent_to_node(&self, edge: u32, node: u32) -> Result<bool>;

    fn all_edges(&self) -> Result<AllEdges<'_>>;

    fn edge(&mut self, base: u32, adj: u32, distance: f64, flags: EdgeFlags) -> Result<u32>;

    fn copy_to(&self, target: &mut BaseGraph) -> Result<()>;
}

/// Edge explorer over any [`Graph`].
///
/// One explorer carries a single iterator that is reset by
/// `set_base_node`; callers must finish with one neighborhood before
/// starting the next.
pub enum EdgeExplorer<'g> {
    Base(BaseEdgeExplorer<'g>),
    Query(QueryEdgeExplorer<'g>),
}

impl<'g> EdgeExplorer<'g> {
    pub fn set_base_node(&mut self, node: u32) {
        match self {
            EdgeExplorer::Base(it) => it.set_base_node(node),
            EdgeExplorer::Query(it) => it.set_base_node(node),
        }
    }

    /// Advance to the next accepted edge; false when the neighborhood is
    /// exhausted.
    pub fn next(&mut self) -> bool {
        match self {
            EdgeExplorer::Base(it) => it.next(),
            EdgeExplorer::Query(it) => it.next(),
        }
    }

    pub fn state(&self) -> EdgeRef<'g> {
        match self {
            EdgeExplorer::Base(it) => it.state(),
            EdgeExplorer::Query(it) => it.state(),
        }
    }

    pub fn edge(&self) -> u32 {
        self.state().edge()
    }

    pub fn base_node(&self) -> u32 {
        self.state().base_node()
    }

    pub fn adj_node(&self) -> u32 {
        self.state().adj_node()
    }

    pub fn distance(&self) -> f64 {
        self.state().distance()
    }

    pub fn flags(&self) -> EdgeFlags {
        self.state().flags()
    }

    pub fn fetch_way_geometry(&self, mode: GeometryMode) -> PointList {
        self.state().fetch_way_geometry(mode)
    }

    pub fn is_unfavored(&self) -> bool {
        self.state().is_unfavored()
    }

    pub fn detach(&self, reverse: bool) -> EdgeRef<'g> {
        self.state().detach(reverse)
    }
}
