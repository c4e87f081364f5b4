//! Edge-level building blocks shared by the base graph and the query
//! overlay: polylines, attribute flags, filters and the unified edge state
//! reference that routing code consumes.

use serde::{Deserialize, Serialize};

use crate::geo::haversine_distance;
use crate::graph::base::BaseGraph;
use crate::query::modification::GraphModification;

/// A point in WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}

/// Ordered polyline of WGS84 points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointList(Vec<GeoPoint>);

impl PointList {
    pub fn new() -> Self {
        PointList(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PointList(Vec::with_capacity(capacity))
    }

    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        PointList(points)
    }

    pub fn push(&mut self, lat: f64, lon: f64) {
        self.0.push(GeoPoint::new(lat, lon));
    }

    pub fn push_point(&mut self, point: GeoPoint) {
        self.0.push(point);
    }

    /// Append, skipping a point identical to the current tail
    pub fn push_dedup(&mut self, point: GeoPoint) {
        if self.0.last() != Some(&point) {
            self.0.push(point);
        }
    }

    pub fn get(&self, index: usize) -> GeoPoint {
        self.0[index]
    }

    pub fn lat(&self, index: usize) -> f64 {
        self.0[index].lat
    }

    pub fn lon(&self, index: usize) -> f64 {
        self.0[index].lon
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.0.iter().copied()
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn reversed(&self) -> PointList {
        let mut points = self.0.clone();
        points.reverse();
        PointList(points)
    }

    /// Polyline length as the haversine sum over all segments, in meters
    pub fn distance_m(&self) -> f64 {
        self.0
            .windows(2)
            .map(|w| haversine_distance(w[0].lat, w[0].lon, w[1].lat, w[1].lon))
            .sum()
    }
}

/// Which endpoints [`fetch_way_geometry`](EdgeRef::fetch_way_geometry)
/// includes around the pillar points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryMode {
    /// Pillar points only
    Pillars,
    /// Base tower + pillars
    WithBase,
    /// Pillars + adjacent tower
    WithAdj,
    /// Base tower + pillars + adjacent tower
    All,
}

/// Per-edge attribute bits.
///
/// Bit 0 allows travel from base to adjacent node, bit 1 the opposite
/// direction. Remaining bits are free for encoder use and survive
/// orientation swaps unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags(pub u32);

impl EdgeFlags {
    pub const FORWARD: u32 = 1;
    pub const BACKWARD: u32 = 1 << 1;

    pub fn both_directions() -> Self {
        EdgeFlags(Self::FORWARD | Self::BACKWARD)
    }

    pub fn one_way() -> Self {
        EdgeFlags(Self::FORWARD)
    }

    pub fn is_forward(self) -> bool {
        self.0 & Self::FORWARD != 0
    }

    pub fn is_backward(self) -> bool {
        self.0 & Self::BACKWARD != 0
    }

    /// Flags as seen when traversing the edge in the opposite direction
    pub fn reversed(self) -> EdgeFlags {
        let rest = self.0 & !(Self::FORWARD | Self::BACKWARD);
        let mut access = 0;
        if self.is_forward() {
            access |= Self::BACKWARD;
        }
        if self.is_backward() {
            access |= Self::FORWARD;
        }
        EdgeFlags(rest | access)
    }
}

/// Accepts or rejects edges during explorer iteration.
///
/// Variants compare equal exactly when they behave equally, which is what
/// the query graph's opt-in explorer cache relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeFilter {
    All,
    /// Edges traversable away from the iteration's base node
    Outgoing,
    /// Edges traversable towards the iteration's base node
    Incoming,
}

impl EdgeFilter {
    pub fn accept(self, edge: &EdgeRef<'_>) -> bool {
        match self {
            EdgeFilter::All => true,
            EdgeFilter::Outgoing => edge.flags().is_forward(),
            EdgeFilter::Incoming => edge.flags().is_backward(),
        }
    }
}

/// Read-only view of one directed edge state, base or virtual.
///
/// `reverse` flips the stored orientation: base and adjacent node swap,
/// access flags swap and the way geometry runs backwards. Virtual edge
/// states are stored per direction, so they never carry a reverse flag.
#[derive(Debug, Clone, Copy)]
pub enum EdgeRef<'g> {
    Base {
        graph: &'g BaseGraph,
        edge: u32,
        reverse: bool,
    },
    Virtual {
        mods: &'g GraphModification,
        slot: u32,
    },
}

impl<'g> EdgeRef<'g> {
    pub fn edge(&self) -> u32 {
        match *self {
            EdgeRef::Base { edge, .. } => edge,
            EdgeRef::Virtual { mods, slot } => mods.first_virtual_edge_id() + slot,
        }
    }

    pub fn base_node(&self) -> u32 {
        match *self {
            EdgeRef::Base {
                graph,
                edge,
                reverse,
            } => {
                let (base, adj) = graph.edge_nodes(edge);
                if reverse {
                    adj
                } else {
                    base
                }
            }
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).base_node(),
        }
    }

    pub fn adj_node(&self) -> u32 {
        match *self {
            EdgeRef::Base {
                graph,
                edge,
                reverse,
            } => {
                let (base, adj) = graph.edge_nodes(edge);
                if reverse {
                    base
                } else {
                    adj
                }
            }
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).adj_node(),
        }
    }

    pub fn distance(&self) -> f64 {
        match *self {
            EdgeRef::Base { graph, edge, .. } => graph.edge_distance(edge),
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).distance(),
        }
    }

    pub fn flags(&self) -> EdgeFlags {
        match *self {
            EdgeRef::Base {
                graph,
                edge,
                reverse,
            } => {
                let flags = graph.edge_flags(edge);
                if reverse {
                    flags.reversed()
                } else {
                    flags
                }
            }
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).flags(),
        }
    }

    pub fn fetch_way_geometry(&self, mode: GeometryMode) -> PointList {
        match *self {
            EdgeRef::Base {
                graph,
                edge,
                reverse,
            } => graph.edge_way_geometry(edge, reverse, mode),
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).fetch_way_geometry(mode),
        }
    }

    /// Unfavored hint for the weighting layer; always false for base edges
    pub fn is_unfavored(&self) -> bool {
        match *self {
            EdgeRef::Base { .. } => false,
            EdgeRef::Virtual { mods, slot } => mods.virtual_edge(slot).is_unfavored(),
        }
    }

    /// Detached copy of this state, optionally flipped to the opposite
    /// direction. Virtual states flip to their reverse-paired slot.
    pub fn detach(&self, reverse: bool) -> EdgeRef<'g> {
        if !reverse {
            return *self;
        }
        match *self {
            EdgeRef::Base {
                graph,
                edge,
                reverse,
            } => EdgeRef::Base {
                graph,
                edge,
                reverse: !reverse,
            },
            EdgeRef::Virtual { mods, slot } => EdgeRef::Virtual {
                mods,
                slot: slot ^ 1,
            },
        }
    }
}
