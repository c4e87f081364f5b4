//! Heron-Route: query core of a road-network routing engine.
//!
//! Two independent subsystems, composed per routing request:
//!
//! - Spatial side: [`SpatialKeyAlgo`] interleaves lat/lon into compact
//!   keys, [`SpatialHashtable`] packs key/value entries into one flat
//!   byte buffer with in-bucket overflow chaining, and [`LocationIndex`]
//!   snaps GPS fixes to their closest base edge on top of it.
//! - Overlay side: [`GraphModification`] splices the snapped points into
//!   the immutable [`BaseGraph`] as virtual nodes and edges, and
//!   [`QueryGraph`] serves the combined id space through the read-only
//!   [`Graph`] contract the routing algorithm runs against.
//!
//! Per request: GPS points -> `LocationIndex::find_closest` -> `Snap`s
//! -> `QueryGraph::lookup` -> routing. The base graph is shared and never
//! mutated; everything request-scoped dies with the `QueryGraph`.

pub mod error;
pub mod geo;
pub mod graph;
pub mod query;
pub mod shapes;
pub mod spatial;

pub use error::{Error, Result};
pub use graph::{
    BaseGraph, EdgeFilter, EdgeFlags, EdgeRef, GeoPoint, GeometryMode, Graph, NodeAccess,
    PointList,
};
pub use query::{GraphModification, QueryGraph, Snap, SnappedPosition};
pub use shapes::{BBox, Circle, Shape};
pub use spatial::{LocationIndex, SpatialEntry, SpatialHashtable, SpatialKeyAlgo, TableConfig};
