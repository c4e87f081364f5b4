//! Error types for the routing query core.

use std::fmt;

/// Main error type for query-core operations
#[derive(Debug)]
pub enum Error {
    /// Operation not available on this graph view (e.g. mutating a query overlay)
    NotSupported(&'static str),

    /// Neither direction of the edge matches the requested adjacent node
    EdgeNotFound { edge: u32, adj_node: u32 },

    /// Caller passed an id outside the expected range
    InvalidArgument(String),

    /// Spatial hashtable overflow scan exhausted; the table stays readable
    TableFull { size: usize, offset: usize },

    /// Spatial hashtable constructed with an unsatisfiable bit layout
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotSupported(what) => {
                write!(f, "Not supported: {what}")
            }
            Error::EdgeNotFound { edge, adj_node } => {
                write!(f, "Edge {edge} not found with adjacent node {adj_node}")
            }
            Error::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {msg}")
            }
            Error::TableFull { size, offset } => {
                write!(
                    f,
                    "No empty overflow place found, too full or bad hash distribution? \
                     size: {size}, offset: {offset}"
                )
            }
            Error::Config(msg) => {
                write!(f, "Configuration error: {msg}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience result type for query-core operations
pub type Result<T> = std::result::Result<T, Error>;
