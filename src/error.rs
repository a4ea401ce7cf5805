//! Error type for instance validation.

use std::fmt;

/// Errors raised while turning an [`Instance`](crate::models::Instance) into
/// a graph.
///
/// The optimization phases themselves never fail: unreachable targets are
/// infinite costs, capacity overflows are filtered out, and a stalled
/// construction is reported through
/// [`Solution::unserved`](crate::models::Solution::unserved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarpError {
    /// A connection or a service references a vertex outside `1..=max`.
    VertexOutOfRange {
        /// The offending vertex.
        vertex: usize,
        /// Highest valid vertex id.
        max: usize,
    },
    /// The depot is not a vertex of the graph.
    InvalidDepot {
        /// Declared depot vertex.
        depot: usize,
        /// Highest valid vertex id.
        max: usize,
    },
}

impl fmt::Display for CarpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarpError::VertexOutOfRange { vertex, max } => {
                write!(f, "vertex {vertex} is outside the graph (valid range 1..={max})")
            }
            CarpError::InvalidDepot { depot, max } => {
                write!(f, "depot {depot} is outside the graph (valid range 1..={max})")
            }
        }
    }
}

impl std::error::Error for CarpError {}
