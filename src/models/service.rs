//! Required services: nodes, edges, and arcs.

use serde::{Deserialize, Serialize};

use super::{Placement, RequiredLink, RequiredNode};

/// The kind of work a service requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Visit a single vertex.
    Node,
    /// Traverse an undirected edge, in either direction.
    Edge,
    /// Traverse a directed arc, `u → v` only.
    Arc,
}

/// One unit of required work.
///
/// Services carry a global id (1-based, shared across nodes, edges, and arcs)
/// and the label they had inside their input group.
///
/// # Examples
///
/// ```
/// use carp_routing::models::{RequiredLink, Service, ServiceKind};
///
/// let link = RequiredLink { label: 4, from: 2, to: 3, traversal_cost: 7, demand: 2, service_cost: 1 };
/// let edge = Service::from_edge(5, &link);
/// assert_eq!(edge.id(), 5);
/// assert_eq!(edge.label(), 4);
/// assert_eq!(edge.kind(), ServiceKind::Edge);
/// assert_eq!(edge.endpoints(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    id: usize,
    label: usize,
    kind: ServiceKind,
    u: usize,
    v: usize,
    demand: u32,
    service_cost: u32,
    traversal_cost: u32,
}

impl Service {
    /// Creates a node service. Entry and exit are both the node's vertex.
    pub fn from_node(id: usize, node: &RequiredNode) -> Self {
        Self {
            id,
            label: node.label,
            kind: ServiceKind::Node,
            u: node.vertex,
            v: node.vertex,
            demand: node.demand,
            service_cost: node.service_cost,
            traversal_cost: 0,
        }
    }

    /// Creates an undirected edge service.
    pub fn from_edge(id: usize, link: &RequiredLink) -> Self {
        Self::from_link(id, ServiceKind::Edge, link)
    }

    /// Creates a directed arc service.
    pub fn from_arc(id: usize, link: &RequiredLink) -> Self {
        Self::from_link(id, ServiceKind::Arc, link)
    }

    fn from_link(id: usize, kind: ServiceKind, link: &RequiredLink) -> Self {
        Self {
            id,
            label: link.label,
            kind,
            u: link.from,
            v: link.to,
            demand: link.demand,
            service_cost: link.service_cost,
            traversal_cost: link.traversal_cost,
        }
    }

    /// Global service id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Label inside the input group.
    pub fn label(&self) -> usize {
        self.label
    }

    /// Node, edge, or arc.
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// The `(u, v)` endpoint pair. Equal for nodes.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    /// Demand consumed from the vehicle capacity.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Cost of performing the work.
    pub fn service_cost(&self) -> u32 {
        self.service_cost
    }

    /// Cost of moving along `u → v` while serving. Zero for nodes.
    pub fn traversal_cost(&self) -> u32 {
        self.traversal_cost
    }

    /// Places this service with the given entry and exit vertices.
    pub fn place(&self, entry: usize, exit: usize) -> Placement {
        Placement {
            service_id: self.id,
            entry,
            exit,
            demand: self.demand,
            service_cost: self.service_cost,
            traversal_cost: self.traversal_cost,
        }
    }

    /// Places this service in its `u → v` orientation.
    pub fn forward(&self) -> Placement {
        self.place(self.u, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_service() {
        let node = RequiredNode {
            label: 3,
            vertex: 3,
            demand: 4,
            service_cost: 2,
        };
        let s = Service::from_node(1, &node);
        assert_eq!(s.kind(), ServiceKind::Node);
        assert_eq!(s.endpoints(), (3, 3));
        assert_eq!(s.traversal_cost(), 0);
        assert_eq!(s.demand(), 4);
    }

    #[test]
    fn test_arc_forward_placement() {
        let link = RequiredLink {
            label: 1,
            from: 5,
            to: 6,
            traversal_cost: 3,
            demand: 1,
            service_cost: 9,
        };
        let s = Service::from_arc(8, &link);
        let p = s.forward();
        assert_eq!(p.service_id, 8);
        assert_eq!((p.entry, p.exit), (5, 6));
        assert_eq!(p.service_cost, 9);
        assert_eq!(p.traversal_cost, 3);
    }
}
