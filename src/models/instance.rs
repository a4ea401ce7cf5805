//! The instance record handed over by the file reader.

use serde::{Deserialize, Serialize};

use super::Service;
use crate::error::CarpError;

/// A required node: visit `vertex` and pay `service_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredNode {
    /// Label inside the required-node group.
    pub label: usize,
    /// Vertex to visit.
    pub vertex: usize,
    /// Demand consumed.
    pub demand: u32,
    /// Cost of serving the node.
    pub service_cost: u32,
}

/// A required edge or arc between two vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredLink {
    /// Label inside the required-edge or required-arc group.
    pub label: usize,
    /// First endpoint (`u`).
    pub from: usize,
    /// Second endpoint (`v`).
    pub to: usize,
    /// Cost of moving along the link while serving it.
    pub traversal_cost: u32,
    /// Demand consumed.
    pub demand: u32,
    /// Cost of serving the link.
    pub service_cost: u32,
}

/// How a connection enters the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Undirected connection that is also a required edge.
    RequiredEdge,
    /// Undirected topology edge.
    Edge,
    /// Directed connection that is also a required arc.
    RequiredArc,
    /// Directed topology arc.
    Arc,
}

impl ConnectionKind {
    /// Returns `true` if the connection is usable in both directions.
    pub fn is_two_way(self) -> bool {
        matches!(self, ConnectionKind::RequiredEdge | ConnectionKind::Edge)
    }
}

/// A weighted connection of the road network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Tail vertex.
    pub from: usize,
    /// Head vertex.
    pub to: usize,
    /// Non-negative travel cost.
    pub cost: u32,
    /// Edge or arc, required or topology.
    pub kind: ConnectionKind,
}

/// A mixed-graph CARP instance.
///
/// Vertices are numbered from 1. The effective vertex count is the larger of
/// `vertex_count` and the highest vertex used by a connection.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
///
/// let instance = Instance::builder(10, 1)
///     .required_edge(1, 2, 5, 3, 5)
///     .required_arc(2, 3, 4, 3, 4)
///     .arc(3, 1, 6)
///     .build();
/// assert_eq!(instance.num_services(), 2);
/// assert_eq!(instance.max_vertex(), 3);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name, used in log messages.
    pub name: String,
    /// Vehicle capacity.
    pub capacity: u32,
    /// Depot vertex.
    pub depot: usize,
    /// Vertex count declared in the header.
    pub vertex_count: usize,
    /// Required nodes.
    pub required_nodes: Vec<RequiredNode>,
    /// Required edges.
    pub required_edges: Vec<RequiredLink>,
    /// Required arcs.
    pub required_arcs: Vec<RequiredLink>,
    /// Network connections, required ones included.
    pub connections: Vec<Connection>,
}

impl Instance {
    /// Starts an instance with the given capacity and depot.
    pub fn builder(capacity: u32, depot: usize) -> InstanceBuilder {
        InstanceBuilder::new(capacity, depot)
    }

    /// Total number of required services.
    pub fn num_services(&self) -> usize {
        self.required_nodes.len() + self.required_edges.len() + self.required_arcs.len()
    }

    /// Collects all services under one global numbering: nodes first, then
    /// edges, then arcs, starting at id 1.
    pub fn services(&self) -> Vec<Service> {
        let mut services = Vec::with_capacity(self.num_services());
        for node in &self.required_nodes {
            services.push(Service::from_node(services.len() + 1, node));
        }
        for edge in &self.required_edges {
            services.push(Service::from_edge(services.len() + 1, edge));
        }
        for arc in &self.required_arcs {
            services.push(Service::from_arc(services.len() + 1, arc));
        }
        services
    }

    /// Highest vertex id of the graph.
    pub fn max_vertex(&self) -> usize {
        self.connections
            .iter()
            .map(|c| c.from.max(c.to))
            .fold(self.vertex_count, usize::max)
    }

    /// Checks that the depot and every vertex referenced by a connection or
    /// a service lie in `1..=max_vertex()`.
    pub fn validate(&self) -> Result<(), CarpError> {
        let max = self.max_vertex();
        if self.depot == 0 || self.depot > max {
            return Err(CarpError::InvalidDepot {
                depot: self.depot,
                max,
            });
        }

        let connection_vertices = self.connections.iter().flat_map(|c| [c.from, c.to]);
        let node_vertices = self.required_nodes.iter().map(|n| n.vertex);
        let link_vertices = self
            .required_edges
            .iter()
            .chain(&self.required_arcs)
            .flat_map(|l| [l.from, l.to]);

        match connection_vertices
            .chain(node_vertices)
            .chain(link_vertices)
            .find(|&v| v == 0 || v > max)
        {
            Some(vertex) => Err(CarpError::VertexOutOfRange { vertex, max }),
            None => Ok(()),
        }
    }
}

/// Incremental builder for [`Instance`].
///
/// Required edges and arcs are added together with their network
/// connection. Labels are numbered from 1 inside each group; a required
/// node is labelled by its vertex.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    instance: Instance,
}

impl InstanceBuilder {
    /// Creates a builder for an instance with no services or connections.
    pub fn new(capacity: u32, depot: usize) -> Self {
        Self {
            instance: Instance {
                name: String::new(),
                capacity,
                depot,
                vertex_count: depot,
                required_nodes: Vec::new(),
                required_edges: Vec::new(),
                required_arcs: Vec::new(),
                connections: Vec::new(),
            },
        }
    }

    /// Sets the instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.instance.name = name.into();
        self
    }

    /// Sets the declared vertex count.
    pub fn vertex_count(mut self, n: usize) -> Self {
        self.instance.vertex_count = n;
        self
    }

    /// Adds a required node.
    pub fn required_node(mut self, vertex: usize, demand: u32, service_cost: u32) -> Self {
        self.instance.required_nodes.push(RequiredNode {
            label: vertex,
            vertex,
            demand,
            service_cost,
        });
        self
    }

    /// Adds a required edge and its two-way connection.
    pub fn required_edge(
        mut self,
        from: usize,
        to: usize,
        traversal_cost: u32,
        demand: u32,
        service_cost: u32,
    ) -> Self {
        let label = self.instance.required_edges.len() + 1;
        self.instance.required_edges.push(RequiredLink {
            label,
            from,
            to,
            traversal_cost,
            demand,
            service_cost,
        });
        self.connection(from, to, traversal_cost, ConnectionKind::RequiredEdge)
    }

    /// Adds a required arc and its one-way connection.
    pub fn required_arc(
        mut self,
        from: usize,
        to: usize,
        traversal_cost: u32,
        demand: u32,
        service_cost: u32,
    ) -> Self {
        let label = self.instance.required_arcs.len() + 1;
        self.instance.required_arcs.push(RequiredLink {
            label,
            from,
            to,
            traversal_cost,
            demand,
            service_cost,
        });
        self.connection(from, to, traversal_cost, ConnectionKind::RequiredArc)
    }

    /// Adds an undirected topology edge.
    pub fn edge(self, from: usize, to: usize, cost: u32) -> Self {
        self.connection(from, to, cost, ConnectionKind::Edge)
    }

    /// Adds a directed topology arc.
    pub fn arc(self, from: usize, to: usize, cost: u32) -> Self {
        self.connection(from, to, cost, ConnectionKind::Arc)
    }

    fn connection(mut self, from: usize, to: usize, cost: u32, kind: ConnectionKind) -> Self {
        self.instance.connections.push(Connection {
            from,
            to,
            cost,
            kind,
        });
        self
    }

    /// Finishes the instance.
    pub fn build(self) -> Instance {
        self.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceKind;

    fn mixed() -> Instance {
        Instance::builder(20, 1)
            .name("mixed")
            .vertex_count(4)
            .required_arc(3, 4, 2, 1, 1)
            .required_node(2, 3, 1)
            .required_edge(1, 2, 4, 2, 2)
            .edge(2, 3, 1)
            .build()
    }

    #[test]
    fn test_global_numbering_groups_in_order() {
        let services = mixed().services();
        let kinds: Vec<ServiceKind> = services.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![ServiceKind::Node, ServiceKind::Edge, ServiceKind::Arc]
        );
        let ids: Vec<usize> = services.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_max_vertex_uses_connections() {
        let instance = Instance::builder(10, 1)
            .vertex_count(2)
            .arc(1, 7, 1)
            .build();
        assert_eq!(instance.max_vertex(), 7);

        let declared = Instance::builder(10, 1).vertex_count(9).arc(1, 2, 1).build();
        assert_eq!(declared.max_vertex(), 9);
    }

    #[test]
    fn test_validate_ok() {
        assert!(mixed().validate().is_ok());
    }

    #[test]
    fn test_validate_depot() {
        let instance = Instance::builder(10, 8).vertex_count(3).build();
        assert_eq!(
            instance.validate(),
            Err(CarpError::InvalidDepot { depot: 8, max: 3 })
        );
    }

    #[test]
    fn test_validate_service_vertex() {
        let instance = Instance::builder(10, 1)
            .vertex_count(3)
            .arc(1, 2, 1)
            .required_node(5, 1, 1)
            .build();
        assert_eq!(
            instance.validate(),
            Err(CarpError::VertexOutOfRange { vertex: 5, max: 3 })
        );
    }

    #[test]
    fn test_validate_vertex_zero() {
        let instance = Instance::builder(10, 1).vertex_count(3).edge(0, 2, 1).build();
        assert_eq!(
            instance.validate(),
            Err(CarpError::VertexOutOfRange { vertex: 0, max: 3 })
        );
    }

    #[test]
    fn test_two_way_kinds() {
        assert!(ConnectionKind::RequiredEdge.is_two_way());
        assert!(ConnectionKind::Edge.is_two_way());
        assert!(!ConnectionKind::RequiredArc.is_two_way());
        assert!(!ConnectionKind::Arc.is_two_way());
    }

    #[test]
    fn test_serde_roundtrip() {
        let instance = mixed();
        let json = serde_json::to_string(&instance).expect("serialize");
        let back: Instance = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, instance);
    }
}
