//! Graph model with per-source distance memoization.

use std::sync::OnceLock;

use super::dijkstra::{shortest_paths, Adjacency};
use crate::error::CarpError;
use crate::models::{Instance, Placement};

/// The road network of an instance plus a lazily filled distance cache.
///
/// Rows of the cache are computed on first use, one source at a time, and
/// never invalidated: the graph is immutable after construction. Rows live
/// in `OnceLock` cells, so queries only need `&self` and the model can be
/// shared between readers.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
///
/// let instance = Instance::builder(10, 1)
///     .required_edge(1, 2, 5, 3, 5)
///     .required_arc(2, 3, 4, 3, 4)
///     .arc(3, 1, 6)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
///
/// assert_eq!(graph.distance(1, 3), 9.0);
/// assert_eq!(graph.distance(3, 2), 11.0);
/// assert_eq!(graph.cached_sources(), 2);
/// ```
#[derive(Debug)]
pub struct GraphModel {
    adjacency: Adjacency,
    cache: Vec<OnceLock<Vec<f64>>>,
}

impl GraphModel {
    /// Builds the graph from the instance connections.
    ///
    /// Required and topology edges insert arcs in both directions; required
    /// and topology arcs insert one arc. Fails if the instance references a
    /// vertex outside the graph.
    pub fn new(instance: &Instance) -> Result<Self, CarpError> {
        instance.validate()?;

        let mut adjacency = Adjacency::new(instance.max_vertex());
        for c in &instance.connections {
            if c.kind.is_two_way() {
                adjacency.add_edge(c.from, c.to, c.cost);
            } else {
                adjacency.add_arc(c.from, c.to, c.cost);
            }
        }
        Ok(Self::from_adjacency(adjacency))
    }

    /// Wraps an existing adjacency.
    ///
    /// Unlike [`GraphModel::new`] nothing is validated: later queries from
    /// a vertex above [`vertex_count`](Self::vertex_count) panic.
    pub fn from_adjacency(adjacency: Adjacency) -> Self {
        let cache = (0..=adjacency.vertex_count())
            .map(|_| OnceLock::new())
            .collect();
        Self { adjacency, cache }
    }

    /// Highest vertex id.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.vertex_count()
    }

    /// The underlying adjacency.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Shortest path costs from `origin` to every vertex, indexed by vertex.
    ///
    /// Computed on the first call for `origin` and served from the cache
    /// afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `origin` is greater than the vertex count.
    pub fn distances_from(&self, origin: usize) -> &[f64] {
        self.cache[origin].get_or_init(|| {
            tracing::trace!(origin, "computing shortest-path row");
            shortest_paths(&self.adjacency, origin)
        })
    }

    /// Shortest path cost `from → to`, infinite if unreachable or if `to` is
    /// not a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `from` is greater than the vertex count.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances_from(from)
            .get(to)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Number of sources whose row is cached.
    pub fn cached_sources(&self) -> usize {
        self.cache.iter().filter(|row| row.get().is_some()).count()
    }

    /// Cost of serving `placements` in order, starting and ending at `depot`.
    ///
    /// For each placement, adds the travel from the current position to its
    /// entry vertex plus its traversal and service costs, then moves to its
    /// exit vertex. Finally adds the return to the depot. Infinite if any
    /// hop is unreachable; zero for an empty sequence.
    ///
    /// # Panics
    ///
    /// Panics if `depot` or a placement exit is greater than the vertex
    /// count.
    pub fn route_cost(&self, placements: &[Placement], depot: usize) -> f64 {
        if placements.is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut position = depot;
        for p in placements {
            let travel = self.distance(position, p.entry);
            if travel.is_infinite() {
                return f64::INFINITY;
            }
            total += travel + p.fixed_cost();
            position = p.exit;
        }

        let back = self.distance(position, depot);
        if back.is_infinite() {
            return f64::INFINITY;
        }
        total + back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GraphModel {
        let instance = Instance::builder(10, 1)
            .required_edge(1, 2, 5, 3, 5)
            .required_arc(2, 3, 4, 3, 4)
            .arc(3, 1, 6)
            .build();
        GraphModel::new(&instance).expect("valid instance")
    }

    fn placement(service_id: usize, entry: usize, exit: usize, cost: u32) -> Placement {
        Placement {
            service_id,
            entry,
            exit,
            demand: 1,
            service_cost: cost,
            traversal_cost: cost,
        }
    }

    #[test]
    fn test_edges_are_two_way() {
        let g = triangle();
        assert_eq!(g.distance(1, 2), 5.0);
        assert_eq!(g.distance(2, 1), 5.0);
    }

    #[test]
    fn test_arcs_are_one_way() {
        let g = triangle();
        assert_eq!(g.distance(2, 3), 4.0);
        // 3 → 2 must go around: 3 → 1 → 2.
        assert_eq!(g.distance(3, 2), 11.0);
    }

    #[test]
    fn test_cache_fills_lazily() {
        let g = triangle();
        assert_eq!(g.cached_sources(), 0);
        let first = g.distances_from(2).to_vec();
        assert_eq!(g.cached_sources(), 1);
        let second = g.distances_from(2).to_vec();
        assert_eq!(first, second);
        assert_eq!(g.cached_sources(), 1);
    }

    #[test]
    fn test_self_distance_zero() {
        let g = triangle();
        for v in 1..=g.vertex_count() {
            assert_eq!(g.distance(v, v), 0.0);
        }
    }

    #[test]
    fn test_distance_to_unknown_vertex() {
        let g = triangle();
        assert!(g.distance(1, 42).is_infinite());
    }

    #[test]
    fn test_route_cost_empty() {
        let g = triangle();
        assert_eq!(g.route_cost(&[], 1), 0.0);
        assert_eq!(g.route_cost(&[], 3), 0.0);
    }

    #[test]
    fn test_route_cost_walks_sequence() {
        let g = triangle();
        // 1 → (1,2) → (2,3) → back to 1: 0 + 10 + 0 + 8 + 6
        let seq = [placement(1, 1, 2, 5), placement(2, 2, 3, 4)];
        assert_eq!(g.route_cost(&seq, 1), 24.0);
        assert_eq!(g.route_cost(&seq, 1), g.route_cost(&seq, 1));
    }

    #[test]
    fn test_route_cost_unreachable() {
        let instance = Instance::builder(10, 1)
            .vertex_count(3)
            .arc(1, 2, 1)
            .build();
        let g = GraphModel::new(&instance).expect("valid instance");
        // Vertex 2 has no way back to the depot.
        let seq = [placement(1, 2, 2, 0)];
        assert!(g.route_cost(&seq, 1).is_infinite());
        let seq = [placement(1, 3, 3, 0)];
        assert!(g.route_cost(&seq, 1).is_infinite());
    }

    #[test]
    fn test_rejects_out_of_range_service() {
        let instance = Instance::builder(10, 1)
            .vertex_count(2)
            .edge(1, 2, 1)
            .required_node(4, 1, 1)
            .build();
        assert!(matches!(
            GraphModel::new(&instance),
            Err(CarpError::VertexOutOfRange { vertex: 4, max: 2 })
        ));
    }

    #[test]
    #[should_panic]
    fn test_route_cost_panics_on_unknown_depot() {
        let g = triangle();
        g.route_cost(&[placement(1, 1, 2, 5)], 7);
    }

    #[test]
    fn test_graph_is_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<GraphModel>();
    }
}
