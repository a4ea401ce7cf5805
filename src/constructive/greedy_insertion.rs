//! Greedy insertion constructive heuristic.
//!
//! Builds routes one at a time: from the current position, append the
//! cheapest unserved service that still fits the remaining capacity; when
//! none fits (or none is reachable), return to the depot and open a new
//! route.
//!
//! # Insertion cost
//!
//! With `d` the shortest path cost from the current position:
//!
//! ```text
//! node  u:      d(u) + service                     entry = exit = u
//! edge  (u,v):  min(d(u), d(v)) + traversal + service, u → v on ties
//! arc   (u,v):  d(u) + traversal + service          entry u, exit v
//! ```
//!
//! # Complexity
//!
//! O(S²) candidate evaluations for S services, plus one shortest-path row
//! per distinct position (cached).

use crate::evaluation::RouteEvaluator;
use crate::models::{Placement, Service, ServiceKind, Solution};

/// Constructs a solution by greedy insertion.
///
/// Ties between candidates go to the lowest global service id. If a whole
/// pass opens a route and serves nothing while services remain, those
/// services cannot be reached (or never fit) and construction stops; they
/// are reported by [`Solution::unserved`].
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
/// use carp_routing::evaluation::RouteEvaluator;
/// use carp_routing::constructive::greedy_insertion;
///
/// let instance = Instance::builder(10, 1)
///     .required_edge(1, 2, 5, 3, 5)
///     .required_arc(2, 3, 4, 3, 4)
///     .arc(3, 1, 6)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
/// let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
///
/// let solution = greedy_insertion(&instance.services(), &evaluator);
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.num_unserved(), 0);
/// assert_eq!(solution.total_cost(), 24.0);
/// ```
pub fn greedy_insertion(services: &[Service], evaluator: &RouteEvaluator<'_>) -> Solution {
    let graph = evaluator.graph();
    let depot = evaluator.depot();
    let capacity = evaluator.capacity();

    let mut solution = Solution::new(services.len());
    let mut placed = vec![false; services.len()];
    let mut remaining = services.len();

    while remaining > 0 {
        let remaining_before = remaining;
        let mut placements = Vec::new();
        let mut load = 0u32;
        let mut position = depot;

        loop {
            let row = graph.distances_from(position);
            let mut best: Option<(usize, f64, Placement)> = None;

            for (i, service) in services.iter().enumerate() {
                if placed[i] || service.demand() > capacity - load {
                    continue;
                }
                if let Some((cost, placement)) = cheapest_insertion(service, row) {
                    if best.as_ref().is_none_or(|b| cost < b.1) {
                        best = Some((i, cost, placement));
                    }
                }
            }

            match best {
                Some((i, _, placement)) => {
                    placed[i] = true;
                    remaining -= 1;
                    load += placement.demand;
                    position = placement.exit;
                    placements.push(placement);
                }
                None => break,
            }
        }

        if !placements.is_empty() {
            let route = evaluator.build_route(placements);
            if route.cost().is_infinite() {
                tracing::error!(
                    route = solution.num_routes(),
                    "constructed route cannot return to the depot"
                );
            }
            solution.add_route(route);
        }

        if remaining == remaining_before {
            tracing::warn!(
                unserved = remaining,
                "construction stalled: remaining services are unreachable or exceed capacity"
            );
            break;
        }
    }

    solution
}

/// Cheapest way to serve `service` from the position whose distance row is
/// `row`. `None` if the service cannot be reached.
fn cheapest_insertion(service: &Service, row: &[f64]) -> Option<(f64, Placement)> {
    let (u, v) = service.endpoints();
    let reach = |vertex: usize| row.get(vertex).copied().unwrap_or(f64::INFINITY);
    let fixed = f64::from(service.traversal_cost()) + f64::from(service.service_cost());

    match service.kind() {
        ServiceKind::Node | ServiceKind::Arc => {
            let travel = reach(u);
            travel
                .is_finite()
                .then(|| (travel + fixed, service.place(u, v)))
        }
        ServiceKind::Edge => {
            let forward = reach(u) + fixed;
            let backward = reach(v) + fixed;
            if forward <= backward && forward.is_finite() {
                Some((forward, service.place(u, v)))
            } else if backward < forward && backward.is_finite() {
                Some((backward, service.place(v, u)))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GraphModel;
    use crate::models::{Instance, ServiceState};

    fn solve(instance: &Instance) -> Solution {
        let graph = GraphModel::new(instance).expect("valid instance");
        let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let solution = greedy_insertion(&instance.services(), &evaluator);
        assert!(evaluator.audit(&solution).iter().all(|v| matches!(
            v.kind,
            crate::models::ViolationType::MissingService { .. }
        )));
        solution
    }

    #[test]
    fn test_edge_and_arc_on_one_route() {
        let instance = Instance::builder(10, 1)
            .required_edge(1, 2, 5, 3, 5)
            .required_arc(2, 3, 4, 3, 4)
            .arc(3, 1, 6)
            .build();
        let sol = solve(&instance);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_unserved(), 0);
        let route = &sol.routes()[0];
        assert_eq!(route.labels(), vec!["(S 1,1,2)", "(S 2,2,3)"]);
        assert_eq!(route.demand(), 6);
        // (0 + 5 + 5) + (0 + 4 + 4) + 6
        assert_eq!(route.cost(), 24.0);
    }

    #[test]
    fn test_capacity_splits_routes() {
        let instance = Instance::builder(5, 1)
            .required_node(2, 3, 1)
            .required_node(3, 3, 1)
            .edge(1, 2, 1)
            .edge(2, 3, 1)
            .build();
        let sol = solve(&instance);
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.num_unserved(), 0);
        for route in sol.routes() {
            assert_eq!(route.len(), 1);
            assert!(route.demand() <= 5);
        }
    }

    #[test]
    fn test_edge_direction_by_position() {
        // Depot sits at the v end of the required edge: serving v → u is cheaper.
        let instance = Instance::builder(10, 3)
            .required_edge(1, 2, 2, 1, 1)
            .edge(2, 3, 1)
            .build();
        let sol = solve(&instance);
        let p = sol.routes()[0].placements()[0];
        assert_eq!((p.entry, p.exit), (2, 1));
    }

    #[test]
    fn test_edge_tie_prefers_forward() {
        // Depot equidistant from both ends.
        let instance = Instance::builder(10, 3)
            .required_edge(1, 2, 2, 1, 1)
            .edge(3, 1, 4)
            .edge(3, 2, 4)
            .build();
        let sol = solve(&instance);
        let p = sol.routes()[0].placements()[0];
        assert_eq!((p.entry, p.exit), (1, 2));
    }

    #[test]
    fn test_cost_tie_prefers_lower_id() {
        let instance = Instance::builder(10, 1)
            .required_node(3, 1, 0)
            .required_node(2, 1, 0)
            .edge(1, 2, 1)
            .edge(1, 3, 1)
            .build();
        let sol = solve(&instance);
        assert_eq!(sol.routes()[0].service_ids(), vec![1, 2]);
    }

    #[test]
    fn test_nearest_first() {
        let instance = Instance::builder(10, 1)
            .required_node(3, 1, 0)
            .required_node(2, 1, 0)
            .edge(1, 2, 1)
            .edge(2, 3, 5)
            .build();
        let sol = solve(&instance);
        // Service 2 (vertex 2) is closer to the depot.
        assert_eq!(sol.routes()[0].service_ids(), vec![2, 1]);
    }

    #[test]
    fn test_unreachable_service_stalls() {
        let instance = Instance::builder(10, 1)
            .vertex_count(4)
            .required_node(2, 1, 0)
            .required_node(4, 1, 0)
            .edge(1, 2, 1)
            .build();
        let sol = solve(&instance);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.unserved(), vec![2]);
        assert_eq!(sol.state(2), Some(ServiceState::Unserved));
    }

    #[test]
    fn test_oversized_demand_stalls() {
        let instance = Instance::builder(4, 1)
            .required_node(2, 5, 0)
            .edge(1, 2, 1)
            .build();
        let sol = solve(&instance);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unserved(), vec![1]);
    }

    #[test]
    fn test_no_services() {
        let instance = Instance::builder(4, 1).edge(1, 2, 1).build();
        let sol = solve(&instance);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.total_cost(), 0.0);
    }

    #[test]
    fn test_every_service_exactly_once() {
        let instance = Instance::builder(7, 1)
            .required_node(2, 3, 2)
            .required_node(4, 2, 1)
            .required_edge(2, 3, 3, 4, 2)
            .required_edge(3, 4, 2, 1, 1)
            .required_arc(4, 1, 5, 3, 2)
            .edge(1, 2, 2)
            .build();
        let sol = solve(&instance);
        let mut ids: Vec<usize> = sol.routes().iter().flat_map(|r| r.service_ids()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(sol.routes().iter().all(|r| r.demand() <= 7));
    }
}
