//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in a route, reverse the order of the
//! placements `i..=j` and re-evaluate the whole route. Shortest-path costs
//! are not symmetric on mixed graphs, so no delta formula is used. The
//! first strictly improving reversal is accepted and the scan restarts
//! from the beginning, until a full pass finds nothing.
//!
//! Each placement keeps its own entry and exit: only the visiting order
//! changes.
//!
//! # Complexity
//!
//! O(n³) per pass (n² reversals, each evaluated in O(n)).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::engine::Neighborhood;
use crate::evaluation::RouteEvaluator;
use crate::models::{Placement, Solution};

/// Applies 2-opt to a single placement sequence.
///
/// Returns the improved sequence, or `None` if no reversal lowers the cost.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
/// use carp_routing::evaluation::RouteEvaluator;
/// use carp_routing::local_search::two_opt_route;
///
/// let instance = Instance::builder(10, 1)
///     .required_node(2, 1, 0)
///     .required_node(3, 1, 0)
///     .edge(1, 2, 1)
///     .edge(2, 3, 1)
///     .arc(1, 3, 1)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
/// let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
/// let services = instance.services();
///
/// // 1→2→3→1 costs 1 + 1 + 2, 1→3→2→1 costs 1 + 1 + 1.
/// let route = vec![services[0].forward(), services[1].forward()];
/// let improved = two_opt_route(&route, &evaluator).unwrap();
/// assert_eq!(evaluator.route_cost(&improved), 3.0);
/// ```
pub fn two_opt_route(
    placements: &[Placement],
    evaluator: &RouteEvaluator<'_>,
) -> Option<Vec<Placement>> {
    let n = placements.len();
    if n < 2 {
        return None;
    }

    let mut current = placements.to_vec();
    let mut current_cost = evaluator.route_cost(&current);
    let mut changed = false;
    let mut improved = true;

    while improved {
        improved = false;

        'scan: for i in 0..n - 1 {
            for j in i + 1..n {
                current[i..=j].reverse();
                let cost = evaluator.route_cost(&current);
                if cost < current_cost {
                    current_cost = cost;
                    changed = true;
                    improved = true;
                    break 'scan;
                }
                current[i..=j].reverse();
            }
        }
    }

    changed.then_some(current)
}

/// First-improvement segment reversal inside each route.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

impl Neighborhood for TwoOpt {
    fn name(&self) -> &'static str {
        "two-opt"
    }

    fn improve(&self, solution: &mut Solution, evaluator: &RouteEvaluator<'_>) -> bool {
        let mut any = false;
        for index in 0..solution.num_routes() {
            let route = &solution.routes()[index];
            if route.len() < 2 {
                continue;
            }
            if let Some(better) = two_opt_route(route.placements(), evaluator) {
                solution.set_route(index, evaluator.build_route(better));
                any = true;
            }
        }
        any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GraphModel;
    use crate::models::{Instance, ServiceState};

    // Cheap cycle 1→2→3→4→1, expensive reverse arcs.
    fn cycle() -> (Instance, GraphModel) {
        let instance = Instance::builder(10, 1)
            .required_node(2, 1, 0)
            .required_node(3, 1, 0)
            .required_node(4, 1, 0)
            .arc(1, 2, 1)
            .arc(2, 3, 1)
            .arc(3, 4, 1)
            .arc(4, 1, 1)
            .arc(2, 1, 10)
            .arc(3, 2, 10)
            .arc(4, 3, 10)
            .arc(1, 4, 10)
            .build();
        let graph = GraphModel::new(&instance).expect("valid instance");
        (instance, graph)
    }

    fn node(service_id: usize, vertex: usize) -> Placement {
        Placement {
            service_id,
            entry: vertex,
            exit: vertex,
            demand: 1,
            service_cost: 0,
            traversal_cost: 0,
        }
    }

    #[test]
    fn test_two_opt_against_the_cycle() {
        let (instance, graph) = cycle();
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let route = vec![node(3, 4), node(2, 3), node(1, 2)];
        // Every hop goes the long way round: 3 + 3 + 3 + 3.
        assert_eq!(eval.route_cost(&route), 12.0);

        let improved = two_opt_route(&route, &eval).expect("improvement");
        // First improvement reverses [4, 3], then no single reversal helps.
        assert_eq!(eval.route_cost(&improved), 8.0);

        let mut ids: Vec<usize> = improved.iter().map(|p| p.service_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_two_opt_keeps_orientation() {
        let instance = Instance::builder(10, 1)
            .required_arc(1, 2, 1, 1, 0)
            .required_arc(3, 4, 1, 1, 0)
            .edge(2, 3, 1)
            .edge(4, 1, 1)
            .edge(2, 4, 5)
            .build();
        let graph = GraphModel::new(&instance).expect("valid instance");
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let services = instance.services();
        let route = vec![services[1].forward(), services[0].forward()];

        assert_eq!(eval.route_cost(&route), 8.0);

        let improved = two_opt_route(&route, &eval).expect("improvement");
        assert_eq!(eval.route_cost(&improved), 4.0);
        for p in &improved {
            let (u, v) = services[p.service_id - 1].endpoints();
            assert_eq!((p.entry, p.exit), (u, v));
        }
    }

    #[test]
    fn test_two_opt_short_routes() {
        let (instance, graph) = cycle();
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        assert!(two_opt_route(&[], &eval).is_none());
        assert!(two_opt_route(&[node(1, 2)], &eval).is_none());
    }

    #[test]
    fn test_two_opt_neighborhood_updates_solution() {
        let (instance, graph) = cycle();
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(3);
        sol.add_route(eval.build_route(vec![node(3, 4), node(2, 3), node(1, 2)]));

        assert!(TwoOpt.improve(&mut sol, &eval));
        assert_eq!(sol.total_cost(), 8.0);
        assert_eq!(sol.routes()[0].demand(), 3);
        assert!(matches!(
            sol.state(1),
            Some(ServiceState::Assigned { route: 0, .. })
        ));
        assert!(eval.audit(&sol).is_empty());

        // Local optimum reached.
        assert!(!TwoOpt.improve(&mut sol, &eval));
    }
}
