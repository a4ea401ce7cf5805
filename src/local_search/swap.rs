//! Inter-route service swap operator.
//!
//! # Algorithm
//!
//! For every pair of distinct routes and every pair of services (one from
//! each), exchange the two services in place if both routes stay within
//! capacity. The single exchange with the largest strictly positive gain
//! over the whole solution is applied.
//!
//! # Complexity
//!
//! O(R² × S²) pairs of route evaluations per call.

use super::engine::Neighborhood;
use crate::evaluation::RouteEvaluator;
use crate::models::Solution;

/// A swap move: exchange `first_pos` of `first_route` with `second_pos` of
/// `second_route` (`first_route < second_route`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapMove {
    /// First route index.
    pub first_route: usize,
    /// Position in the first route.
    pub first_pos: usize,
    /// Second route index.
    pub second_route: usize,
    /// Position in the second route.
    pub second_pos: usize,
    /// Cost reduction of the move.
    pub gain: f64,
}

/// Finds the best strictly improving swap move, if any.
pub fn best_swap(solution: &Solution, evaluator: &RouteEvaluator<'_>) -> Option<SwapMove> {
    let routes = solution.routes();
    let mut best: Option<SwapMove> = None;
    let mut best_gain = 0.0;

    for (first_route, first) in routes.iter().enumerate() {
        for (second_route, second) in routes.iter().enumerate().skip(first_route + 1) {
            let before = first.cost() + second.cost();
            let mut first_seq = first.placements().to_vec();
            let mut second_seq = second.placements().to_vec();

            for (first_pos, a) in first.placements().iter().enumerate() {
                for (second_pos, b) in second.placements().iter().enumerate() {
                    if !evaluator.fits(first.demand() - a.demand, b.demand)
                        || !evaluator.fits(second.demand() - b.demand, a.demand)
                    {
                        continue;
                    }

                    first_seq[first_pos] = *b;
                    second_seq[second_pos] = *a;
                    let after = evaluator.route_cost(&first_seq) + evaluator.route_cost(&second_seq);
                    first_seq[first_pos] = *a;
                    second_seq[second_pos] = *b;

                    if after.is_infinite() {
                        continue;
                    }
                    let gain = before - after;
                    if gain > best_gain {
                        best_gain = gain;
                        best = Some(SwapMove {
                            first_route,
                            first_pos,
                            second_route,
                            second_pos,
                            gain,
                        });
                    }
                }
            }
        }
    }

    best
}

/// Applies a swap move and rebuilds both routes.
pub fn apply_swap(solution: &mut Solution, mv: &SwapMove, evaluator: &RouteEvaluator<'_>) {
    let mut first = solution.routes()[mv.first_route].placements().to_vec();
    let mut second = solution.routes()[mv.second_route].placements().to_vec();
    std::mem::swap(&mut first[mv.first_pos], &mut second[mv.second_pos]);

    solution.set_route(mv.first_route, evaluator.build_route(first));
    solution.set_route(mv.second_route, evaluator.build_route(second));
}

/// Best-improvement exchange of two services between two routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swap;

impl Neighborhood for Swap {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn improve(&self, solution: &mut Solution, evaluator: &RouteEvaluator<'_>) -> bool {
        match best_swap(solution, evaluator) {
            Some(mv) => {
                apply_swap(solution, &mv, evaluator);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GraphModel;
    use crate::models::{Instance, Placement};

    // Two branches from the depot: 1-2-3 and 1-4-5.
    fn branches(capacity: u32) -> (Instance, GraphModel) {
        let instance = Instance::builder(capacity, 1)
            .required_node(2, 1, 0)
            .required_node(3, 1, 0)
            .required_node(4, 1, 0)
            .required_node(5, 1, 0)
            .edge(1, 2, 1)
            .edge(2, 3, 1)
            .edge(1, 4, 1)
            .edge(4, 5, 1)
            .build();
        let graph = GraphModel::new(&instance).expect("valid instance");
        (instance, graph)
    }

    fn node(service_id: usize, vertex: usize, demand: u32) -> Placement {
        Placement {
            service_id,
            entry: vertex,
            exit: vertex,
            demand,
            service_cost: 0,
            traversal_cost: 0,
        }
    }

    #[test]
    fn test_swap_untangles_branches() {
        let (instance, graph) = branches(2);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2, 1), node(4, 5, 1)]));
        sol.add_route(eval.build_route(vec![node(3, 4, 1), node(2, 3, 1)]));
        assert_eq!(sol.total_cost(), 12.0);

        let mv = best_swap(&sol, &eval).expect("improving swap");
        assert!((mv.gain - 4.0).abs() < 1e-10);
        apply_swap(&mut sol, &mv, &eval);
        assert_eq!(sol.total_cost(), 8.0);
        assert!(sol.routes().iter().all(|r| r.demand() == 2));
        assert!(eval.audit(&sol).is_empty());
    }

    #[test]
    fn test_swap_respects_capacity() {
        let (instance, graph) = branches(3);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2, 1), node(4, 5, 2)]));
        sol.add_route(eval.build_route(vec![node(3, 4, 2), node(2, 3, 1)]));
        // Only the demand-neutral exchanges (1↔2 and 4↔3) are allowed;
        // neither untangles both branches.
        if let Some(mv) = best_swap(&sol, &eval) {
            apply_swap(&mut sol, &mv, &eval);
        }
        assert!(sol.routes().iter().all(|r| r.demand() <= 3));
    }

    #[test]
    fn test_swap_needs_two_routes() {
        let (instance, graph) = branches(10);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2, 1), node(3, 4, 1)]));
        assert!(best_swap(&sol, &eval).is_none());
        assert!(!Swap.improve(&mut sol, &eval));
    }
}
