//! Inter-route service relocation operator.
//!
//! # Algorithm
//!
//! Tries moving each service from its current route to every insertion
//! position of every other route with enough spare capacity. The single
//! move with the largest strictly positive gain over the whole solution is
//! applied:
//!
//! ```text
//! gain = (cost(source) + cost(target)) - (cost(source \ s) + cost(target + s))
//! ```
//!
//! Route costs are recomputed from scratch for every candidate, so the
//! gain accounts for the shortest-path changes on both sides.
//!
//! # Complexity
//!
//! O(R² × S²) route evaluations per call, where R = routes and S =
//! services per route.

use super::engine::Neighborhood;
use crate::evaluation::RouteEvaluator;
use crate::models::Solution;

/// A relocate move: take the service at `from_pos` of `from_route` and
/// insert it at `to_pos` of `to_route`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelocateMove {
    /// Source route index.
    pub from_route: usize,
    /// Position in the source route.
    pub from_pos: usize,
    /// Target route index.
    pub to_route: usize,
    /// Insertion position in the target route.
    pub to_pos: usize,
    /// Cost reduction of the move.
    pub gain: f64,
}

/// Finds the best strictly improving relocate move, if any.
pub fn best_relocate(solution: &Solution, evaluator: &RouteEvaluator<'_>) -> Option<RelocateMove> {
    let routes = solution.routes();
    let mut best: Option<RelocateMove> = None;
    let mut best_gain = 0.0;
    let mut candidate = Vec::new();

    for (from_route, source) in routes.iter().enumerate() {
        for (from_pos, placement) in source.placements().iter().enumerate() {
            let mut shortened = source.placements().to_vec();
            shortened.remove(from_pos);
            let source_after = evaluator.route_cost(&shortened);
            if source_after.is_infinite() {
                continue;
            }

            for (to_route, target) in routes.iter().enumerate() {
                if to_route == from_route || !evaluator.fits(target.demand(), placement.demand) {
                    continue;
                }
                let before = source.cost() + target.cost();

                for to_pos in 0..=target.len() {
                    candidate.clear();
                    candidate.extend_from_slice(&target.placements()[..to_pos]);
                    candidate.push(*placement);
                    candidate.extend_from_slice(&target.placements()[to_pos..]);

                    let target_after = evaluator.route_cost(&candidate);
                    if target_after.is_infinite() {
                        continue;
                    }

                    let gain = before - (source_after + target_after);
                    if gain > best_gain {
                        best_gain = gain;
                        best = Some(RelocateMove {
                            from_route,
                            from_pos,
                            to_route,
                            to_pos,
                            gain,
                        });
                    }
                }
            }
        }
    }

    best
}

/// Applies a relocate move and rebuilds both routes.
pub fn apply_relocate(solution: &mut Solution, mv: &RelocateMove, evaluator: &RouteEvaluator<'_>) {
    let mut source = solution.routes()[mv.from_route].placements().to_vec();
    let mut target = solution.routes()[mv.to_route].placements().to_vec();
    let placement = source.remove(mv.from_pos);
    target.insert(mv.to_pos, placement);

    solution.set_route(mv.from_route, evaluator.build_route(source));
    solution.set_route(mv.to_route, evaluator.build_route(target));
}

/// Best-improvement relocation of one service between two routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocate;

impl Neighborhood for Relocate {
    fn name(&self) -> &'static str {
        "relocate"
    }

    fn improve(&self, solution: &mut Solution, evaluator: &RouteEvaluator<'_>) -> bool {
        match best_relocate(solution, evaluator) {
            Some(mv) => {
                apply_relocate(solution, &mv, evaluator);
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
    use crate::models::{Instance, Placement, ServiceState};

    // Star around the depot: 1-2-3 on one side, 1-4-5 on the other.
    fn star(capacity: u32) -> (Instance, GraphModel) {
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
    fn test_relocate_merges_same_branch() {
        let (instance, graph) = star(10);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2)]));
        sol.add_route(eval.build_route(vec![node(2, 3)]));
        // 2 + 4
        assert_eq!(sol.total_cost(), 6.0);

        let mv = best_relocate(&sol, &eval).expect("improving move");
        assert_eq!((mv.from_route, mv.from_pos, mv.to_route, mv.to_pos), (0, 0, 1, 0));
        assert!((mv.gain - 2.0).abs() < 1e-10);

        apply_relocate(&mut sol, &mv, &eval);
        assert_eq!(sol.total_cost(), 4.0);
        assert!(sol.routes()[0].is_empty());
        assert_eq!(sol.routes()[1].service_ids(), vec![1, 2]);
        assert_eq!(
            sol.state(1),
            Some(ServiceState::Assigned {
                route: 1,
                position: 0
            })
        );
    }

    #[test]
    fn test_relocate_respects_capacity() {
        let (instance, graph) = star(1);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2)]));
        sol.add_route(eval.build_route(vec![node(2, 3)]));
        assert!(best_relocate(&sol, &eval).is_none());
    }

    #[test]
    fn test_relocate_no_gain_is_rejected() {
        let (instance, graph) = star(10);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2), node(2, 3)]));
        sol.add_route(eval.build_route(vec![node(3, 4), node(4, 5)]));
        assert!(best_relocate(&sol, &eval).is_none());
        assert!(!Relocate.improve(&mut sol, &eval));
    }

    #[test]
    fn test_relocate_single_route() {
        let (instance, graph) = star(10);
        let eval = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
        let mut sol = Solution::new(4);
        sol.add_route(eval.build_route(vec![node(1, 2), node(3, 4)]));
        assert!(best_relocate(&sol, &eval).is_none());
    }
}
