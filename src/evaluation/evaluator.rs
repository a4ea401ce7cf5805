//! Route evaluator that computes cost, load, and feasibility.

use crate::distance::GraphModel;
use crate::error::CarpError;
use crate::models::{Placement, Route, Solution, Violation, ViolationType};

/// Evaluates placement sequences against a graph, a depot, and a vehicle
/// capacity.
///
/// Every cost query of the construction and improvement phases goes
/// through [`GraphModel::route_cost`] via this type.
///
/// # Panics
///
/// Cost queries panic if the depot or a placement vertex lies outside the
/// graph. Evaluators built from a validated instance, or with
/// [`RouteEvaluator::try_new`], have a valid depot; placements made from
/// the instance's services are valid as well.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
/// use carp_routing::evaluation::RouteEvaluator;
///
/// let instance = Instance::builder(10, 1)
///     .required_edge(1, 2, 5, 3, 5)
///     .required_arc(2, 3, 4, 3, 4)
///     .arc(3, 1, 6)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
/// let services = instance.services();
///
/// let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
/// let route = evaluator.build_route(services.iter().map(|s| s.forward()).collect());
/// assert_eq!(route.demand(), 6);
/// assert_eq!(route.cost(), 24.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    graph: &'a GraphModel,
    depot: usize,
    capacity: u32,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator without checking the depot.
    pub fn new(graph: &'a GraphModel, depot: usize, capacity: u32) -> Self {
        Self {
            graph,
            depot,
            capacity,
        }
    }

    /// Creates a new evaluator, rejecting a depot outside the graph.
    pub fn try_new(graph: &'a GraphModel, depot: usize, capacity: u32) -> Result<Self, CarpError> {
        let max = graph.vertex_count();
        if depot == 0 || depot > max {
            return Err(CarpError::InvalidDepot { depot, max });
        }
        Ok(Self::new(graph, depot, capacity))
    }

    /// The graph distances are taken from.
    pub fn graph(&self) -> &'a GraphModel {
        self.graph
    }

    /// Depot vertex.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns `true` if a route carrying `load` can take `extra` more.
    pub fn fits(&self, load: u32, extra: u32) -> bool {
        load.checked_add(extra)
            .is_some_and(|total| total <= self.capacity)
    }

    /// Cost of a depot-to-depot route over `placements`.
    pub fn route_cost(&self, placements: &[Placement]) -> f64 {
        self.graph.route_cost(placements, self.depot)
    }

    /// Builds a route from placements, computing its demand and cost.
    pub fn build_route(&self, placements: Vec<Placement>) -> Route {
        let cost = self.route_cost(&placements);
        let mut route = Route::new();
        for p in placements {
            route.push(p);
        }
        route.set_cost(cost);
        route
    }

    /// Audits a solution: capacity, reachability, exactly-once coverage,
    /// and consistency of the cached route demand and cost.
    ///
    /// A feasible solution yields no violations.
    pub fn audit(&self, solution: &Solution) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = vec![0usize; solution.num_services()];

        for (route_index, route) in solution.routes().iter().enumerate() {
            let demand: u64 = route
                .placements()
                .iter()
                .map(|p| u64::from(p.demand))
                .sum();
            if demand > u64::from(self.capacity) {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index,
                    demand: route.demand(),
                    capacity: self.capacity,
                }));
            }

            let cost = self.route_cost(route.placements());
            if cost.is_infinite() {
                violations.push(Violation::new(ViolationType::Unreachable { route_index }));
            }

            let stale_cost = cost.is_finite() && (cost - route.cost()).abs() > 1e-9;
            if demand != u64::from(route.demand()) || stale_cost {
                violations.push(Violation::new(ViolationType::StaleRoute { route_index }));
            }

            for p in route.placements() {
                if let Some(count) = p.service_id.checked_sub(1).and_then(|i| seen.get_mut(i)) {
                    *count += 1;
                }
            }
        }

        for (i, &count) in seen.iter().enumerate() {
            let service_id = i + 1;
            match count {
                0 => violations.push(Violation::new(ViolationType::MissingService { service_id })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::DuplicateService { service_id })),
            }
        }

        violations
    }
}
