//! Solution, service ownership, and violation types.

use serde::{Deserialize, Serialize};

use super::Route;

/// Where a service currently lives.
///
/// The solution is the only owner of this state: a service is either
/// unserved or assigned to exactly one position of one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    /// Not placed in any route.
    Unserved,
    /// Placed at `position` of route `route`.
    Assigned {
        /// Route index in the solution.
        route: usize,
        /// Position inside the route.
        position: usize,
    },
}

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Route demand exceeds vehicle capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Demand served by the route.
        demand: u32,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// A hop of the route (including the return to the depot) is
    /// unreachable.
    Unreachable {
        /// Route index in the solution.
        route_index: usize,
    },
    /// A service is placed in no route.
    MissingService {
        /// Global service id.
        service_id: usize,
    },
    /// A service is placed more than once.
    DuplicateService {
        /// Global service id.
        service_id: usize,
    },
    /// Cached demand or cost of a route differs from recomputation.
    StaleRoute {
        /// Route index in the solution.
        route_index: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A set of routes together with the state of every service.
///
/// Services are addressed by their global id (1-based).
///
/// # Examples
///
/// ```
/// use carp_routing::models::{Placement, Route, ServiceState, Solution};
///
/// let mut route = Route::new();
/// route.push(Placement { service_id: 2, entry: 3, exit: 3, demand: 1, service_cost: 0, traversal_cost: 0 });
///
/// let mut sol = Solution::new(2);
/// sol.add_route(route);
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.state(2), Some(ServiceState::Assigned { route: 0, position: 0 }));
/// assert_eq!(sol.unserved(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    states: Vec<ServiceState>,
}

impl Solution {
    /// Creates an empty solution for `num_services` services, all unserved.
    pub fn new(num_services: usize) -> Self {
        Self {
            routes: Vec::new(),
            states: vec![ServiceState::Unserved; num_services],
        }
    }

    /// Adds a route and assigns its services to it.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
        self.assign(self.routes.len() - 1);
    }

    /// Replaces route `index` and re-assigns its services.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_route(&mut self, index: usize, route: Route) {
        self.routes[index] = route;
        self.assign(index);
    }

    /// Drops routes without placements and re-indexes every assignment.
    pub fn prune_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
        for index in 0..self.routes.len() {
            self.assign(index);
        }
    }

    fn assign(&mut self, index: usize) {
        for (position, placement) in self.routes[index].placements().iter().enumerate() {
            if let Some(state) = placement
                .service_id
                .checked_sub(1)
                .and_then(|i| self.states.get_mut(i))
            {
                *state = ServiceState::Assigned {
                    route: index,
                    position,
                };
            }
        }
    }

    /// Returns the routes of this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of services known to this solution.
    pub fn num_services(&self) -> usize {
        self.states.len()
    }

    /// State of the service with the given global id.
    pub fn state(&self, service_id: usize) -> Option<ServiceState> {
        service_id
            .checked_sub(1)
            .and_then(|i| self.states.get(i))
            .copied()
    }

    /// Ids of services that are not in any route.
    pub fn unserved(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ServiceState::Unserved)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Number of services that are not in any route.
    pub fn num_unserved(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == ServiceState::Unserved)
            .count()
    }

    /// Number of placements across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Sum of route costs.
    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(Route::cost).sum()
    }

    /// Sum of route demands.
    pub fn total_demand(&self) -> u64 {
        self.routes.iter().map(|r| u64::from(r.demand())).sum()
    }
}
