//! Placement and route types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A service as performed inside a route.
///
/// `entry` is the vertex where the vehicle starts serving and `exit` the
/// vertex where it ends up afterwards. For nodes both are the same vertex;
/// for edges they depend on the chosen direction.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Placement;
///
/// let p = Placement {
///     service_id: 4,
///     entry: 7,
///     exit: 2,
///     demand: 3,
///     service_cost: 5,
///     traversal_cost: 6,
/// };
/// assert_eq!(p.to_string(), "(S 4,7,2)");
/// assert_eq!(p.fixed_cost(), 11.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Global id of the placed service.
    pub service_id: usize,
    /// Vertex where service starts.
    pub entry: usize,
    /// Vertex where service ends.
    pub exit: usize,
    /// Demand consumed.
    pub demand: u32,
    /// Cost of performing the service.
    pub service_cost: u32,
    /// Cost of moving from `entry` to `exit` while serving.
    pub traversal_cost: u32,
}

impl Placement {
    /// Traversal plus service cost, independent of where the route comes from.
    pub fn fixed_cost(&self) -> f64 {
        f64::from(self.traversal_cost) + f64::from(self.service_cost)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(S {},{},{})", self.service_id, self.entry, self.exit)
    }
}

/// An ordered sequence of placements performed by one vehicle.
///
/// The route starts and ends at the depot, which is not stored. Total demand
/// and cost are cached; [`RouteEvaluator::build_route`] is the way to get a
/// route whose caches match its placements.
///
/// [`RouteEvaluator::build_route`]: crate::evaluation::RouteEvaluator::build_route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    placements: Vec<Placement>,
    demand: u32,
    cost: f64,
}

impl Route {
    /// Creates an empty route with zero demand and cost.
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            demand: 0,
            cost: 0.0,
        }
    }

    /// Appends a placement and adds its demand. The cost is left untouched.
    pub fn push(&mut self, placement: Placement) {
        self.demand += placement.demand;
        self.placements.push(placement);
    }

    /// The ordered placements.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns `true` if the route serves nothing.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Global ids of the placed services, in route order.
    pub fn service_ids(&self) -> Vec<usize> {
        self.placements.iter().map(|p| p.service_id).collect()
    }

    /// `(S id,entry,exit)` strings in route order.
    pub fn labels(&self) -> Vec<String> {
        self.placements.iter().map(Placement::to_string).collect()
    }

    /// Total demand served.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Total route cost (set by the evaluator). Infinite if a hop is
    /// unreachable.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Sets the total cost (used by the evaluator).
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::new()
    }
}
