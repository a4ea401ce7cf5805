//! VNS problem definition for capacitated arc routing.
//!
//! Implements the [`VnsProblem`](u_metaheur::vns::VnsProblem) trait so the
//! VNS runner can perturb a local optimum and re-run the deterministic
//! local search engine from the perturbed solution.
//!
//! All engine runs share one deadline. Once it has passed, shaking and
//! local search hand their input back unchanged, so the runner winds down
//! without further work.

use std::time::Instant;

use rand::Rng;
use u_metaheur::vns::VnsProblem;

use crate::constructive::greedy_insertion;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{apply_relocate, LocalSearchEngine, RelocateMove, SearchConfig};
use crate::models::{Service, Solution};

/// Cost added per unserved service.
pub const UNSERVED_PENALTY: f64 = 1_000_000.0;

/// VNS problem for capacitated arc routing.
///
/// Neighborhood `k` relocates `k + 1` random services to random feasible
/// positions of other routes. Without [`with_start`](Self::with_start) the
/// runner starts from a greedy construction.
///
/// # Examples
///
/// ```
/// use carp_routing::models::Instance;
/// use carp_routing::distance::GraphModel;
/// use carp_routing::evaluation::RouteEvaluator;
/// use carp_routing::local_search::SearchConfig;
/// use carp_routing::vns::CarpVnsProblem;
/// use u_metaheur::vns::{VnsConfig, VnsRunner};
///
/// let instance = Instance::builder(2, 1)
///     .required_node(2, 1, 0)
///     .required_node(3, 1, 0)
///     .required_node(4, 1, 0)
///     .edge(1, 2, 1)
///     .edge(2, 3, 1)
///     .edge(3, 4, 1)
///     .build();
/// let graph = GraphModel::new(&instance).unwrap();
/// let services = instance.services();
/// let evaluator = RouteEvaluator::new(&graph, instance.depot, instance.capacity);
///
/// let problem = CarpVnsProblem::new(&services, evaluator, SearchConfig::default());
/// let config = VnsConfig::default().with_max_iterations(10).with_seed(42);
/// let result = VnsRunner::run(&problem, &config);
/// assert_eq!(result.best.num_unserved(), 0);
/// assert!(result.best_cost < f64::INFINITY);
/// ```
pub struct CarpVnsProblem<'a> {
    services: &'a [Service],
    evaluator: RouteEvaluator<'a>,
    search: SearchConfig,
    deadline: Option<Instant>,
    start: Option<Solution>,
}

impl<'a> CarpVnsProblem<'a> {
    /// Creates a new CARP VNS problem.
    pub fn new(services: &'a [Service], evaluator: RouteEvaluator<'a>, search: SearchConfig) -> Self {
        Self {
            services,
            evaluator,
            search,
            deadline: None,
            start: None,
        }
    }

    /// Bounds every engine run by `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Starts the runner from `solution` instead of a fresh construction.
    pub fn with_start(mut self, solution: Solution) -> Self {
        self.start = Some(solution);
        self
    }

    /// Returns `true` once the shared deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() > d)
    }

    /// Picks a random relocation of one service that keeps both routes
    /// within capacity and reachable.
    fn random_relocation<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Option<RelocateMove> {
        let routes = solution.routes();
        let from_route = rng.random_range(0..routes.len());
        let source = &routes[from_route];
        if source.is_empty() {
            return None;
        }
        let from_pos = rng.random_range(0..source.len());
        let placement = source.placements()[from_pos];

        let targets: Vec<usize> = (0..routes.len())
            .filter(|&r| r != from_route && self.evaluator.fits(routes[r].demand(), placement.demand))
            .collect();
        if targets.is_empty() {
            return None;
        }
        let to_route = targets[rng.random_range(0..targets.len())];
        let to_pos = rng.random_range(0..=routes[to_route].len());

        let mut shortened = source.placements().to_vec();
        shortened.remove(from_pos);
        let mut extended = routes[to_route].placements().to_vec();
        extended.insert(to_pos, placement);
        let after = self.evaluator.route_cost(&shortened) + self.evaluator.route_cost(&extended);
        if after.is_infinite() {
            return None;
        }

        Some(RelocateMove {
            from_route,
            from_pos,
            to_route,
            to_pos,
            gain: source.cost() + routes[to_route].cost() - after,
        })
    }
}

impl VnsProblem for CarpVnsProblem<'_> {
    type Solution = Solution;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Solution {
        match &self.start {
            Some(solution) => solution.clone(),
            None => greedy_insertion(self.services, &self.evaluator),
        }
    }

    fn cost(&self, solution: &Solution) -> f64 {
        solution.total_cost() + solution.num_unserved() as f64 * UNSERVED_PENALTY
    }

    fn neighborhood_count(&self) -> usize {
        3
    }

    fn shake<R: Rng>(&self, solution: &Solution, k: usize, rng: &mut R) -> Solution {
        let mut shaken = solution.clone();
        if shaken.num_routes() < 2 || self.is_expired() {
            return shaken;
        }
        for _ in 0..=k {
            if let Some(mv) = self.random_relocation(&shaken, rng) {
                apply_relocate(&mut shaken, &mv, &self.evaluator);
            }
        }
        shaken
    }

    fn local_search(&self, solution: &Solution) -> Solution {
        let mut improved = solution.clone();
        if self.is_expired() {
            return improved;
        }
        let mut engine = LocalSearchEngine::new(self.evaluator, self.search);
        if let Some(deadline) = self.deadline {
            engine = engine.with_deadline(deadline);
        }
        engine.run(&mut improved);
        improved
    }
}
